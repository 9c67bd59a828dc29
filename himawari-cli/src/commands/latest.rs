//! Latest command - print the newest available observation time.

use himawari::latest::LATEST_DATE_FORMAT;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the latest command.
pub struct LatestArgs {
    pub offset_time: bool,
    pub verbose: bool,
}

/// Run the latest command.
pub async fn run(args: LatestArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("latest");
    let config = runner.config();

    let offset_time = args.offset_time || config.offset_time;
    let client = runner.create_client(config.mosaic.clone())?;

    let time = client.latest_time(offset_time).await?;
    println!("{}", time.format(LATEST_DATE_FORMAT));

    Ok(())
}
