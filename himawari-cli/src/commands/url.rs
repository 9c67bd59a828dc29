//! Url command - print the address of one tile.

use chrono::{DateTime, Utc};
use himawari::level::{ZoomLevel, TILE_SIZE};
use himawari::source::tile_url;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the url command.
pub struct UrlArgs {
    pub time: Option<DateTime<Utc>>,
    pub level: Option<ZoomLevel>,
    pub x: u32,
    pub y: u32,
    pub offset_time: bool,
    pub verbose: bool,
}

/// Run the url command.
///
/// Without `--time` the newest observation is resolved first.
pub async fn run(args: UrlArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("url");
    let config = runner.config();
    let level = args.level.unwrap_or(config.mosaic.level());

    if args.x >= level.get() || args.y >= level.get() {
        return Err(CliError::InvalidArgument(format!(
            "tile ({}, {}) is outside the {}×{} grid of level {}",
            args.x, args.y, level, level, level
        )));
    }

    let time = match args.time {
        Some(time) => time,
        None => {
            let client = runner.create_client(config.mosaic.clone())?;
            client
                .latest_time(args.offset_time || config.offset_time)
                .await?
        }
    };

    println!(
        "{}",
        tile_url(
            config.mosaic.tile_base_url(),
            &time,
            level,
            TILE_SIZE,
            args.x,
            args.y
        )
    );

    Ok(())
}
