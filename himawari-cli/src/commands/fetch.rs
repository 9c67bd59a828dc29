//! Fetch command - download a full-disk image and save it as PNG.

use chrono::{DateTime, Utc};
use himawari::level::ZoomLevel;
use himawari::mosaic::normalize_workers;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub level: Option<ZoomLevel>,
    pub workers: Option<isize>,
    pub time: Option<DateTime<Utc>>,
    pub offset_time: bool,
    pub output: Option<String>,
    pub verbose: bool,
}

/// Run the fetch command.
pub async fn run(args: FetchArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("fetch");
    let config = runner.config();

    // CLI flags override the config file
    let mut mosaic = config.mosaic.clone();
    if let Some(level) = args.level {
        mosaic = mosaic.with_level(level);
    }
    if let Some(workers) = args.workers {
        mosaic = mosaic.with_workers(workers);
    }
    let level = mosaic.level();
    let workers = normalize_workers(mosaic.workers(), level);
    let offset_time = args.offset_time || config.offset_time;

    let client = runner.create_client(mosaic)?;

    let time = match args.time {
        Some(time) => time,
        None => client.latest_time(offset_time).await?,
    };

    println!("Downloading full-disk image:");
    println!("  Time: {} UTC", time.format("%Y-%m-%d %H:%M:%S"));
    println!("  Level: {} ({} tiles)", level, level.tile_count());
    println!("  Workers: {}", workers);
    println!();

    let start = std::time::Instant::now();
    let image = client.image_at(time, Some(level)).await?;
    println!(
        "Downloaded successfully in {:.2}s",
        start.elapsed().as_secs_f64()
    );
    println!();

    let output = args
        .output
        .unwrap_or_else(|| default_output_name(time, level));
    runner.save_png(&output, &image)?;

    Ok(())
}

/// File name used when `--output` is not given.
fn default_output_name(time: DateTime<Utc>, level: ZoomLevel) -> String {
    format!("himawari-{}-{}d.png", time.format("%Y%m%d-%H%M%S"), level)
}
