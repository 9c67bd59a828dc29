//! Himawari CLI - Command-line interface
//!
//! This binary provides a command-line interface to the himawari library:
//! resolve the newest observation, print tile addresses, and download
//! assembled full-disk images.

mod commands;
mod error;
mod runner;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use himawari::level::ZoomLevel;

use commands::common::{parse_level, parse_time};

#[derive(Parser)]
#[command(name = "himawari")]
#[command(version, about = "Download full-disk Earth images from the Himawari satellite", long_about = None)]
struct Cli {
    /// Mirror debug logging to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the newest available observation time (UTC)
    Latest {
        /// Shift the time by the host's offset from the provider's zone
        #[arg(long)]
        offset_time: bool,
    },

    /// Print the address of a single tile
    Url {
        #[command(flatten)]
        when: TimeArgs,

        /// Zoom level: 1, 2, 4, 8, 16 or 20 (0 selects the default)
        #[arg(long, value_parser = parse_level)]
        level: Option<ZoomLevel>,

        /// Tile column
        #[arg(short, default_value = "0")]
        x: u32,

        /// Tile row
        #[arg(short, default_value = "0")]
        y: u32,
    },

    /// Download a full-disk image and save it as PNG
    Fetch {
        #[command(flatten)]
        when: TimeArgs,

        /// Zoom level: 1, 2, 4, 8, 16 or 20 (0 selects the default)
        #[arg(long, value_parser = parse_level)]
        level: Option<ZoomLevel>,

        /// Concurrent tile downloads (values below 1 download sequentially)
        #[arg(long, allow_negative_numbers = true)]
        workers: Option<isize>,

        /// Output file path (default: himawari-<time>-<level>d.png)
        #[arg(long, short)]
        output: Option<String>,
    },
}

/// Observation time selection shared by `url` and `fetch`.
#[derive(Args)]
struct TimeArgs {
    /// Observation time, RFC 3339 or "YYYY-MM-DD hh:mm:ss" UTC (default: latest)
    #[arg(long, value_parser = parse_time)]
    time: Option<DateTime<Utc>>,

    /// When resolving the latest time, shift it by the host's offset from the provider's zone
    #[arg(long, conflicts_with = "time")]
    offset_time: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        Commands::Latest { offset_time } => {
            commands::latest::run(commands::latest::LatestArgs {
                offset_time,
                verbose,
            })
            .await
        }
        Commands::Url {
            when,
            level,
            x,
            y,
        } => {
            commands::url::run(commands::url::UrlArgs {
                time: when.time,
                level,
                x,
                y,
                offset_time: when.offset_time,
                verbose,
            })
            .await
        }
        Commands::Fetch {
            when,
            level,
            workers,
            output,
        } => {
            commands::fetch::run(commands::fetch::FetchArgs {
                level,
                workers,
                time: when.time,
                offset_time: when.offset_time,
                output,
                verbose,
            })
            .await
        }
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_flags() {
        let cli = Cli::try_parse_from([
            "himawari",
            "fetch",
            "--level",
            "8",
            "--workers",
            "-2",
            "--time",
            "2023-01-01 00:00:00",
            "-o",
            "out.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch {
                when,
                level,
                workers,
                output,
            } => {
                assert_eq!(level, Some(ZoomLevel::new(8).unwrap()));
                assert_eq!(workers, Some(-2));
                assert!(when.time.is_some());
                assert!(!when.offset_time);
                assert_eq!(output.as_deref(), Some("out.png"));
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_unsupported_level_rejected() {
        assert!(Cli::try_parse_from(["himawari", "fetch", "--level", "5"]).is_err());
    }

    #[test]
    fn test_time_conflicts_with_offset() {
        assert!(Cli::try_parse_from([
            "himawari",
            "url",
            "--time",
            "2023-01-01 00:00:00",
            "--offset-time"
        ])
        .is_err());
    }
}
