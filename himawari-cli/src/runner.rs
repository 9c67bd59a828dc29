//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, client creation and
//! file output so command handlers stay small.

use crate::error::CliError;
use himawari::client::HimawariClient;
use himawari::config::{ConfigFile, MosaicConfig};
use himawari::logging::{default_log_file, init_logging, LoggingGuard};
use himawari::source::{HimawariTileSource, ReqwestClient};
use image::{ImageFormat, RgbaImage};
use std::path::Path;
use tracing::info;

/// Client type used by every command.
pub type Client = HimawariClient<HimawariTileSource<ReqwestClient>, ReqwestClient>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config file and initialize logging.
    ///
    /// Logs always go to the configured file. With `verbose` they are also
    /// mirrored to stderr at debug level, keeping stdout for command output.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let log_path = &config.log_file;
        let log_dir = log_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(log_dir, &log_file, verbose, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Himawari v{}", himawari::VERSION);
        info!("Himawari CLI: {} command", command);
    }

    /// Create a client with the given retrieval settings.
    pub fn create_client(&self, config: MosaicConfig) -> Result<Client, CliError> {
        HimawariClient::from_config(config)
            .map_err(CliError::from)
            .inspect(|_| info!("Client created successfully"))
    }

    /// Save an assembled image as PNG.
    pub fn save_png(&self, path: &str, image: &RgbaImage) -> Result<(), CliError> {
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|error| CliError::FileWrite {
                path: path.to_string(),
                error,
            })?;

        let size_mb = std::fs::metadata(path)
            .map(|m| m.len() as f64 / 1_048_576.0)
            .unwrap_or(0.0);
        info!(path, size_mb, "Image saved");
        println!("✓ Saved successfully: {} ({:.2} MB)", path, size_mb);
        println!("  Dimensions: {}×{}", image.width(), image.height());

        Ok(())
    }
}
