//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use himawari::client::ClientError;
use himawari::config::ConfigFileError;
use himawari::latest::LatestError;
use himawari::mosaic::MosaicError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Command-line arguments are inconsistent
    InvalidArgument(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Latest time resolution or image assembly failed
    Client(ClientError),
    /// Failed to write output file
    FileWrite {
        path: String,
        error: image::ImageError,
    },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Client(ClientError::Latest(LatestError::Fetch(_)))
            | CliError::Client(ClientError::Mosaic(MosaicError::Tile { .. })) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. No network connection or the archive is unreachable");
                eprintln!("  2. The requested time has no published image (images are every 10 minutes)");
                eprintln!("  3. Too many workers; try a lower --workers value");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or remove it to use defaults.",
                    himawari::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Client(e) => write!(f, "Failed to retrieve image: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Client(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::LoggingInit(_) | CliError::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        CliError::Client(e)
    }
}
