//! Configuration for image retrieval.
//!
//! - [`MosaicConfig`] is the in-memory configuration handed to the client:
//!   worker count, default level, request timeout and endpoints.
//! - [`ConfigFile`] loads optional overrides from `~/.himawari/config.ini`.
//!
//! # Example
//!
//! ```
//! use himawari::config::MosaicConfig;
//! use himawari::level::ZoomLevel;
//!
//! let config = MosaicConfig::new()
//!     .with_workers(8)
//!     .with_level(ZoomLevel::new(8).unwrap());
//! assert_eq!(config.workers(), 8);
//! ```

mod file;
mod mosaic;

pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
pub use mosaic::{MosaicConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};
