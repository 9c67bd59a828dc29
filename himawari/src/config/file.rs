//! Configuration file handling for ~/.himawari/config.ini.
//!
//! Every key is optional; missing keys fall back to the defaults of
//! [`MosaicConfig`].
//!
//! ```ini
//! [download]
//! workers = 8
//! timeout = 30
//! tile_url = http://himawari8.nict.go.jp/img/D531106
//! latest_url = http://himawari8-dl.nict.go.jp/himawari8/img/D531106/latest.json
//!
//! [image]
//! level = 4
//! offset_time = false
//! # Optional; Australia/Sydney (with daylight saving) when absent
//! reference_offset = +10:00
//!
//! [logging]
//! file = ~/.himawari/logs/himawari.log
//! ```

use super::mosaic::MosaicConfig;
use crate::level::ZoomLevel;
use crate::time::parse_offset;
use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Settings loaded from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Retrieval settings from `[download]` and `[image]`
    pub mosaic: MosaicConfig,
    /// Whether `latest` times are corrected to the host zone by default
    pub offset_time: bool,
    /// Log file location from `[logging]`
    pub log_file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            mosaic: MosaicConfig::default(),
            offset_time: false,
            log_file: config_directory().join("logs").join("himawari.log"),
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.himawari/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let mosaic = &self.mosaic;
        let mut ini = Ini::new();
        ini.with_section(Some("download"))
            .set("workers", mosaic.workers().to_string())
            .set("timeout", mosaic.timeout_secs().to_string())
            .set("tile_url", mosaic.tile_base_url())
            .set("latest_url", mosaic.latest_url());
        ini.with_section(Some("image"))
            .set("level", mosaic.level().to_string())
            .set("offset_time", self.offset_time.to_string());
        if let Some(offset) = mosaic.reference_offset() {
            ini.with_section(Some("image"))
                .set("reference_offset", offset.to_string());
        }
        ini.with_section(Some("logging"))
            .set("file", self.log_file.to_string_lossy());

        ini.write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();
    let mut mosaic = MosaicConfig::default();

    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("workers") {
            let workers = v
                .trim()
                .parse::<isize>()
                .map_err(|_| invalid("download", "workers", v, "must be an integer"))?;
            mosaic = mosaic.with_workers(workers);
        }
        if let Some(v) = section.get("timeout") {
            let timeout = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|t| *t > 0)
                .ok_or_else(|| invalid("download", "timeout", v, "must be a positive integer"))?;
            mosaic = mosaic.with_timeout_secs(timeout);
        }
        if let Some(v) = section.get("tile_url") {
            mosaic = mosaic.with_tile_base_url(v.trim());
        }
        if let Some(v) = section.get("latest_url") {
            mosaic = mosaic.with_latest_url(v.trim());
        }
    }

    if let Some(section) = ini.section(Some("image")) {
        if let Some(v) = section.get("level") {
            let level = v
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|l| ZoomLevel::new(l).ok())
                .ok_or_else(|| invalid("image", "level", v, "must be one of 1, 2, 4, 8, 16, 20"))?;
            mosaic = mosaic.with_level(level);
        }
        if let Some(v) = section.get("offset_time") {
            config.offset_time = parse_bool(v);
        }
        if let Some(v) = section.get("reference_offset") {
            let offset = parse_offset(v)
                .ok_or_else(|| invalid("image", "reference_offset", v, "expected ±HH:MM"))?;
            mosaic = mosaic.with_reference_offset(offset);
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            config.log_file = expand_tilde(v.trim());
        }
    }

    config.mosaic = mosaic;
    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Get the path to the config directory (~/.himawari).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".himawari")
}

/// Get the path to the config file (~/.himawari/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
