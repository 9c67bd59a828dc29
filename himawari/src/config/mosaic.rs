//! Retrieval configuration.

use crate::latest::DEFAULT_LATEST_URL;
use crate::level::ZoomLevel;
use crate::source::DEFAULT_TILE_BASE_URL;
pub use crate::source::DEFAULT_TIMEOUT_SECS;
use crate::time::reference_offset_at;
use chrono::{DateTime, FixedOffset, Utc};

/// Default number of concurrent tile workers.
pub const DEFAULT_WORKERS: isize = 5;

/// Configuration for fetching full-disk images.
///
/// # Example
///
/// ```
/// use himawari::config::MosaicConfig;
///
/// let config = MosaicConfig::default();
/// assert_eq!(config.workers(), 5);
/// assert_eq!(config.level().get(), 4);
/// assert_eq!(config.timeout_secs(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Requested worker count; normalized per assembly
    workers: isize,
    /// Level used when the caller does not choose one
    level: ZoomLevel,
    /// Per-request HTTP timeout
    timeout_secs: u64,
    /// Base address of the tile archive
    tile_base_url: String,
    /// Address of the latest-metadata document
    latest_url: String,
    /// Fixed provider offset overriding the Sydney zone
    reference_offset: Option<FixedOffset>,
}

impl MosaicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of concurrent tile workers.
    ///
    /// Zero or negative values run sequentially; values above the number of
    /// tiles are clamped when assembling.
    pub fn with_workers(mut self, workers: isize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_level(mut self, level: ZoomLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    pub fn with_tile_base_url(mut self, url: impl Into<String>) -> Self {
        self.tile_base_url = url.into();
        self
    }

    pub fn with_latest_url(mut self, url: impl Into<String>) -> Self {
        self.latest_url = url.into();
        self
    }

    /// Pin the provider offset instead of following Australia/Sydney.
    pub fn with_reference_offset(mut self, offset: FixedOffset) -> Self {
        self.reference_offset = Some(offset);
        self
    }

    pub fn workers(&self) -> isize {
        self.workers
    }

    pub fn level(&self) -> ZoomLevel {
        self.level
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn tile_base_url(&self) -> &str {
        &self.tile_base_url
    }

    pub fn latest_url(&self) -> &str {
        &self.latest_url
    }

    /// The pinned provider offset, if any.
    pub fn reference_offset(&self) -> Option<FixedOffset> {
        self.reference_offset
    }

    /// Provider offset in effect at `at`.
    pub fn reference_offset_at(&self, at: DateTime<Utc>) -> FixedOffset {
        self.reference_offset.unwrap_or_else(|| reference_offset_at(at))
    }
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            level: ZoomLevel::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tile_base_url: DEFAULT_TILE_BASE_URL.to_string(),
            latest_url: DEFAULT_LATEST_URL.to_string(),
            reference_offset: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MosaicConfig::default();
        assert_eq!(config.workers(), DEFAULT_WORKERS);
        assert_eq!(config.level(), ZoomLevel::default());
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.tile_base_url(), DEFAULT_TILE_BASE_URL);
        assert_eq!(config.latest_url(), DEFAULT_LATEST_URL);
        assert_eq!(config.reference_offset(), None);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(MosaicConfig::new(), MosaicConfig::default());
    }

    #[test]
    fn test_builder_chain() {
        let config = MosaicConfig::new()
            .with_workers(-2)
            .with_level(ZoomLevel::new(16).unwrap())
            .with_timeout_secs(5)
            .with_tile_base_url("http://a")
            .with_latest_url("http://b")
            .with_reference_offset(FixedOffset::east_opt(0).unwrap());

        assert_eq!(config.workers(), -2);
        assert_eq!(config.level().get(), 16);
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(config.tile_base_url(), "http://a");
        assert_eq!(config.latest_url(), "http://b");
        assert_eq!(config.reference_offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_reference_offset_defaults_to_sydney() {
        use chrono::TimeZone;

        let config = MosaicConfig::default();
        let january = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let july = Utc.with_ymd_and_hms(2024, 7, 10, 0, 0, 0).unwrap();
        assert_eq!(config.reference_offset_at(january).local_minus_utc(), 11 * 3600);
        assert_eq!(config.reference_offset_at(july).local_minus_utc(), 10 * 3600);

        let pinned = config.with_reference_offset(FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(pinned.reference_offset_at(january).local_minus_utc(), 9 * 3600);
    }
}
