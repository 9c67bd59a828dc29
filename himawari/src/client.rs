//! High-level client combining latest-time resolution and mosaic assembly.
//!
//! ```ignore
//! use himawari::client::HimawariClient;
//! use himawari::config::MosaicConfig;
//!
//! let client = HimawariClient::from_config(MosaicConfig::default())?;
//! let (time, image) = client.latest_image(None, true).await?;
//! image.save(format!("himawari-{}.png", time.format("%Y%m%d%H%M%S")))?;
//! ```

use crate::config::MosaicConfig;
use crate::latest::{LatestError, LatestResolver};
use crate::level::ZoomLevel;
use crate::mosaic::{MosaicAssembler, MosaicError};
use crate::source::{AsyncHttpClient, FetchError, HimawariTileSource, ReqwestClient, TileSource};
use crate::time::{apply_offset, local_offset};
use chrono::{DateTime, Utc};
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by [`HimawariClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Http(FetchError),

    /// Latest observation time could not be resolved
    #[error(transparent)]
    Latest(#[from] LatestError),

    /// Mosaic assembly failed
    #[error(transparent)]
    Mosaic(#[from] MosaicError),
}

/// Client for full-disk images.
pub struct HimawariClient<S: TileSource, C: AsyncHttpClient> {
    assembler: MosaicAssembler<S>,
    resolver: LatestResolver<C>,
    config: MosaicConfig,
}

impl HimawariClient<HimawariTileSource<ReqwestClient>, ReqwestClient> {
    /// Builds a reqwest-backed client for the endpoints in `config`.
    pub fn from_config(config: MosaicConfig) -> Result<Self, ClientError> {
        let http = ReqwestClient::with_timeout(config.timeout_secs()).map_err(ClientError::Http)?;
        let source =
            HimawariTileSource::new(http.clone()).with_base_url(config.tile_base_url());
        let resolver = LatestResolver::new(http).with_url(config.latest_url());
        Ok(Self::new(Arc::new(source), resolver, config))
    }
}

impl<S: TileSource, C: AsyncHttpClient> HimawariClient<S, C> {
    pub fn new(source: Arc<S>, resolver: LatestResolver<C>, config: MosaicConfig) -> Self {
        Self {
            assembler: MosaicAssembler::new(source),
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<S> {
        self.assembler.source()
    }

    /// Newest observation time, optionally shifted by the host's offset
    /// from the provider's zone.
    pub async fn latest_time(&self, offset_time: bool) -> Result<DateTime<Utc>, ClientError> {
        let latest = self.resolver.latest().await?;
        if !offset_time {
            return Ok(latest);
        }

        let reference = self.config.reference_offset_at(Utc::now());
        let corrected = apply_offset(latest, local_offset(), reference);
        info!(
            latest = %latest,
            corrected = %corrected,
            reference = %reference,
            "Applied timezone offset"
        );
        Ok(corrected)
    }

    /// Assembles the image observed at `time`.
    ///
    /// `None` uses the configured default level.
    pub async fn image_at(
        &self,
        time: DateTime<Utc>,
        level: Option<ZoomLevel>,
    ) -> Result<RgbaImage, ClientError> {
        let level = level.unwrap_or(self.config.level());
        let image = self
            .assembler
            .assemble(time, level, self.config.workers())
            .await?;
        Ok(image)
    }

    /// Resolves the newest observation and assembles it.
    ///
    /// Returns the (possibly corrected) time used alongside the image.
    pub async fn latest_image(
        &self,
        level: Option<ZoomLevel>,
        offset_time: bool,
    ) -> Result<(DateTime<Utc>, RgbaImage), ClientError> {
        let time = self.latest_time(offset_time).await?;
        let image = self.image_at(time, level).await?;
        Ok((time, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockHttpClient;
    use chrono::{FixedOffset, TimeZone};
    use image::Rgba;
    use parking_lot::Mutex;

    /// Records the times it is asked for and returns grey tiles.
    struct RecordingSource {
        times: Mutex<Vec<DateTime<Utc>>>,
    }

    impl TileSource for RecordingSource {
        fn tile_size(&self) -> u32 {
            2
        }

        async fn fetch(
            &self,
            time: DateTime<Utc>,
            _level: ZoomLevel,
            _x: u32,
            _y: u32,
        ) -> Result<RgbaImage, FetchError> {
            self.times.lock().push(time);
            Ok(RgbaImage::from_pixel(2, 2, Rgba([128, 128, 128, 255])))
        }
    }

    fn client(body: &str, config: MosaicConfig) -> HimawariClient<RecordingSource, MockHttpClient> {
        let source = Arc::new(RecordingSource {
            times: Mutex::new(Vec::new()),
        });
        let resolver = LatestResolver::new(MockHttpClient::new(Ok(body.as_bytes().to_vec())));
        HimawariClient::new(source, resolver, config)
    }

    const BODY: &str = r#"{"date":"2023-11-05 14:20:00"}"#;

    #[tokio::test]
    async fn test_latest_image_uses_default_level() {
        let client = client(BODY, MosaicConfig::new().with_level(ZoomLevel::new(2).unwrap()));

        let (time, image) = client.latest_image(None, false).await.unwrap();

        assert_eq!(time, Utc.with_ymd_and_hms(2023, 11, 5, 14, 20, 0).unwrap());
        assert_eq!(image.dimensions(), (4, 4));
        let times = client.source().times.lock();
        assert_eq!(times.len(), 4);
        assert!(times.iter().all(|t| *t == time));
    }

    #[tokio::test]
    async fn test_image_at_explicit_level() {
        let client = client(BODY, MosaicConfig::new().with_workers(0));
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let image = client
            .image_at(time, Some(ZoomLevel::new(8).unwrap()))
            .await
            .unwrap();

        assert_eq!(image.dimensions(), (16, 16));
    }

    #[tokio::test]
    async fn test_offset_time_applies_reference_offset() {
        let reference = FixedOffset::east_opt(3 * 3600).unwrap();
        let client = client(BODY, MosaicConfig::new().with_reference_offset(reference));

        let corrected = client.latest_time(true).await.unwrap();

        let raw = Utc.with_ymd_and_hms(2023, 11, 5, 14, 20, 0).unwrap();
        assert_eq!(corrected, apply_offset(raw, local_offset(), reference));
    }

    #[tokio::test]
    async fn test_offset_time_defaults_to_sydney_zone() {
        let client = client(BODY, MosaicConfig::default());

        let corrected = client.latest_time(true).await.unwrap();

        let raw = Utc.with_ymd_and_hms(2023, 11, 5, 14, 20, 0).unwrap();
        let reference = crate::time::reference_offset_at(Utc::now());
        assert_eq!(corrected, apply_offset(raw, local_offset(), reference));
    }

    #[tokio::test]
    async fn test_latest_failure_is_surfaced() {
        let client = client("{}", MosaicConfig::default());

        let err = client.latest_image(None, false).await.unwrap_err();

        assert!(matches!(err, ClientError::Latest(LatestError::Json(_))));
        assert!(client.source().times.lock().is_empty());
    }

    #[test]
    fn test_from_config_builds() {
        let client = HimawariClient::from_config(
            MosaicConfig::new().with_tile_base_url("http://127.0.0.1:1/tiles"),
        )
        .unwrap();
        assert_eq!(client.config().tile_base_url(), "http://127.0.0.1:1/tiles");
    }
}
