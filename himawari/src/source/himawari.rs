//! HTTP tile source for the Himawari full-disk archive.

use super::http::AsyncHttpClient;
use super::url::{tile_url, DEFAULT_TILE_BASE_URL};
use super::{decode_tile, FetchError, TileSource};
use crate::level::{ZoomLevel, TILE_SIZE};
use chrono::{DateTime, Utc};
use image::RgbaImage;
use tracing::trace;

/// Fetches PNG tiles over HTTP and decodes them to RGBA.
///
/// # Example
///
/// ```ignore
/// use himawari::source::{HimawariTileSource, ReqwestClient};
///
/// let source = HimawariTileSource::new(ReqwestClient::new()?);
/// let tile = source.fetch(time, ZoomLevel::new(4)?, 1, 2).await?;
/// ```
pub struct HimawariTileSource<C: AsyncHttpClient> {
    client: C,
    base_url: String,
    tile_size: u32,
}

impl<C: AsyncHttpClient> HimawariTileSource<C> {
    /// Creates a source for the public archive with 550 px tiles.
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: DEFAULT_TILE_BASE_URL.to_string(),
            tile_size: TILE_SIZE,
        }
    }

    /// Overrides the archive base URL (mirrors, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the tile width requested from the archive.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Address of tile `(x, y)` for this source.
    pub fn url(&self, time: DateTime<Utc>, level: ZoomLevel, x: u32, y: u32) -> String {
        tile_url(&self.base_url, &time, level, self.tile_size, x, y)
    }
}

impl<C: AsyncHttpClient> TileSource for HimawariTileSource<C> {
    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    async fn fetch(
        &self,
        time: DateTime<Utc>,
        level: ZoomLevel,
        x: u32,
        y: u32,
    ) -> Result<RgbaImage, FetchError> {
        let url = self.url(time, level, x, y);
        let bytes = self.client.get(&url).await?;
        trace!(x, y, bytes = bytes.len(), "Tile payload received");
        decode_tile(&bytes, self.tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::http::tests::MockHttpClient;
    use crate::source::tests::encode_png;
    use chrono::TimeZone;
    use image::Rgba;

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 7, 14, 2, 50, 0).unwrap()
    }

    fn level(n: u32) -> ZoomLevel {
        ZoomLevel::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_decodes_tile() {
        let tile = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let mock = MockHttpClient::new(Ok(encode_png(&tile)));
        let source = HimawariTileSource::new(mock.clone()).with_tile_size(4);

        let fetched = source.fetch(time(), level(2), 1, 0).await.unwrap();

        assert_eq!(fetched, tile);
        assert_eq!(
            mock.requested(),
            vec!["http://himawari8.nict.go.jp/img/D531106/2d/4/2022/07/14/025000_1_0.png"]
        );
    }

    #[tokio::test]
    async fn test_fetch_propagates_status_error() {
        let status = FetchError::Status {
            status: 404,
            url: "x".to_string(),
        };
        let source = HimawariTileSource::new(MockHttpClient::new(Err(status.clone())));

        assert_eq!(source.fetch(time(), level(1), 0, 0).await, Err(status));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_payload() {
        let source = HimawariTileSource::new(MockHttpClient::new(Ok(b"<html>".to_vec())));

        let err = source.fetch(time(), level(1), 0, 0).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_wrong_dimensions() {
        let tile = RgbaImage::new(4, 4);
        let source = HimawariTileSource::new(MockHttpClient::new(Ok(encode_png(&tile))));

        let err = source.fetch(time(), level(1), 0, 0).await.unwrap_err();
        assert!(matches!(err, FetchError::Dimensions { expected: 550, .. }));
    }

    #[test]
    fn test_custom_base_url() {
        let source = HimawariTileSource::new(MockHttpClient::new(Ok(vec![])))
            .with_base_url("http://mirror.local/D531106");
        assert_eq!(
            source.url(time(), level(4), 3, 3),
            "http://mirror.local/D531106/4d/550/2022/07/14/025000_3_3.png"
        );
        assert_eq!(source.tile_size(), TILE_SIZE);
    }
}
