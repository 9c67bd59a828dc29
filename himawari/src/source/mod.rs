//! Tile sources.
//!
//! A [`TileSource`] turns a grid coordinate at a given observation time into
//! a decoded tile raster. The mosaic assembler only depends on this trait;
//! how tiles are addressed and transported is the source's business.
//!
//! ```text
//! ┌──────────────────────┐      fetch(time, level, x, y)      ┌──────────────┐
//! │   MosaicAssembler    │ ─────────────────────────────────▶ │  TileSource  │
//! └──────────────────────┘                                     └──────┬───────┘
//!                                                                     │
//!                                          ┌──────────────────────────┴──┐
//!                                          ▼                             ▼
//!                               ┌─────────────────────┐       ┌──────────────────┐
//!                               │ HimawariTileSource  │       │ test sources     │
//!                               │ (AsyncHttpClient)   │       │ (solid colours)  │
//!                               └─────────────────────┘       └──────────────────┘
//! ```

mod himawari;
mod http;
mod url;

pub use himawari::HimawariTileSource;
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use url::{tile_url, DEFAULT_TILE_BASE_URL};

#[cfg(test)]
pub use http::tests::MockHttpClient;

use crate::level::ZoomLevel;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use std::future::Future;
use thiserror::Error;

/// Errors produced while fetching a single tile.
///
/// The assembler treats every variant the same way; the distinction exists
/// for callers and logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Payload was not a decodable image
    #[error("image decode error: {0}")]
    Decode(String),

    /// Payload decoded to a raster of the wrong size
    #[error("tile is {width}×{height}, expected {expected}×{expected}")]
    Dimensions {
        expected: u32,
        width: u32,
        height: u32,
    },
}

/// Source of square tile rasters for a tile grid.
///
/// Implementations must return rasters of exactly
/// [`tile_size`](TileSource::tile_size) pixels on each side, or an error.
pub trait TileSource: Send + Sync + 'static {
    /// Side length of every tile in pixels.
    fn tile_size(&self) -> u32;

    /// Fetches and decodes tile `(x, y)` of the `level` grid at `time`.
    ///
    /// `x` and `y` are in `0..level`.
    fn fetch(
        &self,
        time: DateTime<Utc>,
        level: ZoomLevel,
        x: u32,
        y: u32,
    ) -> impl Future<Output = Result<RgbaImage, FetchError>> + Send;
}

/// Decodes an encoded tile and checks its dimensions.
pub fn decode_tile(bytes: &[u8], tile_size: u32) -> Result<RgbaImage, FetchError> {
    let tile = image::load_from_memory(bytes)
        .map_err(|e| FetchError::Decode(e.to_string()))?
        .to_rgba8();

    if tile.width() != tile_size || tile.height() != tile_size {
        return Err(FetchError::Dimensions {
            expected: tile_size,
            width: tile.width(),
            height: tile.height(),
        });
    }

    Ok(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    pub(crate) fn encode_png(tile: &RgbaImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        tile.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();
        buffer
    }

    #[test]
    fn test_decode_tile_success() {
        let tile = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let decoded = decode_tile(&encode_png(&tile), 8).unwrap();
        assert_eq!(decoded, tile);
    }

    #[test]
    fn test_decode_tile_rejects_garbage() {
        let err = decode_tile(b"definitely not a png", 8).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_decode_tile_rejects_wrong_size() {
        let tile = RgbaImage::new(8, 4);
        let err = decode_tile(&encode_png(&tile), 8).unwrap_err();
        assert_eq!(
            err,
            FetchError::Dimensions {
                expected: 8,
                width: 8,
                height: 4
            }
        );
    }

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            status: 404,
            url: "http://example.com/a.png".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from http://example.com/a.png");
        assert_eq!(
            FetchError::Transport("reset".to_string()).to_string(),
            "transport error: reset"
        );
    }
}
