//! Himawari - Full-disk Earth imagery from the Himawari geostationary satellite
//!
//! The imagery server publishes every observation as a square grid of
//! 550×550 PNG tiles. This library resolves the newest observation time,
//! fetches the grid concurrently and assembles it into one raster.
//!
//! # High-Level API
//!
//! For most use cases, the [`client`] module provides a simplified facade:
//!
//! ```ignore
//! use himawari::client::HimawariClient;
//! use himawari::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let client = HimawariClient::from_config(config.mosaic)?;
//!
//! let (time, image) = client.latest_image(None, config.offset_time).await?;
//! image.save("earth.png")?;
//! ```
//!
//! Lower-level pieces are available on their own: [`mosaic::MosaicAssembler`]
//! works with any [`source::TileSource`], and [`latest::LatestResolver`]
//! only needs an [`source::AsyncHttpClient`].

pub mod client;
pub mod config;
pub mod latest;
pub mod level;
pub mod logging;
pub mod mosaic;
pub mod source;
pub mod time;

/// Version of the himawari library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
