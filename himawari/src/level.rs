//! Zoom levels and tile geometry.
//!
//! A zoom level is the side length of the tile grid: level `N` is served as
//! `N × N` square tiles of [`TILE_SIZE`] pixels, so the assembled image is
//! `N·TILE_SIZE` pixels wide and high.

use std::fmt;
use thiserror::Error;

/// Width and height of a single tile in pixels.
pub const TILE_SIZE: u32 = 550;

/// Zoom levels published by the imagery server.
pub const SUPPORTED_LEVELS: [u32; 6] = [1, 2, 4, 8, 16, 20];

/// Level used when the caller does not pick one.
pub const DEFAULT_LEVEL: u32 = 4;

/// Error returned when a level outside [`SUPPORTED_LEVELS`] is requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported zoom level {0} (supported: 1, 2, 4, 8, 16, 20)")]
pub struct UnsupportedLevel(pub u32);

/// A validated zoom level.
///
/// # Example
///
/// ```
/// use himawari::level::ZoomLevel;
///
/// let level = ZoomLevel::new(4).unwrap();
/// assert_eq!(level.get(), 4);
/// assert_eq!(level.tile_count(), 16);
/// assert!(ZoomLevel::new(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoomLevel(u32);

impl ZoomLevel {
    /// Validates `level` against the supported set.
    pub fn new(level: u32) -> Result<Self, UnsupportedLevel> {
        if SUPPORTED_LEVELS.contains(&level) {
            Ok(Self(level))
        } else {
            Err(UnsupportedLevel(level))
        }
    }

    /// Like [`ZoomLevel::new`], but maps `0` to the default level.
    pub fn or_default(level: u32) -> Result<Self, UnsupportedLevel> {
        if level == 0 {
            Ok(Self::default())
        } else {
            Self::new(level)
        }
    }

    /// Grid side length.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of tiles in the grid (`level²`).
    pub fn tile_count(self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    /// Side length in pixels of the assembled image for `tile_size` tiles.
    pub fn canvas_size(self, tile_size: u32) -> u32 {
        self.0 * tile_size
    }

    /// Iterates over all supported levels in ascending order.
    pub fn all() -> impl Iterator<Item = ZoomLevel> {
        SUPPORTED_LEVELS.iter().map(|&l| ZoomLevel(l))
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(DEFAULT_LEVEL)
    }
}

impl TryFrom<u32> for ZoomLevel {
    type Error = UnsupportedLevel;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
