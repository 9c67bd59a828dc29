//! Error types for mosaic assembly.

use super::GridCoord;
use crate::source::FetchError;
use thiserror::Error;

/// Errors returned by [`MosaicAssembler::assemble`](super::MosaicAssembler::assemble).
///
/// Only the first failure observed during an assembly is reported; failures
/// from other in-flight workers are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MosaicError {
    /// A tile fetch failed
    #[error("tile ({x}, {y}) failed: {source}")]
    Tile { x: u32, y: u32, source: FetchError },

    /// A tile source returned a raster of the wrong size
    #[error("tile ({x}, {y}) is {width}×{height}, expected {expected}×{expected}")]
    TileSize {
        x: u32,
        y: u32,
        expected: u32,
        width: u32,
        height: u32,
    },

    /// A worker task panicked or was aborted
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl MosaicError {
    pub(crate) fn tile(coord: GridCoord, source: FetchError) -> Self {
        MosaicError::Tile {
            x: coord.x,
            y: coord.y,
            source,
        }
    }

    /// The underlying fetch failure, if this error came from the tile source.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            MosaicError::Tile { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Grid coordinate of the failing tile, when known.
    pub fn coord(&self) -> Option<GridCoord> {
        match self {
            MosaicError::Tile { x, y, .. } | MosaicError::TileSize { x, y, .. } => {
                Some(GridCoord::new(*x, *y))
            }
            MosaicError::Worker(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_tile_error_display_and_source() {
        let err = MosaicError::tile(
            GridCoord::new(1, 2),
            FetchError::Transport("connection reset".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "tile (1, 2) failed: transport error: connection reset"
        );
        assert!(err.source().is_some());
        assert_eq!(err.coord(), Some(GridCoord::new(1, 2)));
        assert_eq!(
            err.fetch_error(),
            Some(&FetchError::Transport("connection reset".to_string()))
        );
    }

    #[test]
    fn test_tile_size_display() {
        let err = MosaicError::TileSize {
            x: 0,
            y: 0,
            expected: 550,
            width: 512,
            height: 512,
        };
        assert_eq!(err.to_string(), "tile (0, 0) is 512×512, expected 550×550");
        assert!(err.fetch_error().is_none());
    }

    #[test]
    fn test_worker_error_has_no_coord() {
        let err = MosaicError::Worker("panicked".to_string());
        assert_eq!(err.coord(), None);
        assert_eq!(err.to_string(), "worker task failed: panicked");
    }
}
