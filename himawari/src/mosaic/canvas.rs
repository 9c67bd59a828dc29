//! Output canvas shared by the worker pool.

use super::{GridCoord, MosaicError};
use crate::level::ZoomLevel;
use image::RgbaImage;
use parking_lot::Mutex;

/// The full mosaic raster, allocated once per assembly.
///
/// Each tile owns the rectangle `[x·W, (x+1)·W) × [y·W, (y+1)·W)`, and
/// workers only ever write their own, so writes never conflict. The rows of
/// one rectangle are not contiguous in the buffer and safe Rust cannot split
/// an `RgbaImage` into disjoint rectangles, so the whole image sits behind a
/// mutex. It is held for the copy of a single tile and never across a fetch.
pub struct SharedCanvas {
    image: Mutex<RgbaImage>,
    tile_size: u32,
    side: u32,
}

impl SharedCanvas {
    /// Allocates a transparent `(N·W) × (N·W)` canvas.
    pub fn new(level: ZoomLevel, tile_size: u32) -> Self {
        let size = level.canvas_size(tile_size);
        Self {
            image: Mutex::new(RgbaImage::new(size, size)),
            tile_size,
            side: level.get(),
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Copies `tile` into the rectangle owned by `coord`.
    ///
    /// Rejects tiles that are not exactly `W × W` and coordinates outside the
    /// grid, so a misbehaving source can never bleed into a neighbour.
    pub fn blit(&self, coord: GridCoord, tile: &RgbaImage) -> Result<(), MosaicError> {
        if tile.width() != self.tile_size || tile.height() != self.tile_size {
            return Err(MosaicError::TileSize {
                x: coord.x,
                y: coord.y,
                expected: self.tile_size,
                width: tile.width(),
                height: tile.height(),
            });
        }
        if coord.x >= self.side || coord.y >= self.side {
            return Err(MosaicError::Worker(format!(
                "coordinate {} outside {}×{} grid",
                coord, self.side, self.side
            )));
        }

        let (x, y) = coord.pixel_origin(self.tile_size);
        let mut image = self.image.lock();
        image::imageops::replace(&mut *image, tile, i64::from(x), i64::from(y));
        Ok(())
    }

    /// Hands back the raster once every writer is done.
    pub fn into_image(self) -> RgbaImage {
        self.image.into_inner()
    }
}
