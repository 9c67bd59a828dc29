//! Tile grid coordinates.

use crate::level::ZoomLevel;
use std::fmt;

/// Position of a tile in the grid. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Top-left pixel of this tile's rectangle on the canvas.
    pub fn pixel_origin(&self, tile_size: u32) -> (u32, u32) {
        (self.x * tile_size, self.y * tile_size)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The `N × N` set of coordinates for a zoom level.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    side: u32,
}

impl Grid {
    pub fn new(level: ZoomLevel) -> Self {
        Self { side: level.get() }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn len(&self) -> usize {
        (self.side as usize) * (self.side as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.side == 0
    }

    /// Every coordinate exactly once, row-major (`y` outer, `x` inner).
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> {
        let side = self.side;
        (0..side).flat_map(move |y| (0..side).map(move |x| GridCoord { x, y }))
    }
}
