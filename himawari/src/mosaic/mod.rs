//! Tile mosaic assembly.
//!
//! Fetches the `N × N` tiles of a zoom level through a [`TileSource`] and
//! places them into one canvas of `N·W × N·W` pixels.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 │  producer (row-major grid)   │
//!                 └──────────────┬───────────────┘
//!                                │ bounded queue        ▲ failure signal
//!              ┌─────────────────┼─────────────────┐    │ (stops dispatch)
//!              ▼                 ▼                 ▼    │
//!        ┌──────────┐      ┌──────────┐      ┌──────────┐
//!        │ worker 0 │      │ worker 1 │  …   │ worker n │──▶ first-error slot
//!        └────┬─────┘      └────┬─────┘      └────┬─────┘
//!             │ fetch + blit    │                 │
//!             ▼                 ▼                 ▼
//!        ┌───────────────────────────────────────────────┐
//!        │  SharedCanvas: disjoint W×W rectangles         │
//!        └───────────────────────────────────────────────┘
//! ```
//!
//! Level 1 skips the pool entirely, and a single worker runs the grid
//! sequentially. All three paths stop at the first failure.
//!
//! [`TileSource`]: crate::source::TileSource

mod assembler;
mod canvas;
mod error;
mod grid;

pub use assembler::{normalize_workers, MosaicAssembler};
pub use canvas::SharedCanvas;
pub use error::MosaicError;
pub use grid::{Grid, GridCoord};
