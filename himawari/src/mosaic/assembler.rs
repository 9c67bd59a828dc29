//! Bounded worker pool that assembles a tile grid into one raster.

use super::{Grid, GridCoord, MosaicError, SharedCanvas};
use crate::level::ZoomLevel;
use crate::source::TileSource;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

/// Capacity of the coordinate queue between the producer and the workers.
const QUEUE_CAPACITY: usize = 1;

/// Clamps a requested worker count to `1..=level²`.
///
/// Zero and negative requests run sequentially; requests above the number of
/// tiles are reduced so no worker starts idle.
///
/// ```
/// use himawari::level::ZoomLevel;
/// use himawari::mosaic::normalize_workers;
///
/// let level = ZoomLevel::new(2).unwrap();
/// assert_eq!(normalize_workers(-3, level), 1);
/// assert_eq!(normalize_workers(0, level), 1);
/// assert_eq!(normalize_workers(3, level), 3);
/// assert_eq!(normalize_workers(1000, level), 4);
/// ```
pub fn normalize_workers(requested: isize, level: ZoomLevel) -> usize {
    if requested <= 0 {
        1
    } else {
        (requested as usize).min(level.tile_count())
    }
}

/// Slot that keeps the first failure and drops the rest.
#[derive(Default)]
struct FirstError(Mutex<Option<MosaicError>>);

impl FirstError {
    /// Stores `err` if nothing was stored yet. Returns whether it was kept.
    fn record(&self, err: MosaicError) -> bool {
        let mut slot = self.0.lock();
        if slot.is_none() {
            *slot = Some(err);
            true
        } else {
            false
        }
    }

    fn take(&self) -> Option<MosaicError> {
        self.0.lock().take()
    }
}

/// Everything a pool worker needs, shared by all workers of one assembly.
struct PoolShared<S> {
    source: Arc<S>,
    canvas: SharedCanvas,
    queue: tokio::sync::Mutex<mpsc::Receiver<GridCoord>>,
    failed: CancellationToken,
    first_error: FirstError,
    time: DateTime<Utc>,
    level: ZoomLevel,
}

/// Fetches every tile of a grid from a [`TileSource`] and assembles them.
///
/// The assembler returns either a complete canvas or the first error; a
/// partially populated image is never handed out.
///
/// # Example
///
/// ```ignore
/// use himawari::mosaic::MosaicAssembler;
/// use himawari::source::{HimawariTileSource, ReqwestClient};
/// use std::sync::Arc;
///
/// let source = Arc::new(HimawariTileSource::new(ReqwestClient::new()?));
/// let assembler = MosaicAssembler::new(source);
/// let image = assembler.assemble(time, ZoomLevel::new(4)?, 5).await?;
/// assert_eq!(image.width(), 4 * 550);
/// ```
pub struct MosaicAssembler<S: TileSource> {
    source: Arc<S>,
}

impl<S: TileSource> Clone for MosaicAssembler<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: TileSource> MosaicAssembler<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Assembles the `level × level` grid observed at `time`.
    ///
    /// `workers` is normalized with [`normalize_workers`]. Level 1 fetches
    /// its single tile directly and returns it unchanged. A normalized count
    /// of one walks the grid sequentially in row-major order. Larger counts
    /// run a pool of that many workers fed by a single producer.
    ///
    /// On the first failure no further coordinates are dispatched. Fetches
    /// that are already in flight run to completion and their outcome is
    /// discarded. All workers are joined before this returns.
    #[instrument(skip(self), fields(tile_size = self.source.tile_size()))]
    pub async fn assemble(
        &self,
        time: DateTime<Utc>,
        level: ZoomLevel,
        workers: isize,
    ) -> Result<RgbaImage, MosaicError> {
        let start = Instant::now();

        let result = if level.get() == 1 {
            self.assemble_single(time, level).await
        } else {
            match normalize_workers(workers, level) {
                1 => self.assemble_sequential(time, level).await,
                n => self.assemble_pooled(time, level, n).await,
            }
        };

        match &result {
            Ok(image) => info!(
                level = level.get(),
                tiles = level.tile_count(),
                width = image.width(),
                height = image.height(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Mosaic assembled"
            ),
            Err(e) => warn!(
                level = level.get(),
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Mosaic assembly failed"
            ),
        }

        result
    }

    /// Level 1: the only tile is the canvas.
    async fn assemble_single(
        &self,
        time: DateTime<Utc>,
        level: ZoomLevel,
    ) -> Result<RgbaImage, MosaicError> {
        let origin = GridCoord::new(0, 0);
        let tile = self
            .source
            .fetch(time, level, origin.x, origin.y)
            .await
            .map_err(|e| MosaicError::tile(origin, e))?;

        let expected = self.source.tile_size();
        if tile.width() != expected || tile.height() != expected {
            return Err(MosaicError::TileSize {
                x: origin.x,
                y: origin.y,
                expected,
                width: tile.width(),
                height: tile.height(),
            });
        }

        Ok(tile)
    }

    async fn assemble_sequential(
        &self,
        time: DateTime<Utc>,
        level: ZoomLevel,
    ) -> Result<RgbaImage, MosaicError> {
        let canvas = SharedCanvas::new(level, self.source.tile_size());

        for coord in Grid::new(level).coords() {
            let tile = self
                .source
                .fetch(time, level, coord.x, coord.y)
                .await
                .map_err(|e| MosaicError::tile(coord, e))?;
            canvas.blit(coord, &tile)?;
            trace!(x = coord.x, y = coord.y, "Tile placed");
        }

        Ok(canvas.into_image())
    }

    async fn assemble_pooled(
        &self,
        time: DateTime<Utc>,
        level: ZoomLevel,
        worker_count: usize,
    ) -> Result<RgbaImage, MosaicError> {
        let (tx, rx) = mpsc::channel::<GridCoord>(QUEUE_CAPACITY);
        let shared = Arc::new(PoolShared {
            source: Arc::clone(&self.source),
            canvas: SharedCanvas::new(level, self.source.tile_size()),
            queue: tokio::sync::Mutex::new(rx),
            failed: CancellationToken::new(),
            first_error: FirstError::default(),
            time,
            level,
        });

        debug!(
            workers = worker_count,
            tiles = level.tile_count(),
            "Starting tile worker pool"
        );

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            workers.spawn(run_worker(id, Arc::clone(&shared)));
        }

        let mut dispatched = 0usize;
        for coord in Grid::new(level).coords() {
            tokio::select! {
                biased;
                _ = shared.failed.cancelled() => {
                    debug!(dispatched, "Failure observed, stopping dispatch");
                    break;
                }
                // `shared` keeps the receiver alive, so sends never fail; only
                // the failure signal ends dispatch early.
                _ = tx.send(coord) => {
                    dispatched += 1;
                }
            }
        }
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(join_err) = joined {
                warn!(error = %join_err, "Tile worker panicked");
                shared
                    .first_error
                    .record(MosaicError::Worker(join_err.to_string()));
            }
        }

        if let Some(err) = shared.first_error.take() {
            return Err(err);
        }

        let shared = Arc::try_unwrap(shared).map_err(|_| {
            MosaicError::Worker("canvas still referenced after workers joined".to_string())
        })?;
        Ok(shared.canvas.into_image())
    }
}

/// Pulls coordinates until the queue closes or a failure is signalled.
///
/// A worker whose own fetch fails records the error, raises the failure
/// signal, and stops pulling work.
async fn run_worker<S: TileSource>(id: usize, shared: Arc<PoolShared<S>>) {
    // Raises the failure signal if this worker panics.
    let panic_guard = shared.failed.clone().drop_guard();
    let mut placed = 0usize;
    debug!(worker = id, "Tile worker started");

    loop {
        let next = {
            let mut queue = shared.queue.lock().await;
            tokio::select! {
                biased;
                _ = shared.failed.cancelled() => None,
                coord = queue.recv() => coord,
            }
        };
        let Some(coord) = next else {
            break;
        };

        let outcome = match shared
            .source
            .fetch(shared.time, shared.level, coord.x, coord.y)
            .await
        {
            Ok(tile) => shared.canvas.blit(coord, &tile),
            Err(e) => Err(MosaicError::tile(coord, e)),
        };

        if let Err(err) = outcome {
            warn!(worker = id, x = coord.x, y = coord.y, error = %err, "Tile worker failed");
            shared.first_error.record(err);
            shared.failed.cancel();
            break;
        }
        placed += 1;
    }

    panic_guard.disarm();
    debug!(worker = id, placed, "Tile worker finished");
}
