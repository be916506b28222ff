//! Tile discovery, batch partitioning and parallel dispatch.

use crate::error::{Error, Result};
use crate::output::progress;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Outcome of a dispatched run.
#[derive(Debug, Default)]
pub struct RunStats {
    /// Number of batches that completed.
    pub batches_ok: usize,
    /// Number of batches that failed.
    pub batches_failed: usize,
    /// Number of masks written.
    pub masks_written: usize,
}

/// Collect input tiles: every `*.png` directly inside `input_path`,
/// non-recursive, sorted by path for deterministic batching.
pub fn collect_input_tiles(input_path: &Path) -> Result<Vec<PathBuf>> {
    let mut tiles = Vec::new();

    for entry in std::fs::read_dir(input_path)? {
        let path = entry?.path();
        if path.is_file() && is_png(&path) {
            tiles.push(path);
        }
    }

    tiles.sort();
    Ok(tiles)
}

fn is_png(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new("png")))
}

/// Partition tiles into fixed-size batches, stable left-to-right: batch `i`
/// holds tiles `[i * batch_size, (i + 1) * batch_size)`.
pub fn partition_batches(tiles: &[PathBuf], batch_size: usize) -> Vec<&[PathBuf]> {
    tiles.chunks(batch_size.max(1)).collect()
}

/// Fan batches out over a bounded worker pool and block until all have
/// completed.
///
/// `run_batch` processes one batch and returns the number of masks it
/// wrote. Completion order between batches carries no meaning; correctness
/// depends only on the per-tile filename correspondence. With `fail_fast`
/// the first batch error aborts the run; otherwise failed batches are
/// logged and the rest continue, and the tally is reported in the returned
/// stats.
pub fn run_batches<F>(
    tiles: &[PathBuf],
    batch_size: usize,
    workers: usize,
    run_batch: F,
    progress: Option<&indicatif::ProgressBar>,
    fail_fast: bool,
) -> Result<RunStats>
where
    F: Fn(&[PathBuf]) -> Result<usize> + Sync,
{
    let batches = partition_batches(tiles, batch_size);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::WorkerPool {
            reason: e.to_string(),
        })?;

    if fail_fast {
        let written = std::sync::atomic::AtomicUsize::new(0);
        pool.install(|| {
            batches.par_iter().try_for_each(|batch| {
                let count = run_one(batch, &run_batch)?;
                written.fetch_add(count, std::sync::atomic::Ordering::Relaxed);
                progress::inc_progress(progress);
                Ok::<_, Error>(())
            })
        })?;

        let masks_written = written.into_inner();
        return Ok(RunStats {
            batches_ok: batches.len(),
            batches_failed: 0,
            masks_written,
        });
    }

    let outcomes: Vec<Result<usize>> = pool.install(|| {
        batches
            .par_iter()
            .map(|batch| {
                let outcome = run_one(batch, &run_batch);
                if let Err(ref e) = outcome {
                    error!("{e}");
                }
                progress::inc_progress(progress);
                outcome
            })
            .collect()
    });

    let mut stats = RunStats::default();
    for outcome in outcomes {
        match outcome {
            Ok(count) => {
                stats.batches_ok += 1;
                stats.masks_written += count;
            }
            Err(_) => stats.batches_failed += 1,
        }
    }

    if stats.batches_failed > 0 {
        warn!(
            "{} of {} batch(es) failed",
            stats.batches_failed,
            batches.len()
        );
    }

    Ok(stats)
}

fn run_one<F>(batch: &[PathBuf], run_batch: &F) -> Result<usize>
where
    F: Fn(&[PathBuf]) -> Result<usize>,
{
    run_batch(batch).map_err(|e| Error::BatchFailed {
        first_tile: batch.first().cloned().unwrap_or_default(),
        source: Box::new(e),
    })
}
