//! Single batch processing.

use crate::constants::extensions;
use crate::error::Result;
use crate::inference::{Segmenter, binarize_scores};
use crate::raster::{open_tiles, save_mask};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Process one batch of tiles: decode, infer, binarize, write masks.
///
/// Produces exactly one `{stem}.png` mask in `prediction_dir` per input
/// path, independent of how the caller partitioned the batches. Any
/// failure inside the batch fails the whole batch; the caller decides
/// whether that aborts the run.
pub fn process_batch(
    paths: &[PathBuf],
    segmenter: &Segmenter,
    prediction_dir: &Path,
) -> Result<usize> {
    if paths.is_empty() {
        return Ok(0);
    }

    debug!(
        "Processing batch of {} tile(s), starting at {}",
        paths.len(),
        paths[0].display()
    );

    let tiles = open_tiles(paths)?;
    let scores = segmenter.predict_batch(&tiles)?;
    let masks = binarize_scores(&scores);

    for (path, mask) in paths.iter().zip(&masks) {
        let stem = path
            .file_stem()
            .map_or_else(|| std::borrow::Cow::Borrowed("mask"), |s| s.to_string_lossy());
        let mask_path = prediction_dir.join(format!("{stem}.{}", extensions::PNG));
        save_mask(mask.view(), &mask_path)?;
    }

    Ok(paths.len())
}
