//! Input tile decoding.

use crate::constants::{TILE_CHANNELS, TILE_SIZE};
use crate::error::{Error, Result};
use ndarray::Array4;
use std::path::{Path, PathBuf};

/// Decode a batch of PNG tiles into a `(batch, height, width, channels)`
/// f32 array with values scaled to `[0, 1]`.
///
/// Every tile must be exactly `TILE_SIZE` x `TILE_SIZE` RGB; a decode
/// failure or a shape mismatch fails the whole batch.
pub fn open_tiles(paths: &[PathBuf]) -> Result<Array4<f32>> {
    let side = TILE_SIZE as usize;
    let mut tiles = Array4::<f32>::zeros((paths.len(), side, side, TILE_CHANNELS));

    for (idx, path) in paths.iter().enumerate() {
        let rgb = open_tile_rgb(path)?;
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (row, col) = (y as usize, x as usize);
            tiles[[idx, row, col, 0]] = f32::from(pixel[0]) / 255.0;
            tiles[[idx, row, col, 1]] = f32::from(pixel[1]) / 255.0;
            tiles[[idx, row, col, 2]] = f32::from(pixel[2]) / 255.0;
        }
    }

    Ok(tiles)
}

/// Decode a single tile and verify its geometry.
fn open_tile_rgb(path: &Path) -> Result<image::RgbImage> {
    let decoded = image::open(path).map_err(|e| Error::TileDecode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width != TILE_SIZE || height != TILE_SIZE {
        return Err(Error::TileShape {
            path: path.to_path_buf(),
            width,
            height,
            expected: TILE_SIZE,
        });
    }

    Ok(rgb)
}
