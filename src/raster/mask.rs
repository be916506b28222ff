//! Prediction mask writing.

use crate::constants::{MASK_BACKGROUND, MASK_FOREGROUND};
use crate::error::{Error, Result};
use ndarray::ArrayView2;
use std::path::Path;

/// Write a binary mask as an 8-bit grayscale PNG.
///
/// Logical 0/1 values are stored as 0/255 so the masks are viewable in
/// ordinary image tools; the georeferencing pass reads them back the same
/// way.
pub fn save_mask(mask: ArrayView2<'_, u8>, path: &Path) -> Result<()> {
    let (height, width) = mask.dim();
    let mut img = image::GrayImage::new(width as u32, height as u32);

    for ((row, col), &value) in mask.indexed_iter() {
        let pixel = if value > 0 {
            MASK_FOREGROUND
        } else {
            MASK_BACKGROUND
        };
        img.put_pixel(col as u32, row as u32, image::Luma([pixel]));
    }

    img.save(path).map_err(|e| Error::MaskWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_save_mask_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");

        let mut mask = Array2::<u8>::zeros((4, 6));
        mask[[0, 0]] = 1;
        mask[[3, 5]] = 1;

        save_mask(mask.view(), &path).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(img.get_pixel(0, 0)[0], MASK_FOREGROUND);
        assert_eq!(img.get_pixel(5, 3)[0], MASK_FOREGROUND);
        assert_eq!(img.get_pixel(2, 2)[0], MASK_BACKGROUND);
    }

    #[test]
    fn test_save_mask_unwritable_path() {
        let mask = Array2::<u8>::zeros((2, 2));
        let err = save_mask(mask.view(), Path::new("/nonexistent/dir/mask.png"));
        assert!(matches!(err, Err(Error::MaskWrite { .. })));
    }
}
