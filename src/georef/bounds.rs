//! Web Mercator bounds from tile filenames.

use crate::constants::mercator::{MAX_ZOOM, ORIGIN_SHIFT};
use crate::error::{Error, Result};

/// Axis-aligned tile bounds in EPSG:3857 meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Western edge.
    pub x_min: f64,
    /// Southern edge.
    pub y_min: f64,
    /// Eastern edge.
    pub x_max: f64,
    /// Northern edge.
    pub y_max: f64,
}

/// Derive EPSG:3857 bounds from a `{prefix}-{x}-{y}-{zoom}` file stem.
///
/// Input tiles follow the slippy-map naming convention of the imagery
/// source (e.g. `OAM-73507-49509-17`): the last three dash-separated fields
/// are tile x, tile y, and zoom level, with y counted from the north.
pub fn bounds_from_stem(stem: &str) -> Result<TileBounds> {
    let mut fields = stem.rsplitn(4, '-');

    let zoom: u32 = parse_field(fields.next(), stem)?;
    let y: u64 = parse_field(fields.next(), stem)?;
    let x: u64 = parse_field(fields.next(), stem)?;
    if fields.next().is_none() {
        return Err(Error::TileName {
            stem: stem.to_string(),
        });
    }

    let tiles_per_axis = if zoom <= MAX_ZOOM {
        1u64 << zoom
    } else {
        return Err(Error::TileName {
            stem: stem.to_string(),
        });
    };
    if x >= tiles_per_axis || y >= tiles_per_axis {
        return Err(Error::TileName {
            stem: stem.to_string(),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let span = 2.0 * ORIGIN_SHIFT / tiles_per_axis as f64;
    #[allow(clippy::cast_precision_loss)]
    let x_min = x as f64 * span - ORIGIN_SHIFT;
    #[allow(clippy::cast_precision_loss)]
    let y_max = ORIGIN_SHIFT - y as f64 * span;

    Ok(TileBounds {
        x_min,
        y_min: y_max - span,
        x_max: x_min + span,
        y_max,
    })
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, stem: &str) -> Result<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| Error::TileName {
            stem: stem.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_zero_covers_world() {
        let bounds = bounds_from_stem("OAM-0-0-0").unwrap();
        assert!((bounds.x_min - -ORIGIN_SHIFT).abs() < 1e-6);
        assert!((bounds.x_max - ORIGIN_SHIFT).abs() < 1e-6);
        assert!((bounds.y_max - ORIGIN_SHIFT).abs() < 1e-6);
        assert!((bounds.y_min - -ORIGIN_SHIFT).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_one_quadrants() {
        // Tile (1, 0) at zoom 1 is the north-east quadrant.
        let bounds = bounds_from_stem("OAM-1-0-1").unwrap();
        assert!(bounds.x_min.abs() < 1e-6);
        assert!((bounds.x_max - ORIGIN_SHIFT).abs() < 1e-6);
        assert!(bounds.y_min.abs() < 1e-6);
        assert!((bounds.y_max - ORIGIN_SHIFT).abs() < 1e-6);
    }

    #[test]
    fn test_prefix_with_dashes() {
        // Only the trailing three fields are positional; the prefix may
        // itself contain dashes.
        let with_dashes = bounds_from_stem("some-area-name-1-0-1").unwrap();
        let plain = bounds_from_stem("OAM-1-0-1").unwrap();
        assert_eq!(with_dashes, plain);
    }

    #[test]
    fn test_bounds_are_square() {
        let bounds = bounds_from_stem("OAM-73507-49509-17").unwrap();
        let width = bounds.x_max - bounds.x_min;
        let height = bounds.y_max - bounds.y_min;
        assert!((width - height).abs() < 1e-6);
        assert!(width > 0.0);
    }

    #[test]
    fn test_rejects_malformed_stems() {
        assert!(bounds_from_stem("mask").is_err());
        assert!(bounds_from_stem("1-2-3").is_err());
        assert!(bounds_from_stem("OAM-a-b-c").is_err());
        assert!(bounds_from_stem("OAM-1-2-99").is_err());
        // x out of range for the zoom level
        assert!(bounds_from_stem("OAM-2-0-1").is_err());
    }
}
