//! GeoTIFF output for prediction masks.

use crate::constants::{extensions, geotiff_tags as tags, mercator};
use crate::error::{Error, Result};
use crate::georef::bounds::{TileBounds, bounds_from_stem};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;
use tracing::{debug, info};

/// Rewrite every mask PNG in `dir` as a georeferenced GeoTIFF.
///
/// Directory-scoped by contract: runs once, after all batches have
/// completed, and relies only on the filename convention. Returns the
/// number of rasters written. Any failure is fatal to the run.
pub fn georeference_directory(dir: &Path) -> Result<usize> {
    let masks = collect_masks(dir)?;
    info!("Georeferencing {} mask(s) in {}", masks.len(), dir.display());

    for mask_path in &masks {
        let stem = file_stem(mask_path);
        let bounds = bounds_from_stem(&stem)?;
        let out_path = mask_path.with_extension(extensions::TIF);
        debug!("Writing {}", out_path.display());
        write_geotiff(mask_path, &out_path, bounds)?;
    }

    Ok(masks.len())
}

/// Collect mask PNGs in stable order.
fn collect_masks(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut masks = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extensions::PNG))
        {
            masks.push(path);
        }
    }
    masks.sort();
    Ok(masks)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned())
}

/// Re-encode one grayscale mask as a single-band GeoTIFF tagged with
/// EPSG:3857.
fn write_geotiff(mask_path: &Path, out_path: &Path, bounds: TileBounds) -> Result<()> {
    let mask = image::open(mask_path)
        .map_err(|e| Error::GeoTiffWrite {
            path: out_path.to_path_buf(),
            source: Box::new(e),
        })?
        .to_luma8();
    let (width, height) = mask.dimensions();

    let file = File::create(out_path)?;
    let mut encoder =
        TiffEncoder::new(BufWriter::new(file)).map_err(|e| Error::GeoTiffWrite {
            path: out_path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut image = encoder
        .new_image::<colortype::Gray8>(width, height)
        .map_err(|e| Error::GeoTiffWrite {
            path: out_path.to_path_buf(),
            source: Box::new(e),
        })?;

    // Pixel size in meters, anchored at the tile's north-west corner.
    let pixel_x = (bounds.x_max - bounds.x_min) / f64::from(width);
    let pixel_y = (bounds.y_max - bounds.y_min) / f64::from(height);
    let pixel_scale = [pixel_x, pixel_y, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, bounds.x_min, bounds.y_max, 0.0];

    // GeoKeyDirectory: projected CRS, PixelIsArea, EPSG:3857, meters.
    let geo_keys: [u16; 20] = [
        1,
        1,
        0,
        4,
        tags::KEY_MODEL_TYPE,
        0,
        1,
        1,
        tags::KEY_RASTER_TYPE,
        0,
        1,
        1,
        tags::KEY_PROJECTED_CS,
        0,
        1,
        mercator::EPSG_CODE,
        tags::KEY_LINEAR_UNITS,
        0,
        1,
        9001,
    ];

    let wrap = |e: tiff::TiffError| Error::GeoTiffWrite {
        path: out_path.to_path_buf(),
        source: Box::new(e),
    };

    {
        let encoder = image.encoder();
        encoder
            .write_tag(Tag::Unknown(tags::MODEL_PIXEL_SCALE), &pixel_scale[..])
            .map_err(wrap)?;
        encoder
            .write_tag(Tag::Unknown(tags::MODEL_TIEPOINT), &tiepoint[..])
            .map_err(wrap)?;
        encoder
            .write_tag(Tag::Unknown(tags::GEO_KEY_DIRECTORY), &geo_keys[..])
            .map_err(wrap)?;
    }

    image.write_data(mask.as_raw()).map_err(wrap)
}
