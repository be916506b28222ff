//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "tilemask";

/// Edge length of an input tile in pixels. Tiles are square.
pub const TILE_SIZE: u32 = 256;

/// Number of color channels in an input tile (RGB).
pub const TILE_CHANNELS: usize = 3;

/// Default number of tiles per inference batch.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Maximum allowed batch size to keep inference memory bounded.
pub const MAX_BATCH_SIZE: usize = 256;

/// Threshold applied to the arg-max class index when binarizing masks.
///
/// The index is compared as a float against 0.5, so class 0 (background)
/// maps to 0 and every other class maps to 1.
pub const BINARIZE_THRESHOLD: f32 = 0.5;

/// Grayscale pixel value for mask foreground (building).
pub const MASK_FOREGROUND: u8 = 255;

/// Grayscale pixel value for mask background.
pub const MASK_BACKGROUND: u8 = 0;

/// Web Mercator (EPSG:3857) constants for tile bounds.
pub mod mercator {
    /// EPSG code stamped into output rasters.
    pub const EPSG_CODE: u16 = 3857;

    /// Half the extent of the EPSG:3857 square, in meters.
    pub const ORIGIN_SHIFT: f64 = 20_037_508.342_789_244;

    /// Maximum zoom level accepted when parsing tile names.
    pub const MAX_ZOOM: u32 = 30;
}

/// GeoTIFF tag and key identifiers.
pub mod geotiff_tags {
    /// ModelPixelScaleTag: pixel size in CRS units.
    pub const MODEL_PIXEL_SCALE: u16 = 33550;

    /// ModelTiepointTag: raster-to-CRS anchor points.
    pub const MODEL_TIEPOINT: u16 = 33922;

    /// GeoKeyDirectoryTag: packed GeoTIFF key directory.
    pub const GEO_KEY_DIRECTORY: u16 = 34735;

    /// GTModelTypeGeoKey: 1 = projected CRS.
    pub const KEY_MODEL_TYPE: u16 = 1024;

    /// GTRasterTypeGeoKey: 1 = PixelIsArea.
    pub const KEY_RASTER_TYPE: u16 = 1025;

    /// ProjectedCSTypeGeoKey: EPSG code of the projected CRS.
    pub const KEY_PROJECTED_CS: u16 = 3072;

    /// ProjLinearUnitsGeoKey: 9001 = meter.
    pub const KEY_LINEAR_UNITS: u16 = 3076;
}

/// File extensions handled by the pipeline.
pub mod extensions {
    /// Input tile and intermediate mask extension.
    pub const PNG: &str = "png";

    /// Georeferenced output raster extension.
    pub const TIF: &str = "tif";

    /// Sidecar files produced by external geo tools, removed on cleanup.
    pub const XML: &str = "xml";
}
