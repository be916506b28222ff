//! Georeferencing of prediction masks.
//!
//! Runs as a single post-pass over the whole prediction directory after all
//! batches have finished: every mask PNG is rewritten as a GeoTIFF tagged
//! with EPSG:3857, with bounds derived from the tile filename.

mod bounds;
mod geotiff;

pub use bounds::{TileBounds, bounds_from_stem};
pub use geotiff::georeference_directory;
