//! Raster I/O: tile loading and mask writing.

mod loader;
mod mask;

pub use loader::open_tiles;
pub use mask::save_mask;
