//! End-to-end tests for mask georeferencing and intermediate cleanup,
//! exercised through the library without a model.

use image::{GrayImage, Luma};
use tilemask::constants::TILE_SIZE;
use tilemask::georef::{bounds_from_stem, georeference_directory};
use tilemask::pipeline::cleanup_intermediates;

fn write_mask(dir: &std::path::Path, stem: &str) {
    let mut mask = GrayImage::new(TILE_SIZE, TILE_SIZE);
    mask.put_pixel(10, 10, Luma([255]));
    mask.save(dir.join(format!("{stem}.png"))).unwrap();
}

#[test]
fn test_georeference_then_cleanup_leaves_only_tifs() {
    let dir = tempfile::tempdir().unwrap();
    write_mask(dir.path(), "zone7-1-2-3");
    write_mask(dir.path(), "zone7-0-0-3");
    std::fs::write(dir.path().join("zone7-1-2-3.png.aux.xml"), b"<aux/>").unwrap();

    let count = georeference_directory(dir.path()).unwrap();
    assert_eq!(count, 2);

    cleanup_intermediates(dir.path()).unwrap();

    let mut remaining: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec!["zone7-0-0-3.tif", "zone7-1-2-3.tif"]);
}

#[test]
fn test_output_stems_match_input_stems() {
    let dir = tempfile::tempdir().unwrap();
    let stems = ["area-0-0-1", "area-0-1-1", "area-1-0-1", "area-1-1-1"];
    for stem in stems {
        write_mask(dir.path(), stem);
    }

    georeference_directory(dir.path()).unwrap();
    cleanup_intermediates(dir.path()).unwrap();

    for stem in stems {
        assert!(dir.path().join(format!("{stem}.tif")).is_file());
    }
}

#[test]
fn test_unparseable_stem_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_mask(dir.path(), "not_a_tile_name");

    let err = georeference_directory(dir.path());
    assert!(matches!(err, Err(tilemask::Error::TileName { .. })));
}

#[test]
fn test_cleanup_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_mask(dir.path(), "t-0-0-0");

    georeference_directory(dir.path()).unwrap();
    cleanup_intermediates(dir.path()).unwrap();
    cleanup_intermediates(dir.path()).unwrap();

    assert!(dir.path().join("t-0-0-0.tif").is_file());
}

#[test]
fn test_adjacent_tiles_share_an_edge() {
    let left = bounds_from_stem("city-4-7-5").unwrap();
    let right = bounds_from_stem("city-5-7-5").unwrap();

    assert!((left.x_max - right.x_min).abs() < 1e-6);
    assert!((left.y_min - right.y_min).abs() < 1e-6);
    assert!((left.y_max - right.y_max).abs() < 1e-6);
}
