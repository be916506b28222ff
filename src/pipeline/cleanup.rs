//! Removal of intermediate prediction artifacts.

use crate::constants::extensions;
use crate::error::Result;
use std::path::Path;
use tracing::{debug, info};

/// Delete every file in `dir` with the given extension (case-insensitive).
///
/// Idempotent: a file that disappears between listing and removal is not
/// an error. Returns the number of files removed.
pub fn remove_files(dir: &Path, extension: &str) -> Result<usize> {
    let mut removed = 0;

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}

/// Remove intermediate `.xml` sidecars and pre-georeference `.png` masks,
/// leaving only the final GeoTIFFs.
pub fn cleanup_intermediates(prediction_dir: &Path) -> Result<()> {
    let xml = remove_files(prediction_dir, extensions::XML)?;
    let png = remove_files(prediction_dir, extensions::PNG)?;
    info!("Cleanup: removed {xml} sidecar(s), {png} intermediate mask(s)");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_remove_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        touch(dir.path(), "b.PNG");
        touch(dir.path(), "a.tif");
        touch(dir.path(), "a.aux.xml");

        assert_eq!(remove_files(dir.path(), "png").unwrap(), 2);
        assert!(dir.path().join("a.tif").exists());
        assert!(dir.path().join("a.aux.xml").exists());
    }

    #[test]
    fn test_remove_files_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.xml");

        assert_eq!(remove_files(dir.path(), "xml").unwrap(), 1);
        // Second invocation finds nothing and succeeds.
        assert_eq!(remove_files(dir.path(), "xml").unwrap(), 0);
    }

    #[test]
    fn test_cleanup_intermediates_leaves_tifs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "OAM-0-0-0.png");
        touch(dir.path(), "OAM-0-0-0.tif");
        touch(dir.path(), "OAM-0-0-0.png.aux.xml");

        cleanup_intermediates(dir.path()).unwrap();

        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(remaining, vec!["OAM-0-0-0.tif"]);
    }
}
