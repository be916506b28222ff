//! Configuration and run-input validation.

use crate::config::Config;
use crate::constants::MAX_BATCH_SIZE;
use crate::error::{Error, Result};
use std::path::Path;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if defaults.batch_size == 0 {
        return Err(Error::ConfigValidation {
            message: "batch_size must be at least 1".to_string(),
        });
    }

    if defaults.batch_size > MAX_BATCH_SIZE {
        return Err(Error::ConfigValidation {
            message: format!(
                "batch_size must be at most {MAX_BATCH_SIZE}, got {}",
                defaults.batch_size
            ),
        });
    }

    if defaults.workers == Some(0) {
        return Err(Error::ConfigValidation {
            message: "workers must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate run inputs before any work begins.
///
/// Configuration errors (bad checkpoint or input path) are reported here,
/// up front, rather than surfacing mid-run.
pub fn validate_run_inputs(checkpoint_path: &Path, input_path: &Path) -> Result<()> {
    if !checkpoint_path.is_file() {
        return Err(Error::CheckpointNotFound {
            path: checkpoint_path.to_path_buf(),
        });
    }

    if !input_path.is_dir() {
        return Err(Error::InputDirNotFound {
            path: input_path.to_path_buf(),
        });
    }

    Ok(())
}
