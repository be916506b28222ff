//! Configuration type definitions.

use crate::constants::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Inference settings.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Default prediction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Number of tiles per inference batch.
    pub batch_size: usize,

    /// Worker pool size. None means one worker per logical CPU.
    pub workers: Option<usize>,

    /// Keep intermediate mask PNGs and sidecar files after georeferencing.
    pub keep_intermediate: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: None,
            keep_intermediate: false,
        }
    }
}

/// Inference device configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Force GPU (CUDA), fall back to CPU with a warning.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,

    /// ONNX Runtime intra-op threads. None uses the runtime default.
    pub intra_threads: Option<usize>,

    /// ONNX Runtime inter-op threads. None uses the runtime default.
    pub inter_threads: Option<usize>,
}
