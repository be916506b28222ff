//! Error types for tilemask.

/// Result type alias for tilemask operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for tilemask.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Checkpoint file does not exist.
    #[error("checkpoint file does not exist: {path}")]
    CheckpointNotFound {
        /// Path to the missing checkpoint.
        path: std::path::PathBuf,
    },

    /// Input directory does not exist or is not a directory.
    #[error("input path is not a directory: {path}")]
    InputDirNotFound {
        /// The invalid input path.
        path: std::path::PathBuf,
    },

    /// No PNG tiles found in the input directory.
    #[error("no PNG tiles found in '{path}'")]
    NoInputTiles {
        /// The scanned input directory.
        path: std::path::PathBuf,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreate {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode an input tile.
    #[error("failed to decode tile '{path}'")]
    TileDecode {
        /// Path to the tile.
        path: std::path::PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// Tile dimensions do not match the model input geometry.
    #[error("tile '{path}' has size {width}x{height}, expected {expected}x{expected}")]
    TileShape {
        /// Path to the tile.
        path: std::path::PathBuf,
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
        /// Expected square tile edge length.
        expected: u32,
    },

    /// Failed to write a mask image.
    #[error("failed to write mask '{path}'")]
    MaskWrite {
        /// Path to the mask file.
        path: std::path::PathBuf,
        /// Underlying encode error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to initialize ONNX runtime.
    #[error("failed to initialize ONNX runtime: {reason}")]
    RuntimeInitialization {
        /// Description of the initialization failure.
        reason: String,
    },

    /// Failed to load the segmentation model.
    #[error("failed to load model from '{path}'")]
    ModelLoad {
        /// Path to the checkpoint.
        path: std::path::PathBuf,
        /// Underlying ort error.
        #[source]
        source: ort::Error,
    },

    /// Model metadata does not describe a usable segmentation model.
    #[error("unusable model: {reason}")]
    ModelShape {
        /// Description of the metadata problem.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Batch processing failed.
    #[error("batch starting at '{first_tile}' failed")]
    BatchFailed {
        /// First tile of the failed batch.
        first_tile: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<Error>,
    },

    /// One or more batches failed during a run.
    #[error("{failed} of {total} batches failed")]
    RunIncomplete {
        /// Number of failed batches.
        failed: usize,
        /// Total number of batches.
        total: usize,
    },

    /// Tile filename does not follow the x-y-zoom naming scheme.
    #[error(
        "cannot derive tile bounds from filename '{stem}' (expected '<prefix>-<x>-<y>-<zoom>')"
    )]
    TileName {
        /// The offending file stem.
        stem: String,
    },

    /// Failed to write a georeferenced raster.
    #[error("failed to write GeoTIFF '{path}'")]
    GeoTiffWrite {
        /// Path to the output raster.
        path: std::path::PathBuf,
        /// Underlying encode error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to build the worker pool.
    #[error("failed to build worker pool: {reason}")]
    WorkerPool {
        /// Description of the pool construction failure.
        reason: String,
    },
}
