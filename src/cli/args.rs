//! CLI argument definitions.

use crate::constants::MAX_BATCH_SIZE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Building footprint prediction from aerial imagery tiles.
#[derive(Debug, Parser)]
#[command(name = "tilemask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the ONNX segmentation checkpoint.
    pub checkpoint: Option<PathBuf>,

    /// Directory containing input PNG tiles (scanned non-recursively).
    pub input: Option<PathBuf>,

    /// Output directory for predicted rasters (created if absent).
    pub prediction: Option<PathBuf>,

    /// Common options for prediction.
    #[command(flatten)]
    pub predict: PredictArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for a prediction run.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct PredictArgs {
    /// Number of tiles per inference batch.
    #[arg(short, long, value_parser = parse_batch_size, env = "TILEMASK_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Worker pool size (default: one worker per logical CPU).
    #[arg(short, long, value_parser = parse_workers, env = "TILEMASK_WORKERS")]
    pub workers: Option<usize>,

    /// Keep intermediate mask PNGs and sidecar files after georeferencing.
    #[arg(long)]
    pub keep_intermediate: bool,

    /// Stop on the first failed batch.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable the progress bar without changing log verbosity.
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: full trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable GPU acceleration.
    #[arg(long, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Force CPU inference.
    #[arg(long, conflicts_with = "gpu")]
    pub cpu: bool,
}

/// Parse and validate the batch size.
fn parse_batch_size(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 || value > MAX_BATCH_SIZE {
        return Err(format!(
            "batch size must be between 1 and {MAX_BATCH_SIZE}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate the worker count.
fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("worker count must be at least 1".to_string());
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_size_valid() {
        assert_eq!(parse_batch_size("1").ok(), Some(1));
        assert_eq!(parse_batch_size("8").ok(), Some(8));
        assert_eq!(parse_batch_size("256").ok(), Some(256));
    }

    #[test]
    fn test_parse_batch_size_invalid() {
        assert!(parse_batch_size("0").is_err());
        assert!(parse_batch_size("1000").is_err());
        assert!(parse_batch_size("abc").is_err());
    }

    #[test]
    fn test_parse_workers_rejects_zero() {
        assert!(parse_workers("0").is_err());
        assert_eq!(parse_workers("4").ok(), Some(4));
    }

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["tilemask", "model.onnx", "tiles/", "out/"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.checkpoint, Some(PathBuf::from("model.onnx")));
        assert_eq!(cli.input, Some(PathBuf::from("tiles/")));
        assert_eq!(cli.prediction, Some(PathBuf::from("out/")));
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "tilemask",
            "model.onnx",
            "tiles/",
            "out/",
            "-b",
            "16",
            "-w",
            "2",
            "--fail-fast",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.predict.batch_size, Some(16));
        assert_eq!(cli.predict.workers, Some(2));
        assert!(cli.predict.fail_fast);
        assert!(cli.predict.quiet);
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["tilemask", "config", "show"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_gpu_cpu_conflict() {
        let cli = Cli::try_parse_from(["tilemask", "m.onnx", "in/", "out/", "--gpu", "--cpu"]);
        assert!(cli.is_err());
    }
}
