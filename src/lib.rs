//! Tilemask - building footprint prediction CLI tool.
//!
//! This crate turns a directory of aerial-image PNG tiles and a trained
//! segmentation checkpoint into georeferenced building-footprint rasters.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod georef;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod raster;

use clap::Parser;
use cli::{Cli, Command, PredictArgs};
use config::{Config, InferenceDevice, config_file_path, load_default_config, save_default_config};
use inference::Segmenter;
use pipeline::{cleanup_intermediates, collect_input_tiles, process_batch, run_batches};
use std::path::Path;
use tracing::info;

pub use error::{Error, Result};

/// Options resolved from CLI arguments and the config file for one
/// prediction run.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Number of tiles per inference batch.
    pub batch_size: usize,
    /// Worker pool size.
    pub workers: usize,
    /// Inference device.
    pub device: InferenceDevice,
    /// ONNX Runtime threading settings.
    pub inference: config::InferenceConfig,
    /// Skip the cleanup pass, keeping intermediate masks and sidecars.
    pub keep_intermediate: bool,
    /// Abort on the first failed batch.
    pub fail_fast: bool,
    /// Show a progress bar.
    pub progress_enabled: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            batch_size: constants::DEFAULT_BATCH_SIZE,
            workers: num_cpus::get(),
            device: InferenceDevice::Auto,
            inference: config::InferenceConfig::default(),
            keep_intermediate: false,
            fail_fast: false,
            progress_enabled: false,
        }
    }
}

/// Main entry point for the tilemask CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. ORT noise is filtered at the subscriber instead
    // of being silenced through a process-wide environment variable.
    init_logging(cli.predict.verbose, cli.predict.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let (Some(checkpoint), Some(input), Some(prediction)) =
        (cli.checkpoint, cli.input, cli.prediction)
    else {
        return Err(Error::ConfigValidation {
            message:
                "expected <CHECKPOINT> <INPUT> <PREDICTION> arguments (run with --help for usage)"
                    .to_string(),
        });
    };

    ort::init().commit();

    let config = load_default_config()?;
    config::validate_config(&config)?;
    let options = resolve_options(&cli.predict, &config);

    predict(&checkpoint, &input, &prediction, &options)
}

/// Merge CLI arguments over config-file defaults.
fn resolve_options(args: &PredictArgs, config: &Config) -> PredictOptions {
    let device = if args.gpu {
        InferenceDevice::Gpu
    } else if args.cpu {
        InferenceDevice::Cpu
    } else {
        config.inference.device
    };

    PredictOptions {
        batch_size: args.batch_size.unwrap_or(config.defaults.batch_size),
        workers: args
            .workers
            .or(config.defaults.workers)
            .unwrap_or_else(num_cpus::get),
        device,
        inference: config.inference.clone(),
        keep_intermediate: args.keep_intermediate || config.defaults.keep_intermediate,
        fail_fast: args.fail_fast,
        progress_enabled: !args.quiet && !args.no_progress,
    }
}

/// Predict building footprints for every PNG tile in `input_path`.
///
/// Loads the checkpoint once, fans fixed-size batches out over a bounded
/// worker pool, georeferences the resulting masks into EPSG:3857 GeoTIFFs,
/// and removes the intermediate files. The set of output stems always
/// matches the set of input stems, independent of batching and scheduling.
pub fn predict(
    checkpoint_path: &Path,
    input_path: &Path,
    prediction_path: &Path,
    options: &PredictOptions,
) -> Result<()> {
    use output::progress;
    use std::time::Instant;

    config::validate_run_inputs(checkpoint_path, input_path)?;
    let run_start = Instant::now();

    let start = Instant::now();
    let segmenter = Segmenter::load(checkpoint_path, options.device, &options.inference)?;
    segmenter.log_summary(inference::describe_device(options.device));
    info!("Model loaded in {:.2}s", start.elapsed().as_secs_f64());

    std::fs::create_dir_all(prediction_path).map_err(|e| Error::OutputDirCreate {
        path: prediction_path.to_path_buf(),
        source: e,
    })?;

    let tiles = collect_input_tiles(input_path)?;
    if tiles.is_empty() {
        return Err(Error::NoInputTiles {
            path: input_path.to_path_buf(),
        });
    }
    let batch_count = tiles.len().div_ceil(options.batch_size);
    info!(
        "Found {} tile(s), {} batch(es) of up to {}, {} worker(s)",
        tiles.len(),
        batch_count,
        options.batch_size,
        options.workers
    );

    let start = Instant::now();
    let bar = progress::create_batch_progress(batch_count, options.progress_enabled);
    let stats = run_batches(
        &tiles,
        options.batch_size,
        options.workers,
        |batch| process_batch(batch, &segmenter, prediction_path),
        bar.as_ref(),
        options.fail_fast,
    );
    progress::finish_progress(bar, "Inference complete");
    let stats = stats?;
    info!(
        "Wrote {} mask(s) in {:.2}s",
        stats.masks_written,
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let rasters = georef::georeference_directory(prediction_path)?;
    info!(
        "Georeferenced {} raster(s) in {:.2}s",
        rasters,
        start.elapsed().as_secs_f64()
    );

    if options.keep_intermediate {
        info!("Keeping intermediate files (--keep-intermediate)");
    } else {
        cleanup_intermediates(prediction_path)?;
    }

    // Partial output stays on disk for inspection, but the run still
    // reports failure when any batch was lost.
    if stats.batches_failed > 0 {
        return Err(Error::RunIncomplete {
            failed: stats.batches_failed,
            total: stats.batches_failed + stats.batches_ok,
        });
    }

    info!(
        "Complete: {} raster(s) in {} in {:.2}s",
        rasters,
        prediction_path.display(),
        run_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default; raise it with -v levels.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
