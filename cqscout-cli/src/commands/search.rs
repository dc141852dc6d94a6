//! Implementation of the search run.
//!
//! Checks the target directory, resolves ffmpeg, discovers the input files and
//! hands them to the core batch loop with the observer matching the chosen
//! output mode.

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::get_timestamp;
use crate::output::{JsonObserver, TableObserver, write_summary, write_summary_json};

use cqscout_core::config::{CoreConfig, CoreConfigBuilder, resolve_encoder_path};
use cqscout_core::external::{SidecarSpawner, StdFsMetadataProvider};
use cqscout_core::search::SearchObserver;
use cqscout_core::{BatchSummary, CoreError, FfmpegOracle, find_processable_files, process_files};

use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Builds the core configuration from parsed arguments.
pub fn build_config(cli: &Cli, encoder_path: PathBuf) -> CliResult<CoreConfig> {
    CoreConfigBuilder::new()
        .encoder_path(encoder_path)
        .codec(cli.codec.clone())
        .rate_control(cli.rate_control)
        .trial_preset(cli.trial_preset.clone())
        .final_preset(cli.final_preset.clone())
        .min_ssim(cli.min_ssim)
        .min_psnr(cli.min_psnr)
        .strategy(cli.strategy)
        .continue_on_error(cli.keep_going)
        .skip_processed(cli.skip_processed)
        .build()
}

/// Checks that `target` is a readable directory.
pub fn check_target_dir(target: &Path) -> CliResult<()> {
    let metadata = fs::metadata(target)
        .cli_with_context(|| format!("cannot access target directory '{}'", target.display()))?;
    if !metadata.is_dir() {
        return Err(CoreError::Usage(format!(
            "'{}' is not a directory",
            target.display()
        )));
    }
    Ok(())
}

/// Discovers the files to process; an empty directory is not an error.
pub fn discover_files(target: &Path, skip_processed: bool) -> CliResult<Vec<PathBuf>> {
    match find_processable_files(target, skip_processed) {
        Ok(files) => Ok(files),
        Err(CoreError::NoFilesFound) => {
            warn!("No processable .mp4 files found in {}", target.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Runs the whole search for the parsed command line.
///
/// Per-file results are printed as they complete; the summary is printed at
/// the end and returned so the caller can pick the exit code.
pub fn run_search(cli: &Cli) -> CliResult<BatchSummary> {
    check_target_dir(&cli.target_dir)?;

    let encoder_path = resolve_encoder_path(cli.ffmpeg.as_deref())?;
    let config = build_config(cli, encoder_path)?;

    info!("cqscout run started: {}", get_timestamp());
    info!("Target directory: {}", cli.target_dir.display());
    info!(
        "Encoder: {} ({} {}, trial preset {}, final preset {})",
        config.encoder.encoder_path.display(),
        config.encoder.codec,
        config.encoder.rate_control,
        config.encoder.trial_preset,
        config.encoder.final_preset
    );
    info!(
        "Thresholds: ssim >= {}, psnr >= {} ({} search)",
        config.thresholds.min_ssim, config.thresholds.min_psnr, config.strategy
    );

    let files = discover_files(&cli.target_dir, config.skip_processed)?;
    if files.is_empty() {
        return Ok(BatchSummary::default());
    }
    info!("Found {} file(s) to process", files.len());

    let oracle = FfmpegOracle::new(SidecarSpawner, config.encoder.clone());
    let stdout = io::stdout();
    let mut observer: Box<dyn SearchObserver> = if cli.json {
        Box::new(JsonObserver::new(stdout.lock()))
    } else {
        Box::new(TableObserver::new(stdout.lock()))
    };

    let summary = process_files(
        &oracle,
        &config,
        &files,
        &StdFsMetadataProvider,
        observer.as_mut(),
    )?;
    drop(observer);

    let mut out = io::stdout().lock();
    if cli.json {
        write_summary_json(&mut out, &summary)?;
    } else {
        write_summary(&mut out, &summary)?;
    }
    out.flush()?;

    info!("cqscout run finished: {}", get_timestamp());
    Ok(summary)
}
