// ============================================================================
// cqscout-core/src/processing/batch.rs
// ============================================================================
//
// BATCH PROCESSING: Searching Every Discovered File
//
// Runs the parameter search over a list of files, strictly one after the
// other, and gathers what happened to each of them.
//
// WORKFLOW:
// 1. For each file, in order:
//    a. Record the input size
//    b. Run the search (anchor, probes, final encode, cleanup)
//    c. Record the chosen parameter, elapsed time and output size
// 2. A per-file failure aborts the batch, or with `continue_on_error` is
//    recorded and the next file is started
//
// AI-ASSISTANT-INFO: Batch orchestration over ParameterSearch

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::FileMetadataProvider;
use crate::oracle::QualityOracle;
use crate::quality::QualityParameter;
use crate::search::{ParameterSearch, SearchObserver};
use crate::utils::{calculate_size_reduction, format_bytes, format_duration, get_filename_safe};

// ---- External crate imports ----
use log::{error, info, warn};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of one successfully processed file.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    pub input: PathBuf,
    pub filename: String,
    /// Parameter of the final encode
    pub parameter: QualityParameter,
    /// The surviving encode
    pub output: PathBuf,
    /// Probes the search needed, anchor excluded
    pub probes: usize,
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
}

impl EncodeResult {
    #[must_use]
    pub fn size_reduction(&self) -> u64 {
        calculate_size_reduction(self.input_size, self.output_size)
    }
}

/// What happened to every file of a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub completed: Vec<EncodeResult>,
    pub failed: Vec<(PathBuf, CoreError)>,
}

impl BatchSummary {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.completed.iter().map(|r| r.duration).sum()
    }
}

/// Searches every file in `files` in order.
///
/// # Arguments
///
/// * `oracle` - Encoder and metric backend
/// * `config` - Thresholds, strategy and failure policy
/// * `files` - Inputs, usually from [`crate::find_processable_files`]
/// * `metadata_provider` - Source of file sizes for the results
/// * `observer` - Receives search progress for every file
///
/// # Returns
///
/// * `Ok(BatchSummary)` - Every file was attempted; with `continue_on_error`
///   the failures are listed in the summary
/// * `Err(CoreError)` - The first per-file failure when `continue_on_error`
///   is off, or any error that is not tied to a single file
pub fn process_files<O, M>(
    oracle: &O,
    config: &CoreConfig,
    files: &[PathBuf],
    metadata_provider: &M,
    observer: &mut dyn SearchObserver,
) -> CoreResult<BatchSummary>
where
    O: QualityOracle,
    M: FileMetadataProvider,
{
    let search = ParameterSearch::new(oracle, config.thresholds, config.strategy);
    let mut summary = BatchSummary::default();

    for (index, input) in files.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, files.len(), input.display());

        match process_one(&search, input, metadata_provider, observer) {
            Ok(result) => {
                info!(
                    "{}: cq {} in {}, {} -> {} ({}% smaller)",
                    result.filename,
                    result.parameter,
                    format_duration(result.duration),
                    format_bytes(result.input_size),
                    format_bytes(result.output_size),
                    result.size_reduction()
                );
                summary.completed.push(result);
            }
            Err(e) if e.is_per_file() && config.continue_on_error => {
                error!("{}: {}", input.display(), e);
                warn!("Continuing with the next file");
                summary.failed.push((input.clone(), e));
            }
            Err(e) => {
                error!("{}: {}", input.display(), e);
                return Err(e);
            }
        }
    }

    Ok(summary)
}

fn process_one<O, M>(
    search: &ParameterSearch<'_, O>,
    input: &Path,
    metadata_provider: &M,
    observer: &mut dyn SearchObserver,
) -> CoreResult<EncodeResult>
where
    O: QualityOracle,
    M: FileMetadataProvider,
{
    let started = Instant::now();
    let filename = get_filename_safe(input)?;
    let input_size = metadata_provider.get_size(input)?;

    let outcome = search.search(input, observer)?;
    let output_size = metadata_provider.get_size(&outcome.output)?;

    Ok(EncodeResult {
        input: input.to_path_buf(),
        filename,
        parameter: outcome.parameter,
        probes: outcome.probe_count(),
        output: outcome.output,
        duration: started.elapsed(),
        input_size,
        output_size,
    })
}
