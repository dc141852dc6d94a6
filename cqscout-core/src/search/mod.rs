// ============================================================================
// cqscout-core/src/search/mod.rs
// ============================================================================
//
// PARAMETER SEARCH: Finding the Most Aggressive Acceptable Parameter
//
// For one input file the search:
// 1. encodes the anchor at parameter 1 (kept for the whole search)
// 2. probes parameters chosen by a ProbeStrategy, scoring each trial against
//    the anchor and deleting the trial right after scoring
// 3. takes the upper bound `high` as the boundary (0 if nothing passed)
// 4. encodes the file once more at the boundary with the final preset
// 5. deletes the anchor unless the final encode was written over it
//
// Quality is assumed to fall monotonically as the parameter rises.
//
// AI-ASSISTANT-INFO: Per-file search loop, score table and observer hooks

// ---- Internal crate imports ----
use crate::artifacts::TrialArtifact;
use crate::config::SearchStrategy;
use crate::error::CoreResult;
use crate::oracle::QualityOracle;
use crate::quality::{QualityParameter, QualityScore, Thresholds};

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};

pub mod strategy;

pub use strategy::{Bisection, LinearScan, ProbeStrategy};

// ============================================================================
// SEARCH STATE
// ============================================================================

/// Bounds and recorded scores of one file's search.
///
/// `low` and `high` are signed so that `high` can drop to -1 when even
/// parameter 0 is rejected.
#[derive(Debug, Clone)]
pub struct SearchState {
    scores: [QualityScore; QualityParameter::COUNT],
    probed: Vec<QualityParameter>,
    pub low: i32,
    pub high: i32,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        SearchState {
            scores: [QualityScore::UNSET; QualityParameter::COUNT],
            probed: Vec::new(),
            low: i32::from(QualityParameter::MIN.value()),
            high: i32::from(QualityParameter::MAX.value()),
        }
    }

    /// Stores the score measured at `parameter`.
    pub fn record(&mut self, parameter: QualityParameter, score: QualityScore) {
        self.scores[parameter.index()] = score;
        if !self.probed.contains(&parameter) {
            self.probed.push(parameter);
        }
    }

    /// Score measured at `parameter`, `(0, 0)` if it was never probed.
    #[must_use]
    pub fn score(&self, parameter: QualityParameter) -> QualityScore {
        self.scores[parameter.index()]
    }

    /// Every slot of the table, indexed by parameter.
    #[must_use]
    pub fn scores(&self) -> &[QualityScore] {
        &self.scores
    }

    /// Probed parameters in probe order.
    #[must_use]
    pub fn probed(&self) -> &[QualityParameter] {
        &self.probed
    }

    /// The current boundary candidate, clamped into the domain.
    #[must_use]
    pub fn boundary(&self) -> QualityParameter {
        QualityParameter::try_from(self.high).unwrap_or(QualityParameter::MIN)
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the probed rows in ascending parameter order.
impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:>6}  {:>6}", "cq", "ssim", "psnr")?;
        let mut rows = self.probed.clone();
        rows.sort();
        for parameter in rows {
            let score = self.score(parameter);
            writeln!(f, "{:>4}  {:>6.2}  {:>6.2}", parameter, score.ssim, score.psnr)?;
        }
        write!(f, "bounds: low={} high={}", self.low, self.high)
    }
}

// ============================================================================
// OBSERVER
// ============================================================================

/// Hooks called as a search progresses. All methods default to no-ops.
pub trait SearchObserver {
    /// The anchor for `file` has been encoded.
    fn on_anchor(&mut self, _file: &Path, _anchor: &Path) {}

    /// A probe was scored and its verdict applied; `state` already holds the score.
    fn on_probe(
        &mut self,
        _file: &Path,
        _parameter: QualityParameter,
        _score: QualityScore,
        _accepted: bool,
        _state: &SearchState,
    ) {
    }

    /// The final encode for `outcome.file` is done.
    fn on_complete(&mut self, _outcome: &SearchOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

// ============================================================================
// SEARCH
// ============================================================================

/// Result of a successful search for one file.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub file: PathBuf,
    /// The boundary the final encode was made at
    pub parameter: QualityParameter,
    /// The one artifact left on disk for `file`
    pub output: PathBuf,
    pub state: SearchState,
}

impl SearchOutcome {
    /// Number of probes the search took, anchor encode excluded.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.state.probed().len()
    }
}

/// Drives a [`QualityOracle`] to the most aggressive acceptable parameter.
pub struct ParameterSearch<'a, O: QualityOracle> {
    oracle: &'a O,
    thresholds: Thresholds,
    strategy: Box<dyn ProbeStrategy>,
}

impl<'a, O: QualityOracle> ParameterSearch<'a, O> {
    pub fn new(oracle: &'a O, thresholds: Thresholds, strategy: SearchStrategy) -> Self {
        Self::with_strategy(oracle, thresholds, strategy.probe_strategy())
    }

    /// Uses a custom probe strategy.
    pub fn with_strategy(
        oracle: &'a O,
        thresholds: Thresholds,
        strategy: Box<dyn ProbeStrategy>,
    ) -> Self {
        ParameterSearch {
            oracle,
            thresholds,
            strategy,
        }
    }

    /// Searches `file` and leaves exactly one encode of it on disk.
    ///
    /// # Arguments
    ///
    /// * `file` - Source video
    /// * `observer` - Receives progress events
    ///
    /// # Returns
    ///
    /// * `Ok(SearchOutcome)` - The boundary and the path of the final encode
    /// * `Err(CoreError::EncodeFailure | CoreError::MetricParseFailure)` - The
    ///   search was aborted; every artifact it created has been removed
    pub fn search(
        &self,
        file: &Path,
        observer: &mut dyn SearchObserver,
    ) -> CoreResult<SearchOutcome> {
        log::info!("Searching {}", file.display());

        let anchor = TrialArtifact::new(
            self.oracle.encode_trial(file, QualityParameter::ANCHOR)?,
            QualityParameter::ANCHOR,
        );
        observer.on_anchor(file, anchor.path());

        let mut state = SearchState::new();
        while let Some(parameter) = self.strategy.next_probe(&state) {
            let score = self.probe(file, &anchor, parameter)?;
            let accepted = self.thresholds.accepts(&score);
            state.record(parameter, score);
            self.strategy.advance(&mut state, parameter, accepted);

            log::debug!(
                "{}: cq {parameter} scored {score} ({}), bounds now [{}, {}]",
                file.display(),
                if accepted { "accepted" } else { "rejected" },
                state.low,
                state.high
            );
            observer.on_probe(file, parameter, score, accepted, &state);
        }

        if state.high < i32::from(QualityParameter::MIN.value()) {
            log::warn!(
                "{}: no parameter met the thresholds, falling back to {}",
                file.display(),
                QualityParameter::MIN
            );
        }
        let boundary = state.boundary();

        let output = self.oracle.encode_final(file, boundary)?;
        if boundary == QualityParameter::ANCHOR {
            // The final encode overwrote the anchor's path.
            let _ = anchor.persist();
        } else {
            anchor.remove()?;
        }

        log::info!(
            "{}: chose cq {boundary} after {} probes -> {}",
            file.display(),
            state.probed().len(),
            output.display()
        );

        let outcome = SearchOutcome {
            file: file.to_path_buf(),
            parameter: boundary,
            output,
            state,
        };
        observer.on_complete(&outcome);
        Ok(outcome)
    }

    /// Scores one parameter and deletes its trial artifact.
    ///
    /// The anchor parameter is scored against the anchor itself instead of
    /// encoding a second artifact over the anchor's path.
    fn probe(
        &self,
        file: &Path,
        anchor: &TrialArtifact,
        parameter: QualityParameter,
    ) -> CoreResult<QualityScore> {
        if parameter == anchor.parameter() {
            return self.oracle.measure(anchor.path(), anchor.path());
        }
        let probe = self.oracle.evaluate(file, anchor.path(), parameter)?;
        let score = probe.score;
        probe.artifact.remove()?;
        Ok(score)
    }
}
