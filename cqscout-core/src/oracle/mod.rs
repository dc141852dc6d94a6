// ============================================================================
// cqscout-core/src/oracle/mod.rs
// ============================================================================
//
// QUALITY ORACLE: Trial Encodes and Quality Measurement
//
// The oracle answers one question for the search: "what does the output look
// like at parameter p?". It produces encodes through the external encoder and
// scores them against the anchor encode through ffmpeg's ssim and psnr
// filters.
//
// KEY COMPONENTS:
// - QualityOracle: the seam the search talks to
// - Probe: a scored trial together with the guard owning its artifact
// - FfmpegOracle: production implementation on top of FfmpegSpawner
// - metrics: parser for the metric tool's summary lines
//
// AI-ASSISTANT-INFO: Encoder/metric oracle used by the parameter search

// ---- Internal crate imports ----
use crate::artifacts::{TrialArtifact, remove_if_exists, trial_path};
use crate::config::EncoderSettings;
use crate::error::{CoreError, CoreResult, command_failed_error, encode_failure};
use crate::external::ffmpeg_executor::{ProcessOutput, run_to_completion};
use crate::external::{FfmpegSpawner, log_command};
use crate::quality::{QualityParameter, QualityScore};

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

pub mod metrics;

pub use metrics::MetricGrammar;

/// Filter graph that computes ssim and psnr of the second input against the first.
pub const METRIC_FILTER: &str = "ssim; [0:v][1:v]psnr";

/// Number of diagnostic lines quoted in encode failure messages.
const ERROR_TAIL_LINES: usize = 5;

// ============================================================================
// ORACLE TRAIT
// ============================================================================

/// A scored trial encode.
///
/// The artifact guard is handed to the caller, who decides when it goes away.
/// Dropping the probe deletes the artifact.
#[derive(Debug)]
pub struct Probe {
    pub parameter: QualityParameter,
    pub score: QualityScore,
    pub artifact: TrialArtifact,
}

/// Produces encodes at a given quality parameter and scores them.
pub trait QualityOracle {
    /// Encodes `file` at `parameter` with the fast trial preset.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the artifact, `<base>.cq<parameter>.mp4`
    /// * `Err(CoreError::EncodeFailure)` - The encoder failed or wrote nothing
    fn encode_trial(&self, file: &Path, parameter: QualityParameter) -> CoreResult<PathBuf>;

    /// Scores `trial` against `anchor`.
    ///
    /// `anchor` is only read.
    fn measure(&self, anchor: &Path, trial: &Path) -> CoreResult<QualityScore>;

    /// Encodes `file` at `parameter` with the slow final preset.
    fn encode_final(&self, file: &Path, parameter: QualityParameter) -> CoreResult<PathBuf>;

    /// Encodes a trial at `parameter` and scores it against `anchor`.
    ///
    /// If scoring fails the trial artifact is removed before the error is
    /// returned.
    fn evaluate(
        &self,
        file: &Path,
        anchor: &Path,
        parameter: QualityParameter,
    ) -> CoreResult<Probe> {
        let artifact = TrialArtifact::new(self.encode_trial(file, parameter)?, parameter);
        let score = self.measure(anchor, artifact.path())?;
        Ok(Probe {
            parameter,
            score,
            artifact,
        })
    }
}

// ============================================================================
// FFMPEG ORACLE
// ============================================================================

/// Oracle backed by ffmpeg, used both as encoder and as metric tool.
pub struct FfmpegOracle<S: FfmpegSpawner> {
    spawner: S,
    settings: EncoderSettings,
    grammar: MetricGrammar,
}

impl<S: FfmpegSpawner> FfmpegOracle<S> {
    pub fn new(spawner: S, settings: EncoderSettings) -> Self {
        FfmpegOracle {
            spawner,
            settings,
            grammar: MetricGrammar::default(),
        }
    }

    /// Uses a different metric output grammar.
    pub fn with_grammar(mut self, grammar: MetricGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    fn new_command(&self) -> FfmpegCommand {
        FfmpegCommand::new_with_path(&self.settings.encoder_path)
    }

    /// Builds the encoder invocation writing `output`.
    ///
    /// ffmpeg-sidecar starts every command with `-loglevel level+info`, so
    /// the logged line shows two `-loglevel` flags. ffmpeg honours the last
    /// one, which is the `error` level set here.
    fn encode_command(
        &self,
        input: &Path,
        output: &Path,
        preset: &str,
        parameter: QualityParameter,
    ) -> FfmpegCommand {
        let mut cmd = self.new_command();
        cmd.args(["-loglevel", "error", "-y"])
            .input(input.to_string_lossy())
            .args(["-c:v", self.settings.codec.as_str()])
            .args(["-preset", preset])
            .args([self.settings.rate_control.flag(), &parameter.to_string()])
            .args(["-c:a", "copy"])
            .output(output.to_string_lossy());
        cmd
    }

    fn encode(
        &self,
        input: &Path,
        parameter: QualityParameter,
        preset: &str,
    ) -> CoreResult<PathBuf> {
        let output = trial_path(input, parameter);
        let cmd = self.encode_command(input, &output, preset, parameter);
        log_command(&self.settings.encoder_path, &cmd);

        let result = run_to_completion(&self.spawner, cmd)
            .map_err(|e| encode_failure(&output, e))?;

        if !result.status.success() {
            if let Err(e) = remove_if_exists(&output) {
                log::warn!("Failed to remove partial output {}: {}", output.display(), e);
            }
            return Err(encode_failure(&output, self.failed(&result)));
        }

        if !output.is_file() {
            return Err(encode_failure(&output, "encoder exited successfully but wrote no output"));
        }

        log::debug!(
            "Encoded {} (preset {preset}, {} {parameter})",
            output.display(),
            self.settings.rate_control
        );
        Ok(output)
    }

    fn failed(&self, result: &ProcessOutput) -> CoreError {
        command_failed_error(
            self.settings.encoder_path.to_string_lossy(),
            result.status,
            result.tail(ERROR_TAIL_LINES),
        )
    }
}

impl<S: FfmpegSpawner> QualityOracle for FfmpegOracle<S> {
    fn encode_trial(&self, file: &Path, parameter: QualityParameter) -> CoreResult<PathBuf> {
        self.encode(file, parameter, &self.settings.trial_preset)
    }

    fn measure(&self, anchor: &Path, trial: &Path) -> CoreResult<QualityScore> {
        let mut cmd = self.new_command();
        cmd.hide_banner()
            .args(["-loglevel", "info"])
            .input(anchor.to_string_lossy())
            .input(trial.to_string_lossy())
            .args(["-lavfi", METRIC_FILTER])
            .format("null")
            .output("-");
        log_command(&self.settings.encoder_path, &cmd);

        let result = run_to_completion(&self.spawner, cmd).map_err(|e| encode_failure(trial, e))?;
        if !result.status.success() {
            return Err(encode_failure(trial, self.failed(&result)));
        }

        self.grammar.parse(&result.lines)
    }

    fn encode_final(&self, file: &Path, parameter: QualityParameter) -> CoreResult<PathBuf> {
        self.encode(file, parameter, &self.settings.final_preset)
    }
}
