//! Configuration structures and constants for the cqscout-core library.
//!
//! This module holds everything that shapes a search: where the encoder
//! binary lives and how it is invoked, the acceptance thresholds, the probe
//! strategy, and how a batch reacts to per-file failures.

mod builder;

use crate::error::{CoreError, CoreResult};
use crate::external::check_dependency;
use crate::quality::Thresholds;

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use builder::CoreConfigBuilder;

// Default constants

/// Video codec used for every encode unless overridden.
pub const DEFAULT_CODEC: &str = "libx265";

/// Fast, low-effort preset for the trial encodes probed during the search.
pub const DEFAULT_TRIAL_PRESET: &str = "ultrafast";

/// Slow, high-effort preset for the single final encode.
pub const DEFAULT_FINAL_PRESET: &str = "veryslow";

/// Environment variable naming the encoder binary.
pub const ENCODER_PATH_ENV: &str = "CQSCOUT_FFMPEG";

// ============================================================================
// RATE CONTROL
// ============================================================================

/// How the quality parameter is handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateControl {
    /// Constant rate factor (`-crf`), used by the software encoders.
    #[default]
    Crf,
    /// Constant quality (`-cq`), used by nvenc.
    Cq,
}

impl RateControl {
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            RateControl::Crf => "-crf",
            RateControl::Cq => "-cq",
        }
    }
}

impl fmt::Display for RateControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateControl::Crf => write!(f, "crf"),
            RateControl::Cq => write!(f, "cq"),
        }
    }
}

impl FromStr for RateControl {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "crf" => Ok(RateControl::Crf),
            "cq" => Ok(RateControl::Cq),
            other => Err(CoreError::Configuration(format!(
                "unknown rate control '{other}' (expected crf or cq)"
            ))),
        }
    }
}

// ============================================================================
// SEARCH STRATEGY
// ============================================================================

/// Order in which the search probes quality parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Halve the remaining range after every probe.
    #[default]
    Bisection,
    /// Walk upwards from the highest quality and stop at the first rejection.
    Linear,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Bisection => write!(f, "bisection"),
            SearchStrategy::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bisection" | "binary" => Ok(SearchStrategy::Bisection),
            "linear" => Ok(SearchStrategy::Linear),
            other => Err(CoreError::Configuration(format!(
                "unknown search strategy '{other}' (expected bisection or linear)"
            ))),
        }
    }
}

// ============================================================================
// ENCODER SETTINGS
// ============================================================================

/// Everything the quality oracle needs to invoke ffmpeg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderSettings {
    /// Binary used for every encode and every metric computation
    pub encoder_path: PathBuf,

    /// Value passed to `-c:v`
    pub codec: String,

    /// Whether the parameter is passed as `-crf` or `-cq`
    pub rate_control: RateControl,

    /// Preset for trial encodes
    pub trial_preset: String,

    /// Preset for the final encode
    pub final_preset: String,
}

impl EncoderSettings {
    #[must_use]
    pub fn new(encoder_path: PathBuf) -> Self {
        EncoderSettings {
            encoder_path,
            codec: DEFAULT_CODEC.to_string(),
            rate_control: RateControl::default(),
            trial_preset: DEFAULT_TRIAL_PRESET.to_string(),
            final_preset: DEFAULT_FINAL_PRESET.to_string(),
        }
    }
}

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the cqscout-core library.
///
/// Only the encoder path is required; everything else has a default matching
/// the classic libx265 workflow (ultrafast trials, veryslow final encode,
/// ssim >= 0.99 and psnr >= 47).
///
/// # Examples
///
/// ```rust,no_run
/// use cqscout_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .encoder_path(PathBuf::from("/usr/bin/ffmpeg"))
///     .codec("hevc_nvenc")
///     .rate_control(cqscout_core::config::RateControl::Cq)
///     .trial_preset("fast")
///     .final_preset("slow")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreConfig {
    // ---- Encoder ----
    pub encoder: EncoderSettings,

    // ---- Search ----
    /// Minimum scores for a probe to be acceptable
    pub thresholds: Thresholds,

    /// Probe ordering
    pub strategy: SearchStrategy,

    // ---- Batch Behaviour ----
    /// Record per-file failures and move on instead of aborting the batch
    pub continue_on_error: bool,

    /// Skip inputs that already have a `.cq<N>.mp4` result next to them
    pub skip_processed: bool,
}

impl CoreConfig {
    /// Creates a configuration with default settings around `encoder_path`.
    #[must_use]
    pub fn new(encoder_path: PathBuf) -> Self {
        CoreConfig {
            encoder: EncoderSettings::new(encoder_path),
            thresholds: Thresholds::default(),
            strategy: SearchStrategy::default(),
            continue_on_error: false,
            skip_processed: false,
        }
    }

    /// Checks the configuration for values the search cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.encoder.encoder_path.as_os_str().is_empty() {
            return Err(CoreError::Configuration("encoder path is empty".into()));
        }
        for (name, value) in [
            ("codec", &self.encoder.codec),
            ("trial preset", &self.encoder.trial_preset),
            ("final preset", &self.encoder.final_preset),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Configuration(format!("{name} must not be empty")));
            }
        }
        self.thresholds.validate()
    }
}

// ============================================================================
// ENCODER PATH RESOLUTION
// ============================================================================

#[cfg(windows)]
const FFMPEG_BINARY: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const FFMPEG_BINARY: &str = "ffmpeg";

/// Location of an ffmpeg bundled next to the running executable.
#[must_use]
pub fn bundled_encoder_path(exe: &Path) -> Option<PathBuf> {
    exe.parent()
        .map(|dir| dir.join("ffmpeg").join("bin").join(FFMPEG_BINARY))
}

/// Resolves the encoder binary once at startup.
///
/// Resolution order:
/// 1. `explicit` (from a flag or [`ENCODER_PATH_ENV`]), which must exist
/// 2. `ffmpeg/bin/ffmpeg` next to the running executable
/// 3. `ffmpeg` on `PATH`, verified by running it
///
/// # Returns
///
/// * `Ok(PathBuf)` - The binary to use for all invocations
/// * `Err(CoreError::Configuration)` - No usable binary was found
pub fn resolve_encoder_path(explicit: Option<&Path>) -> CoreResult<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            log::debug!("Using encoder from configuration: {}", path.display());
            return Ok(path.to_path_buf());
        }
        return Err(CoreError::Configuration(format!(
            "encoder binary '{}' does not exist",
            path.display()
        )));
    }

    if let Some(bundled) = std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(bundled_encoder_path)
    {
        if bundled.is_file() {
            log::debug!("Using bundled encoder: {}", bundled.display());
            return Ok(bundled);
        }
    }

    let on_path = PathBuf::from(FFMPEG_BINARY);
    check_dependency(&on_path).map_err(|e| {
        CoreError::Configuration(format!(
            "no encoder found: pass --ffmpeg, set {ENCODER_PATH_ENV}, or install ffmpeg on PATH ({e})"
        ))
    })?;
    log::debug!("Using encoder from PATH: {}", on_path.display());
    Ok(on_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_libx265_workflow() {
        let config = CoreConfig::new(PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(config.encoder.codec, "libx265");
        assert_eq!(config.encoder.rate_control.flag(), "-crf");
        assert_eq!(config.encoder.trial_preset, "ultrafast");
        assert_eq!(config.encoder.final_preset, "veryslow");
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.strategy, SearchStrategy::Bisection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_values_fail_validation() {
        let mut config = CoreConfig::new(PathBuf::from("/usr/bin/ffmpeg"));
        config.encoder.trial_preset = "  ".into();
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));

        let config = CoreConfig::new(PathBuf::new());
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn parses_rate_control_and_strategy() {
        assert_eq!("CQ".parse::<RateControl>().unwrap(), RateControl::Cq);
        assert_eq!("crf".parse::<RateControl>().unwrap(), RateControl::Crf);
        assert!("qp".parse::<RateControl>().is_err());
        assert_eq!("linear".parse::<SearchStrategy>().unwrap(), SearchStrategy::Linear);
        assert_eq!("binary".parse::<SearchStrategy>().unwrap(), SearchStrategy::Bisection);
        assert!("spline".parse::<SearchStrategy>().is_err());
    }

    #[test]
    fn explicit_encoder_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("ffmpeg");
        assert!(matches!(
            resolve_encoder_path(Some(&missing)),
            Err(CoreError::Configuration(_))
        ));

        std::fs::write(&missing, b"#!/bin/sh\n").unwrap();
        assert_eq!(resolve_encoder_path(Some(&missing)).unwrap(), missing);
    }

    #[test]
    fn bundled_path_sits_next_to_executable() {
        let path = bundled_encoder_path(Path::new("/opt/cqscout/cqscout")).unwrap();
        assert_eq!(path, Path::new("/opt/cqscout/ffmpeg/bin").join(FFMPEG_BINARY));
    }
}
