// ============================================================================
// cqscout-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types and Constructors
//
// This module defines the error type shared by every part of cqscout-core.
// The search-facing kinds (EncodeFailure, MetricParseFailure, Usage,
// Configuration) are what callers match on; the remaining variants carry the
// plumbing failures underneath them (spawning processes, walking directories,
// filesystem access).
//
// KEY COMPONENTS:
// - CoreError: the error enum
// - CoreResult: result alias used throughout the crate
// - command_*_error helpers for process related failures

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by cqscout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The external encoder could not produce a trial or final artifact.
    #[error("Encode failed for {path}: {message}")]
    EncodeFailure { path: PathBuf, message: String },

    /// The metric tool's diagnostic output did not contain the expected summary lines.
    #[error("Could not parse metric output: {0}")]
    MetricParseFailure(String),

    /// Malformed command-line invocation.
    #[error("Usage: {0}")]
    Usage(String),

    /// Missing or invalid configuration, detected before any processing starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A quality parameter outside the supported domain.
    #[error("Quality parameter {0} is outside the supported range 0-51")]
    InvalidParameter(i64),

    #[error("No processable .mp4 files found under the target directory")]
    NoFilesFound,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory traversal error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, io::Error),

    #[error("Failed while waiting for {0}: {1}")]
    CommandWait(String, io::Error),

    #[error("{cmd} exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Path error: {0}")]
    PathError(String),
}

/// Result type for cqscout-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether this error belongs to the per-file failure kinds that a batch
    /// run may record and continue past.
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        !matches!(self, CoreError::Usage(_) | CoreError::Configuration(_))
    }
}

// ---- Constructors ----

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Wraps any process failure that happened while producing `path` into an
/// `EncodeFailure` so callers see a single kind for "the encoder let us down".
pub fn encode_failure(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> CoreError {
    CoreError::EncodeFailure {
        path: path.into(),
        message: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_and_configuration_are_not_per_file() {
        assert!(!CoreError::Usage("x".into()).is_per_file());
        assert!(!CoreError::Configuration("x".into()).is_per_file());
        assert!(CoreError::MetricParseFailure("x".into()).is_per_file());
        assert!(encode_failure("/a.cq3.mp4", "boom").is_per_file());
    }

    #[test]
    fn encode_failure_mentions_path_and_cause() {
        let err = encode_failure("/videos/a.cq3.mp4", "exit status 1");
        let msg = err.to_string();
        assert!(msg.contains("/videos/a.cq3.mp4"));
        assert!(msg.contains("exit status 1"));
    }
}
