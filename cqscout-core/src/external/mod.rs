// ============================================================================
// cqscout-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and the File System
//
// This module encapsulates every interaction with the ffmpeg binary and with
// file metadata. Processes are spawned through the FfmpegSpawner trait so the
// quality oracle can be driven by scripted processes in tests.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: process abstraction (ffmpeg_executor)
// - check_dependency: verifies that a binary runs
// - log_command: logs every external command before it runs
// - FileMetadataProvider: file size access for reports
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions for ffmpeg

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for spawning ffmpeg processes
pub mod ffmpeg_executor;

/// Scripted spawner used by tests
#[cfg(test)]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `program` exists and can be executed.
///
/// The program is run once with `-version` and its output discarded. Only a
/// failure to start counts; the exit status is not inspected.
///
/// # Returns
///
/// * `Ok(())` - The program started
/// * `Err(CoreError::Configuration)` - The program could not be found
/// * `Err(CoreError::CommandStart)` - The program exists but failed to start
pub fn check_dependency(program: &Path) -> CoreResult<()> {
    let result = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", program.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Dependency '{}' not found.", program.display());
            Err(CoreError::Configuration(format!(
                "encoder binary '{}' not found",
                program.display()
            )))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                program.display(),
                e
            );
            Err(CoreError::CommandStart(program.display().to_string(), e))
        }
    }
}

// ============================================================================
// COMMAND LOGGING
// ============================================================================

/// Renders `program` and the arguments of `cmd` as a shell-like line.
#[must_use]
pub fn format_command(program: &Path, cmd: &FfmpegCommand) -> String {
    let mut line = quote_arg(&program.to_string_lossy());
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&quote_arg(&arg.to_string_lossy()));
    }
    line
}

/// Logs an external command at info level before it runs.
pub fn log_command(program: &Path, cmd: &FfmpegCommand) {
    log::info!("{}", format_command(program, cmd));
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == ';' || c == '"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

// ============================================================================
// FILE METADATA
// ============================================================================

/// Access to file sizes, abstracted so reports can be tested without real
/// media files.
pub trait FileMetadataProvider {
    /// Gets the size of the file at the given path in bytes.
    fn get_size(&self, path: &Path) -> CoreResult<u64>;
}

/// Standard implementation of FileMetadataProvider using `std::fs::metadata`.
#[derive(Debug, Clone, Default)]
pub struct StdFsMetadataProvider;

impl FileMetadataProvider for StdFsMetadataProvider {
    fn get_size(&self, path: &Path) -> CoreResult<u64> {
        Ok(std::fs::metadata(path)?.len())
    }
}
