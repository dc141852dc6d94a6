// ============================================================================
// cqscout-core/src/artifacts.rs
// ============================================================================
//
// ARTIFACTS: Derived Filenames and Trial Artifact Ownership
//
// Every encode cqscout performs lands next to its input, named after the
// input and the quality parameter: `<base>.cq<parameter>.mp4`. Trial encodes
// only live for the duration of one probe; the anchor (parameter 1) lives for
// the whole search of a file; the final encode is the one file that survives.
//
// KEY COMPONENTS:
// - trial_path: filename derivation
// - is_derived_artifact: recognises names that cqscout itself produced
// - TrialArtifact: owning guard that deletes its file unless persisted

use crate::error::CoreResult;
use crate::quality::QualityParameter;

use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extension of every artifact cqscout writes.
pub const ARTIFACT_EXTENSION: &str = "mp4";

// ============================================================================
// FILENAME DERIVATION
// ============================================================================

/// Path of the artifact encoded from `input` at `parameter`.
///
/// `/videos/clip.mp4` at parameter 23 becomes `/videos/clip.cq23.mp4`.
#[must_use]
pub fn trial_path(input: &Path, parameter: QualityParameter) -> PathBuf {
    input.with_extension(format!("cq{parameter}.{ARTIFACT_EXTENSION}"))
}

fn derived_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\.(cq\d+|hevc)\.mp4$").expect("derived artifact pattern is valid")
    })
}

/// Whether `path` names a file cqscout produced (a `.cq<N>.mp4` encode or a
/// `.hevc.mp4` pass-through).
#[must_use]
pub fn is_derived_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| derived_name_pattern().is_match(name))
}

/// Parameter encoded in a `.cq<N>.mp4` filename, if any.
#[must_use]
pub fn parameter_from_path(path: &Path) -> Option<QualityParameter> {
    let name = path.file_name()?.to_str()?;
    let captures = derived_name_pattern().captures(name)?;
    let marker = captures.get(1)?.as_str();
    let digits = marker.get(2..)?;
    if !marker[..2].eq_ignore_ascii_case("cq") {
        return None;
    }
    QualityParameter::new(digits.parse().ok()?).ok()
}

/// Stem of the input a derived artifact was produced from.
///
/// `clip.cq23.mp4` and `clip.hevc.mp4` both yield `clip`.
#[must_use]
pub fn source_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let found = derived_name_pattern().find(name)?;
    Some(&name[..found.start()])
}

/// Removes `path`, treating "already gone" as success.
pub fn remove_if_exists(path: &Path) -> CoreResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// TRIAL ARTIFACT
// ============================================================================

/// Exclusive owner of one encoded file on disk.
///
/// The file is deleted when the guard is dropped, so an artifact whose probe
/// fails half way never outlives it. Call [`TrialArtifact::remove`] to delete
/// it eagerly and observe I/O errors, or [`TrialArtifact::persist`] to keep it.
#[derive(Debug)]
pub struct TrialArtifact {
    path: PathBuf,
    parameter: QualityParameter,
    armed: bool,
}

impl TrialArtifact {
    /// Takes ownership of an artifact the encoder just wrote.
    #[must_use]
    pub fn new(path: PathBuf, parameter: QualityParameter) -> Self {
        TrialArtifact {
            path,
            parameter,
            armed: true,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn parameter(&self) -> QualityParameter {
        self.parameter
    }

    /// Deletes the artifact now.
    pub fn remove(mut self) -> CoreResult<()> {
        self.armed = false;
        if remove_if_exists(&self.path)? {
            log::debug!("Removed artifact {}", self.path.display());
        }
        Ok(())
    }

    /// Releases ownership and leaves the file on disk.
    #[must_use]
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for TrialArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_if_exists(&self.path) {
            Ok(true) => log::debug!("Discarded artifact {}", self.path.display()),
            Ok(false) => {}
            Err(e) => log::warn!(
                "Failed to discard artifact {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn p(value: i64) -> QualityParameter {
        QualityParameter::new(value).unwrap()
    }

    #[test]
    fn trial_names_follow_cq_pattern() {
        let input = Path::new("/videos/holiday.mp4");
        assert_eq!(trial_path(input, p(1)), PathBuf::from("/videos/holiday.cq1.mp4"));
        assert_eq!(trial_path(input, p(23)), PathBuf::from("/videos/holiday.cq23.mp4"));
    }

    #[test]
    fn trial_names_keep_inner_dots() {
        let input = Path::new("/videos/day.one.MP4");
        assert_eq!(trial_path(input, p(7)), PathBuf::from("/videos/day.one.cq7.mp4"));
    }

    #[test]
    fn derived_artifacts_are_recognised() {
        assert!(is_derived_artifact(Path::new("a.cq12.mp4")));
        assert!(is_derived_artifact(Path::new("dir/a.CQ0.MP4")));
        assert!(is_derived_artifact(Path::new("a.hevc.mp4")));
        assert!(!is_derived_artifact(Path::new("a.mp4")));
        assert!(!is_derived_artifact(Path::new("a.cq.mp4")));
        assert!(!is_derived_artifact(Path::new("cq12.mp4")));
    }

    #[test]
    fn parameter_is_recovered_from_name() {
        assert_eq!(parameter_from_path(Path::new("a.cq12.mp4")), Some(p(12)));
        assert_eq!(parameter_from_path(Path::new("a.hevc.mp4")), None);
        assert_eq!(parameter_from_path(Path::new("a.cq99.mp4")), None);
    }

    #[test]
    fn source_stem_strips_marker() {
        assert_eq!(source_stem(Path::new("/v/day.one.cq23.mp4")), Some("day.one"));
        assert_eq!(source_stem(Path::new("clip.HEVC.mp4")), Some("clip"));
        assert_eq!(source_stem(Path::new("clip.mp4")), None);
    }

    #[test]
    fn dropped_guard_deletes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.cq5.mp4");
        fs::write(&path, b"data").unwrap();
        {
            let _guard = TrialArtifact::new(path.clone(), p(5));
        }
        assert!(!path.exists());
    }

    #[test]
    fn persisted_guard_keeps_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.cq5.mp4");
        fs::write(&path, b"data").unwrap();
        let kept = TrialArtifact::new(path.clone(), p(5)).persist();
        assert_eq!(kept, path);
        assert!(path.exists());
    }

    #[test]
    fn remove_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        let guard = TrialArtifact::new(dir.path().join("gone.cq5.mp4"), p(5));
        assert!(guard.remove().is_ok());
    }
}
