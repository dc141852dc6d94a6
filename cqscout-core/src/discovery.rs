//! File discovery module for finding video files to process.
//!
//! This module walks a directory tree for `.mp4` files (case-insensitive) and
//! leaves out everything cqscout produced itself: `.cq<N>.mp4` encodes and
//! `.hevc.mp4` pass-throughs. Results are sorted so a batch always runs in
//! the same order.

use crate::artifacts::{ARTIFACT_EXTENSION, is_derived_artifact, source_stem};
use crate::error::{CoreError, CoreResult};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds video files eligible for processing under `input_dir`.
///
/// Subdirectories are searched recursively.
///
/// # Arguments
///
/// * `input_dir` - Root of the tree to search
/// * `skip_processed` - Also leave out inputs that already have a derived
///   artifact next to them
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Sorted paths of the discovered files
/// * `Err(CoreError::Walkdir)` - If `input_dir` cannot be read
/// * `Err(CoreError::NoFilesFound)` - If nothing eligible was found
///
/// # Examples
///
/// ```rust,no_run
/// use cqscout_core::find_processable_files;
/// use std::path::Path;
///
/// let input_dir = Path::new("/path/to/videos");
/// match find_processable_files(input_dir, false) {
///     Ok(files) => {
///         println!("Found {} video files:", files.len());
///         for file in files {
///             println!("  {}", file.display());
///         }
///     },
///     Err(e) => println!("Error finding video files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path, skip_processed: bool) -> CoreResult<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    // (directory, source stem) for every derived artifact seen
    let mut processed: HashSet<(PathBuf, String)> = HashSet::new();

    for entry in WalkDir::new(input_dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if !has_mp4_extension(&path) {
            continue;
        }

        if is_derived_artifact(&path) {
            if let (Some(dir), Some(stem)) = (path.parent(), source_stem(&path)) {
                processed.insert((dir.to_path_buf(), stem.to_string()));
            }
            continue;
        }
        candidates.push(path);
    }

    if skip_processed {
        candidates.retain(|path| {
            let key = path
                .parent()
                .zip(path.file_stem().and_then(|s| s.to_str()))
                .map(|(dir, stem)| (dir.to_path_buf(), stem.to_string()));
            let done = key.is_some_and(|key| processed.contains(&key));
            if done {
                log::info!("Skipping already processed {}", path.display());
            }
            !done
        });
    }

    candidates.sort();
    log::debug!(
        "Discovered {} processable files under {}",
        candidates.len(),
        input_dir.display()
    );

    if candidates.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        Ok(candidates)
    }
}

fn has_mp4_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION))
}
