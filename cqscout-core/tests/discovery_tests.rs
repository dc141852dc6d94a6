// cqscout-core/tests/discovery_tests.rs

use cqscout_core::discovery::find_processable_files;
use cqscout_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_processable_files_recursive_and_sorted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    File::create(root.join("b.mp4"))?;
    File::create(root.join("a.MP4"))?; // Case insensitive
    File::create(root.join("notes.txt"))?;
    File::create(root.join("clip.mkv"))?;
    fs::create_dir_all(root.join("season1/disc2"))?;
    File::create(root.join("season1/e01.mp4"))?;
    File::create(root.join("season1/disc2/e02.mp4"))?;

    let files = find_processable_files(root, false)?;

    let expected: Vec<PathBuf> = vec![
        root.join("a.MP4"),
        root.join("b.mp4"),
        root.join("season1/disc2/e02.mp4"),
        root.join("season1/e01.mp4"),
    ];
    assert_eq!(files, expected);
    Ok(())
}

#[test]
fn test_derived_artifacts_are_excluded() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    File::create(root.join("movie.mp4"))?;
    File::create(root.join("movie.cq1.mp4"))?;
    File::create(root.join("movie.cq27.mp4"))?;
    File::create(root.join("other.hevc.mp4"))?;
    File::create(root.join("other.CQ3.MP4"))?;

    let files = find_processable_files(root, false)?;
    assert_eq!(files, vec![root.join("movie.mp4")]);
    Ok(())
}

#[test]
fn test_skip_processed_leaves_out_inputs_with_results() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    File::create(root.join("done.mp4"))?;
    File::create(root.join("done.cq23.mp4"))?;
    File::create(root.join("todo.mp4"))?;
    fs::create_dir(root.join("sub"))?;
    // A result in another directory does not count.
    File::create(root.join("sub/todo.cq20.mp4"))?;

    let files = find_processable_files(root, true)?;
    assert_eq!(files, vec![root.join("todo.mp4")]);

    let files = find_processable_files(root, false)?;
    assert_eq!(files, vec![root.join("done.mp4"), root.join("todo.mp4")]);
    Ok(())
}

#[test]
fn test_find_processable_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("document.txt"))?;
    File::create(dir.path().join("leftover.cq5.mp4"))?;

    match find_processable_files(dir.path(), false) {
        Err(CoreError::NoFilesFound) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_find_processable_files_nonexistent_dir() {
    let missing = PathBuf::from("surely_this_does_not_exist_42_integration");
    match find_processable_files(&missing, false) {
        Err(CoreError::Walkdir(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}
