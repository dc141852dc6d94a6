//! Batch processing of discovered files.
//!
//! Groups the per-file results and the orchestration loop that runs the
//! parameter search over a whole directory.

/// Batch loop, per-file results and summary
pub mod batch;

pub use batch::{BatchSummary, EncodeResult, process_files};
