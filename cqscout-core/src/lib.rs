//! Core library for finding the most aggressive encoder quality setting that
//! still meets perceptual quality thresholds.
//!
//! For every input file a near-lossless anchor encode is made, trial encodes
//! at candidate parameters are scored against it with ssim and psnr, and a
//! search narrows in on the highest parameter whose scores still pass. The
//! file is then encoded once more at that parameter with a slow preset.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cqscout_core::config::{CoreConfigBuilder, resolve_encoder_path};
//! use cqscout_core::external::{SidecarSpawner, StdFsMetadataProvider};
//! use cqscout_core::oracle::FfmpegOracle;
//! use cqscout_core::search::NoopObserver;
//! use std::path::Path;
//!
//! let config = CoreConfigBuilder::new()
//!     .encoder_path(resolve_encoder_path(None).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let files = cqscout_core::find_processable_files(Path::new("/videos"), false).unwrap();
//! let oracle = FfmpegOracle::new(SidecarSpawner, config.encoder.clone());
//!
//! let summary = cqscout_core::process_files(
//!     &oracle,
//!     &config,
//!     &files,
//!     &StdFsMetadataProvider,
//!     &mut NoopObserver,
//! ).unwrap();
//! for result in &summary.completed {
//!     println!("{} -> cq {}", result.filename, result.parameter);
//! }
//! ```

pub mod artifacts;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod oracle;
pub mod processing;
pub mod quality;
pub mod search;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use oracle::{FfmpegOracle, QualityOracle};
pub use processing::{BatchSummary, EncodeResult, process_files};
pub use quality::{QualityParameter, QualityScore, Thresholds};
pub use search::{ParameterSearch, SearchObserver, SearchOutcome, SearchState};
pub use utils::{format_bytes, format_duration};
