//! Command implementations for the CLI.
//!
//! cqscout has a single operation, the search run over a target directory.

/// Discovery, configuration and batch run for a target directory.
pub mod search;
