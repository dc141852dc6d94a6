// cqscout-cli/src/lib.rs
//
// Library portion of the cqscout CLI application.
// Contains argument definitions, output rendering and the run logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::search::run_search;
