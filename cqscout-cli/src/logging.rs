// ============================================================================
// cqscout-cli/src/logging.rs
// ============================================================================
//
// LOGGING: env_logger Setup for the CLI
//
// The core library logs through the `log` facade; this module installs
// env_logger as the backend. Log records go to stderr so that stdout only
// carries the score tables (or JSON lines).
//
// USAGE:
// - default: info (every external command is logged at this level)
// - --verbose: debug
// - RUST_LOG overrides both, e.g. RUST_LOG=ffmpeg_log=trace for raw ffmpeg output
//
// AI-ASSISTANT-INFO: Logging initialisation and timestamp helpers

use console::style;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Default level filter for the given verbosity.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Installs the global logger. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let _ = Builder::from_env(env)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => style("ERROR").red().bold(),
                Level::Warn => style("WARN ").yellow().bold(),
                Level::Info => style("INFO ").green(),
                Level::Debug => style("DEBUG").cyan(),
                Level::Trace => style("TRACE").dim(),
            };
            writeln!(
                buf,
                "{} {} {}",
                style(chrono::Local::now().format("%H:%M:%S")).dim(),
                level,
                record.args()
            )
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_selects_level() {
        assert_eq!(default_filter(false), "info");
        assert_eq!(default_filter(true), "debug");
    }

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
