// cqscout-cli/src/main.rs
//
// Entry point of the cqscout binary.
//
// Responsibilities include:
// - Parsing the command line; a wrong argument count prints the usage
//   message and exits with status 1.
// - Setting up logging (stderr) before any work starts.
// - Running the search over the target directory.
// - Mapping the outcome to the process exit code: 0 when every file was
//   processed, 1 on any error or recorded per-file failure.

use clap::Parser;
use clap::error::ErrorKind;
use cqscout_cli::logging::init_logging;
use cqscout_cli::{Cli, run_search};
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                // clap's rendering already carries the usage line
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    init_logging(cli.verbose);

    match run_search(&cli) {
        Ok(summary) if summary.has_failures() => {
            log::error!("{} file(s) failed", summary.failed.len());
            process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
