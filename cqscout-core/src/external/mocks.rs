// cqscout-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's unit tests only.

use super::{FfmpegProcess, FfmpegSpawner};
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::cell::RefCell;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::rc::Rc;

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawned command is matched against the first expectation whose
/// pattern appears in one of its arguments; the expectation is consumed.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

/// Turns plain stderr lines into the events ffmpeg-sidecar would emit.
pub fn log_events<I, L>(lines: I) -> Vec<FfmpegEvent>
where
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    lines
        .into_iter()
        .map(|line| FfmpegEvent::Log(LogLevel::Info, line.into()))
        .collect()
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    /// Scripts a process that exits unsuccessfully, optionally after writing
    /// a partial output file.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_partial_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            // Raw wait status 256 is exit code 1.
            exit_status: ExitStatus::from_raw(256),
        };
        self.add_expectation(arg_pattern, Ok(process), create_partial_output);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();

        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        match expectation.result {
            Ok(process) => {
                if expectation.create_dummy_output {
                    match args.last() {
                        Some(output) => {
                            let output_path = PathBuf::from(output);
                            if let Err(e) = std::fs::write(&output_path, b"mock output") {
                                log::error!(
                                    "MockFfmpegSpawner failed to create dummy output file {:?}: {}",
                                    output_path,
                                    e
                                );
                            }
                        }
                        None => log::warn!(
                            "MockFfmpegSpawner couldn't find output path in args to create dummy file."
                        ),
                    }
                }
                Ok(process)
            }
            Err(err) => {
                log::warn!(
                    "MockFfmpegSpawner simulating spawn error for pattern '{}': {:?}",
                    expectation.arg_pattern,
                    err
                );
                Err(err)
            }
        }
    }
}
