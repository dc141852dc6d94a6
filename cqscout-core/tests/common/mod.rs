// cqscout-core/tests/common/mod.rs
//
// Synthetic oracle shared by the integration tests. Encodes write small files
// at the real artifact paths; scores come from a closure over the parameter.

#![allow(dead_code)]

use cqscout_core::artifacts::{parameter_from_path, trial_path};
use cqscout_core::error::{CoreError, CoreResult, encode_failure};
use cqscout_core::{QualityOracle, QualityParameter, QualityScore};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

type ScoreFn = Box<dyn Fn(u8) -> QualityScore>;

pub struct SyntheticOracle {
    score: ScoreFn,
    pub trial_encodes: RefCell<Vec<u8>>,
    pub final_encodes: RefCell<Vec<u8>>,
    /// Trial encodes at this parameter fail.
    pub fail_trial_at: Option<u8>,
    /// Measurements of this parameter fail to parse.
    pub fail_measure_at: Option<u8>,
    /// Encodes of files whose name contains this fail.
    pub fail_files_containing: Option<String>,
}

impl SyntheticOracle {
    pub fn new(score: impl Fn(u8) -> QualityScore + 'static) -> Self {
        SyntheticOracle {
            score: Box::new(score),
            trial_encodes: RefCell::new(Vec::new()),
            final_encodes: RefCell::new(Vec::new()),
            fail_trial_at: None,
            fail_measure_at: None,
            fail_files_containing: None,
        }
    }

    /// Accepts everything up to and including `boundary` with the default thresholds.
    pub fn with_boundary(boundary: i32) -> Self {
        Self::new(move |p| {
            if i32::from(p) <= boundary {
                QualityScore::new(0.995, 48.0)
            } else {
                QualityScore::new(0.98, 45.0)
            }
        })
    }

    fn write(&self, file: &Path, parameter: QualityParameter, payload: &[u8]) -> CoreResult<PathBuf> {
        let output = trial_path(file, parameter);
        if let Some(marker) = &self.fail_files_containing {
            if file.to_string_lossy().contains(marker.as_str()) {
                return Err(encode_failure(&output, "scripted failure"));
            }
        }
        fs::write(&output, payload)?;
        Ok(output)
    }
}

impl QualityOracle for SyntheticOracle {
    fn encode_trial(&self, file: &Path, parameter: QualityParameter) -> CoreResult<PathBuf> {
        self.trial_encodes.borrow_mut().push(parameter.value());
        if self.fail_trial_at == Some(parameter.value()) {
            return Err(encode_failure(trial_path(file, parameter), "scripted failure"));
        }
        self.write(file, parameter, b"trial")
    }

    fn measure(&self, anchor: &Path, trial: &Path) -> CoreResult<QualityScore> {
        assert!(anchor.exists(), "anchor {} missing during measurement", anchor.display());
        assert!(trial.exists(), "trial {} missing during measurement", trial.display());
        let parameter = parameter_from_path(trial).expect("trial name carries a parameter");
        if self.fail_measure_at == Some(parameter.value()) {
            return Err(CoreError::MetricParseFailure("scripted failure".into()));
        }
        Ok((self.score)(parameter.value()))
    }

    fn encode_final(&self, file: &Path, parameter: QualityParameter) -> CoreResult<PathBuf> {
        self.final_encodes.borrow_mut().push(parameter.value());
        self.write(file, parameter, b"final encode")
    }
}

/// Creates `name` under `dir` with some content and returns its path.
pub fn create_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create input dir");
    }
    fs::write(&path, vec![0u8; 4096]).expect("write input");
    path
}

/// Every `.cq<N>.mp4` file directly inside `dir`, sorted.
pub fn artifacts_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".cq"))
        .collect();
    names.sort();
    names
}
