// ============================================================================
// cqscout-core/src/quality.rs
// ============================================================================
//
// QUALITY TYPES: Parameters, Scores and the Acceptance Predicate
//
// This module defines the values exchanged between the quality oracle and the
// parameter search:
//
// - QualityParameter: an encoder quality knob (crf/cq) in the range 0-51
// - QualityScore: the (ssim, psnr) pair measured for one trial encode
// - Thresholds: the acceptance predicate applied to every score
//
// Scores are rounded to two decimals when they are built so that comparisons
// against the thresholds behave the same no matter where the numbers came
// from (parsed ffmpeg output or a synthetic oracle in tests).

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fmt;

// ============================================================================
// QUALITY PARAMETER
// ============================================================================

/// An encoder quality parameter. Lower values mean higher quality and larger
/// files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct QualityParameter(u8);

impl QualityParameter {
    /// Highest quality value in the domain.
    pub const MIN: QualityParameter = QualityParameter(0);

    /// Most aggressive value in the domain.
    pub const MAX: QualityParameter = QualityParameter(51);

    /// Near-lossless value used for the anchor artifact every trial is
    /// compared against.
    pub const ANCHOR: QualityParameter = QualityParameter(1);

    /// Number of values in the domain.
    pub const COUNT: usize = 52;

    /// Builds a parameter, rejecting values outside 0-51.
    pub fn new(value: i64) -> CoreResult<Self> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            Ok(QualityParameter(value as u8))
        } else {
            Err(CoreError::InvalidParameter(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Every parameter in ascending order.
    pub fn all() -> impl Iterator<Item = QualityParameter> {
        (Self::MIN.0..=Self::MAX.0).map(QualityParameter)
    }
}

impl fmt::Display for QualityParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i32> for QualityParameter {
    type Error = CoreError;

    fn try_from(value: i32) -> CoreResult<Self> {
        QualityParameter::new(i64::from(value))
    }
}

// ============================================================================
// QUALITY SCORE
// ============================================================================

/// Value recorded for psnr when the metric reports `inf` (identical content).
pub const PSNR_CAP: f64 = 50.0;

/// Structural similarity and peak signal-to-noise ratio measured for one
/// trial encode against the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScore {
    pub ssim: f64,
    pub psnr: f64,
}

impl QualityScore {
    /// Sentinel for table entries that have not been probed.
    pub const UNSET: QualityScore = QualityScore { ssim: 0.0, psnr: 0.0 };

    /// Builds a score with both metrics rounded to two decimals.
    #[must_use]
    pub fn new(ssim: f64, psnr: f64) -> Self {
        QualityScore {
            ssim: round2(ssim),
            psnr: round2(psnr),
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl Default for QualityScore {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.ssim, self.psnr)
    }
}

/// Rounds the exact binary value to two decimals.
///
/// Scaling by 100 first can create ties that are not there (`0.985` is
/// stored just below the half), so the rounding goes through the decimal
/// formatter, which works on the exact value.
fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

// ============================================================================
// ACCEPTANCE PREDICATE
// ============================================================================

pub const DEFAULT_MIN_SSIM: f64 = 0.99;
pub const DEFAULT_MIN_PSNR: f64 = 47.0;

/// Minimum scores a trial must reach to count as "no perceptible loss".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min_ssim: f64,
    pub min_psnr: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            min_ssim: DEFAULT_MIN_SSIM,
            min_psnr: DEFAULT_MIN_PSNR,
        }
    }
}

impl Thresholds {
    /// A score is acceptable when both metrics reach their thresholds.
    #[must_use]
    pub fn accepts(&self, score: &QualityScore) -> bool {
        score.ssim >= self.min_ssim && score.psnr >= self.min_psnr
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.min_ssim) {
            return Err(CoreError::Configuration(format!(
                "min ssim must be within 0.0-1.0, got {}",
                self.min_ssim
            )));
        }
        if !(self.min_psnr.is_finite() && self.min_psnr > 0.0) {
            return Err(CoreError::Configuration(format!(
                "min psnr must be a positive number, got {}",
                self.min_psnr
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_domain_bounds() {
        assert_eq!(QualityParameter::new(0).unwrap(), QualityParameter::MIN);
        assert_eq!(QualityParameter::new(51).unwrap(), QualityParameter::MAX);
        assert!(matches!(
            QualityParameter::new(52),
            Err(CoreError::InvalidParameter(52))
        ));
        assert!(matches!(
            QualityParameter::new(-1),
            Err(CoreError::InvalidParameter(-1))
        ));
        assert_eq!(QualityParameter::all().count(), QualityParameter::COUNT);
    }

    #[test]
    fn scores_are_rounded_to_two_decimals() {
        let score = QualityScore::new(0.98765, 48.456);
        assert_eq!(score.ssim, 0.99);
        assert_eq!(score.psnr, 48.46);
    }

    #[test]
    fn rounding_follows_the_stored_value() {
        // Both literals are stored just below the half.
        assert_eq!(QualityScore::new(0.985, 48.0).ssim, 0.98);
        assert_eq!(QualityScore::new(0.995, 46.995).psnr, 46.99);
    }

    #[test]
    fn finite_psnr_above_fifty_is_kept() {
        assert_eq!(QualityScore::new(0.99, 59.0).psnr, 59.0);
        assert_eq!(QualityScore::new(1.0, 55.431).psnr, 55.43);
    }

    #[test]
    fn scores_just_below_thresholds_are_rejected() {
        let t = Thresholds::default();
        assert!(!t.accepts(&QualityScore::new(0.985, 48.0)));
        assert!(!t.accepts(&QualityScore::new(0.995, 46.995)));
        assert!(t.accepts(&QualityScore::new(0.99, 47.0)));
    }

    #[test]
    fn acceptance_requires_both_thresholds() {
        let t = Thresholds::default();
        assert!(t.accepts(&QualityScore::new(0.99, 47.0)));
        assert!(!t.accepts(&QualityScore::new(0.98, 59.0)));
        assert!(!t.accepts(&QualityScore::new(1.0, 46.99)));
        assert!(!t.accepts(&QualityScore::UNSET));
    }

    #[test]
    fn acceptance_is_stable_across_calls() {
        let t = Thresholds::default();
        let score = QualityScore::new(0.995, 47.5);
        let first = t.accepts(&score);
        for _ in 0..10 {
            assert_eq!(t.accepts(&score), first);
        }
    }

    #[test]
    fn threshold_validation() {
        assert!(Thresholds::default().validate().is_ok());
        let bad_ssim = Thresholds { min_ssim: 1.5, ..Thresholds::default() };
        assert!(matches!(bad_ssim.validate(), Err(CoreError::Configuration(_))));
        let bad_psnr = Thresholds { min_psnr: 0.0, ..Thresholds::default() };
        assert!(matches!(bad_psnr.validate(), Err(CoreError::Configuration(_))));
        let high_psnr = Thresholds { min_psnr: 55.0, ..Thresholds::default() };
        assert!(high_psnr.validate().is_ok());
    }
}
