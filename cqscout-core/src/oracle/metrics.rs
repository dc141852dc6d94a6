// ============================================================================
// cqscout-core/src/oracle/metrics.rs
// ============================================================================
//
// METRIC PARSING: ffmpeg ssim/psnr Summary Lines
//
// When ffmpeg runs the `ssim` and `psnr` filters it prints one summary line
// per filter on its diagnostic stream once the comparison finishes:
//
//   [Parsed_ssim_0 @ 0x..] SSIM Y:0.995803 (23.77) U:0.99 (26.06) V:0.99 (25.93) All:0.996329 (24.35)
//   [Parsed_psnr_1 @ 0x..] PSNR y:46.23 u:50.12 v:49.99 average:47.317 min:42.11 max:51.24
//
// Only the aggregate values are used: `All:` for ssim and `average:` for
// psnr. Identical inputs make psnr report `inf`, which is recorded as 50.
// Finite values are kept as measured. Anything else that is not a finite
// number fails the parse.

use crate::error::{CoreError, CoreResult};
use crate::quality::{PSNR_CAP, QualityScore};

use regex::Regex;
use std::sync::OnceLock;

/// Output grammars the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricGrammar {
    /// Summary lines printed by ffmpeg's `ssim` and `psnr` filters
    /// (ffmpeg 4.x through 7.x).
    #[default]
    FfmpegSummaryV1,
}

impl MetricGrammar {
    /// Parses the aggregate ssim and psnr out of a process's diagnostic lines.
    ///
    /// When a filter printed more than one summary, the last one wins.
    pub fn parse<S: AsRef<str>>(self, lines: &[S]) -> CoreResult<QualityScore> {
        match self {
            MetricGrammar::FfmpegSummaryV1 => parse_ffmpeg_summary(lines),
        }
    }
}

fn ssim_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bSSIM\b.*\bAll:(\S+)").expect("ssim pattern is valid"))
}

fn psnr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\bPSNR\b.*\baverage:(\S+)").expect("psnr pattern is valid"))
}

fn last_capture<'a, S: AsRef<str>>(lines: &'a [S], pattern: &Regex) -> Option<&'a str> {
    lines
        .iter()
        .rev()
        .find_map(|line| pattern.captures(line.as_ref())?.get(1).map(|m| m.as_str()))
}

fn parse_ffmpeg_summary<S: AsRef<str>>(lines: &[S]) -> CoreResult<QualityScore> {
    let ssim_token = last_capture(lines, ssim_pattern()).ok_or_else(|| {
        CoreError::MetricParseFailure("no SSIM summary line (expected 'SSIM ... All:<value>')".into())
    })?;
    let psnr_token = last_capture(lines, psnr_pattern()).ok_or_else(|| {
        CoreError::MetricParseFailure(
            "no PSNR summary line (expected 'PSNR ... average:<value>')".into(),
        )
    })?;

    let ssim = parse_ssim(ssim_token)?;
    let psnr = parse_psnr(psnr_token)?;
    log::debug!("Parsed metrics: ssim={ssim} psnr={psnr}");
    Ok(QualityScore::new(ssim, psnr))
}

fn parse_ssim(token: &str) -> CoreResult<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(CoreError::MetricParseFailure(format!(
            "malformed SSIM aggregate '{token}'"
        ))),
    }
}

fn parse_psnr(token: &str) -> CoreResult<f64> {
    if token.eq_ignore_ascii_case("inf") {
        return Ok(PSNR_CAP);
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(CoreError::MetricParseFailure(format!(
            "malformed PSNR average '{token}'"
        ))),
    }
}
