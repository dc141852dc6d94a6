// ============================================================================
// cqscout-cli/src/output.rs
// ============================================================================
//
// OUTPUT: Score Tables, JSON Lines and the Batch Summary
//
// Two SearchObserver implementations write progress to stdout:
// - TableObserver: the running score table after every probe
// - JsonObserver: one JSON object per probe and per finished file
//
// AI-ASSISTANT-INFO: stdout rendering of search progress and results

use console::style;
use cqscout_core::search::{SearchObserver, SearchOutcome, SearchState};
use cqscout_core::{BatchSummary, QualityParameter, QualityScore, format_bytes, format_duration};
use serde_json::json;
use std::io::Write;
use std::path::Path;

fn report_write_error(result: std::io::Result<()>) {
    if let Err(e) = result {
        log::warn!("Failed to write output: {e}");
    }
}

// ============================================================================
// TABLE OUTPUT
// ============================================================================

/// Prints the running score table for each file.
pub struct TableObserver<W: Write> {
    out: W,
}

impl<W: Write> TableObserver<W> {
    pub fn new(out: W) -> Self {
        TableObserver { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SearchObserver for TableObserver<W> {
    fn on_anchor(&mut self, file: &Path, _anchor: &Path) {
        report_write_error(writeln!(
            self.out,
            "\n{} {}",
            style("==>").cyan().bold(),
            style(file.display()).bold()
        ));
    }

    fn on_probe(
        &mut self,
        _file: &Path,
        parameter: QualityParameter,
        score: QualityScore,
        accepted: bool,
        state: &SearchState,
    ) {
        let verdict = if accepted {
            style("accepted").green()
        } else {
            style("rejected").red()
        };
        report_write_error(writeln!(self.out, "cq {parameter}: {score} {verdict}\n{state}"));
    }

    fn on_complete(&mut self, outcome: &SearchOutcome) {
        report_write_error(writeln!(
            self.out,
            "{} cq {} -> {}",
            style("done:").green().bold(),
            outcome.parameter,
            outcome.output.display()
        ));
    }
}

// ============================================================================
// JSON OUTPUT
// ============================================================================

/// Prints one JSON object per line.
pub struct JsonObserver<W: Write> {
    out: W,
}

impl<W: Write> JsonObserver<W> {
    pub fn new(out: W) -> Self {
        JsonObserver { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) {
        report_write_error(writeln!(self.out, "{value}"));
    }
}

impl<W: Write> SearchObserver for JsonObserver<W> {
    fn on_probe(
        &mut self,
        file: &Path,
        parameter: QualityParameter,
        score: QualityScore,
        accepted: bool,
        state: &SearchState,
    ) {
        self.emit(json!({
            "event": "probe",
            "file": file.display().to_string(),
            "parameter": parameter,
            "ssim": score.ssim,
            "psnr": score.psnr,
            "accepted": accepted,
            "low": state.low,
            "high": state.high,
        }));
    }

    fn on_complete(&mut self, outcome: &SearchOutcome) {
        let probes: Vec<_> = outcome
            .state
            .probed()
            .iter()
            .map(|p| {
                let score = outcome.state.score(*p);
                json!({ "parameter": p, "ssim": score.ssim, "psnr": score.psnr })
            })
            .collect();
        self.emit(json!({
            "event": "result",
            "file": outcome.file.display().to_string(),
            "parameter": outcome.parameter,
            "output": outcome.output.display().to_string(),
            "probes": probes,
        }));
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Writes the end-of-run summary in human readable form.
pub fn write_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> std::io::Result<()> {
    writeln!(out, "\n{}", style("Summary").bold().underlined())?;
    for result in &summary.completed {
        writeln!(
            out,
            "  {} cq {:>2}  {}  {} -> {} ({}% smaller, {} probes)",
            style("✓").green(),
            result.parameter,
            result.filename,
            format_bytes(result.input_size),
            format_bytes(result.output_size),
            result.size_reduction(),
            result.probes
        )?;
    }
    for (path, error) in &summary.failed {
        writeln!(out, "  {} {}: {}", style("✗").red(), path.display(), error)?;
    }
    writeln!(
        out,
        "{} processed, {} failed, total time {}",
        summary.completed.len(),
        summary.failed.len(),
        format_duration(summary.total_duration())
    )
}

/// Writes the summary's failures as JSON lines.
pub fn write_summary_json<W: Write>(out: &mut W, summary: &BatchSummary) -> std::io::Result<()> {
    for (path, error) in &summary.failed {
        writeln!(
            out,
            "{}",
            json!({
                "event": "failure",
                "file": path.display().to_string(),
                "error": error.to_string(),
            })
        )?;
    }
    Ok(())
}
