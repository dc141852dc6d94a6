//! Formatting helpers for reports and log lines.
//!
//! Durations, byte counts and size reductions as shown in the batch summary.

use crate::error::{CoreError, CoreResult};

use std::path::Path;
use std::time::Duration;

/// Formats an elapsed time as HH:MM:SS (e.g. 3725s -> "01:02:05").
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(&str, f64); 3] = [
        ("GiB", 1024.0 * 1024.0 * 1024.0),
        ("MiB", 1024.0 * 1024.0),
        ("KiB", 1024.0),
    ];

    let value = bytes as f64;
    UNITS
        .iter()
        .find(|(_, size)| value >= *size)
        .map_or_else(|| format!("{bytes} B"), |(unit, size)| format!("{:.2} {unit}", value / size))
}

/// File name of `path` as a String, or a `PathError` if it has none.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CoreError::PathError(format!("no file name in {}", path.display())))
}

/// Percentage by which `output_size` is smaller than `input_size`, rounded
/// down. 0 when the output is not smaller or the input is empty.
#[must_use]
pub fn calculate_size_reduction(input_size: u64, output_size: u64) -> u64 {
    if input_size == 0 || output_size >= input_size {
        return 0;
    }
    let saved = u128::from(input_size - output_size) * 100 / u128::from(input_size);
    saved as u64
}
