// cqscout-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use cqscout_core::config::{
    DEFAULT_CODEC, DEFAULT_FINAL_PRESET, DEFAULT_TRIAL_PRESET, ENCODER_PATH_ENV, RateControl,
    SearchStrategy,
};
use cqscout_core::quality::{DEFAULT_MIN_PSNR, DEFAULT_MIN_SSIM};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "cqscout",
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "cqscout: find the most aggressive quality setting per video",
    long_about = "Walks a directory for .mp4 files and, for each one, searches the highest \
                  encoder quality parameter whose ssim and psnr against a near-lossless \
                  anchor still meet the thresholds, then encodes the file at that parameter."
)]
pub struct Cli {
    /// Directory searched recursively for .mp4 files
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: PathBuf,

    // --- Encoder ---
    /// ffmpeg binary (defaults to a bundled ffmpeg/bin/ffmpeg, then PATH)
    #[arg(long = "ffmpeg", value_name = "PATH", env = ENCODER_PATH_ENV)]
    pub ffmpeg: Option<PathBuf>,

    /// Video codec passed to -c:v (e.g. libx265, hevc_nvenc)
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_CODEC)]
    pub codec: String,

    /// How the parameter is passed: crf (-crf) or cq (-cq, nvenc)
    #[arg(long, value_name = "MODE", default_value_t = RateControl::Crf)]
    pub rate_control: RateControl,

    /// Preset for the trial encodes
    #[arg(long, value_name = "PRESET", default_value = DEFAULT_TRIAL_PRESET)]
    pub trial_preset: String,

    /// Preset for the final encode
    #[arg(long, value_name = "PRESET", default_value = DEFAULT_FINAL_PRESET)]
    pub final_preset: String,

    // --- Search ---
    /// Minimum ssim (0-1) a parameter must reach
    #[arg(long, value_name = "SSIM", default_value_t = DEFAULT_MIN_SSIM)]
    pub min_ssim: f64,

    /// Minimum psnr (dB) a parameter must reach
    #[arg(long, value_name = "PSNR", default_value_t = DEFAULT_MIN_PSNR)]
    pub min_psnr: f64,

    /// Probe order: bisection or linear
    #[arg(long, value_name = "STRATEGY", default_value_t = SearchStrategy::Bisection)]
    pub strategy: SearchStrategy,

    // --- Batch ---
    /// Record per-file failures and continue with the next file
    #[arg(long)]
    pub keep_going: bool,

    /// Skip inputs that already have a .cq<N>.mp4 result next to them
    #[arg(long)]
    pub skip_processed: bool,

    // --- Output ---
    /// Print JSON lines instead of score tables
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
