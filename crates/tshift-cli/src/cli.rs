//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Log time-shift detector.
///
/// Summarises server logs and, with --timeshifts, reports regions where the
/// timestamps jump backwards or forwards because the system clock changed.
#[derive(Debug, Parser)]
#[command(name = "tshift", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report time shifts (clock changes) found in each log.
    #[arg(long)]
    pub timeshifts: bool,

    /// Time-shift tolerance in milliseconds. Invalid values fall back to 500.
    #[arg(long, value_name = "MILLIS")]
    pub fudge: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log files to read (`.gz` is decompressed). Reads stdin if omitted or `-`.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Inputs to analyse, defaulting to stdin.
    pub fn inputs(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            self.files.clone()
        }
    }
}
