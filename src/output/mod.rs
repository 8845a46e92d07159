//! Output formatting module.
//!
//! Renders a finished scan as plain text, JSON or CSV into any writer.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, write_plain};

use crate::scanner::{ScanReport, ScanSummary};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// A completed scan, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub host: String,
    pub duration_ms: u64,
    pub summary: ScanSummary,
    pub results: ScanReport,
}

impl ScanRecord {
    pub fn new(host: impl Into<String>, report: ScanReport, elapsed: Duration) -> Self {
        Self {
            host: host.into(),
            duration_ms: elapsed.as_millis() as u64,
            summary: report.summary(),
            results: report,
        }
    }
}

/// Render `record` in the requested format.
pub fn write_results<W: Write>(
    out: &mut W,
    record: &ScanRecord,
    format: OutputFormat,
    show_unreachable: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, record, show_unreachable),
        OutputFormat::Json => write_json(out, record),
        OutputFormat::Csv => write_csv(out, record),
    }
}
