//! Command-line interface for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags that
//! are not given fall back to the settings file, then to built-in defaults.

use crate::config::ProbeSettings;
use crate::error::{CliResult, ConfigError};
use crate::output::{self, OutputFormat, ScanRecord};
use crate::scanner::{ConcurrentScanner, ScanRequest};
use crate::types::PortSpec;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Probe which TCP ports on a host accept connections.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent TCP port reachability prober", long_about = None)]
pub struct Args {
    /// Host name or IP address to probe
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Ports to probe (e.g., "80", "80,443", "1-1024", "22,80,443,8000-9000")
    #[arg(short, long, default_value = "1-1024")]
    pub ports: String,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-probe connection timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Probe dispatches per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// List unreachable ports in plain output
    #[arg(long)]
    pub show_unreachable: bool,

    /// Verbose output (debug logs and a progress bar)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Settings from `--config`, or from the default location.
    pub fn load_settings(&self) -> CliResult<ProbeSettings> {
        let settings = match &self.config {
            Some(path) => ProbeSettings::load_from(path)?,
            None => ProbeSettings::load()?,
        };
        Ok(settings)
    }

    /// Merge flags over settings into a validated request.
    pub fn build_request(&self, settings: &ProbeSettings) -> CliResult<ScanRequest> {
        let ports = self.ports.parse::<PortSpec>()?.to_ports();
        let concurrency = self.concurrency.unwrap_or(settings.default_concurrency);
        let timeout_ms = self.timeout.unwrap_or(settings.default_timeout_ms);
        let rate_limit = self.rate_limit.unwrap_or(settings.default_rate_limit);

        let request = ScanRequest::new(
            self.host.as_str(),
            ports,
            concurrency,
            Duration::from_millis(timeout_ms),
        )?
        .with_rate_limit(rate_limit);
        Ok(request)
    }

    pub fn output_format(&self, settings: &ProbeSettings) -> CliResult<OutputFormat> {
        match self.output {
            Some(format) => Ok(format),
            None => Ok(settings
                .default_output_format
                .parse()
                .map_err(ConfigError::InvalidFormat)?),
        }
    }

    /// Run the scan and print the report to stdout.
    ///
    /// A scan-level error (cancellation, resource exhaustion) is returned
    /// instead of printing anything, so callers can tell it apart from a
    /// report in which every port is unreachable.
    pub async fn execute(&self, cancel: &CancellationToken) -> CliResult<()> {
        let settings = self.load_settings()?;
        let request = self.build_request(&settings)?;
        let format = self.output_format(&settings)?;
        let show_unreachable = self.show_unreachable || settings.show_unreachable;
        let plain = format == OutputFormat::Plain;

        if plain && !self.quiet {
            output::print_scan_header(
                request.host(),
                request.ports().len(),
                request.concurrency_limit().min(request.ports().len()),
            );
        }

        let progress = (plain && self.verbose).then(|| progress_bar(request.ports().len()));
        let mut scanner = ConcurrentScanner::new();
        if let Some(pb) = progress.clone() {
            scanner = scanner.with_observer(move |result| {
                pb.inc(1);
                if result.reachable {
                    pb.set_message(format!("reachable: {}", result.port));
                }
            });
        }

        let started = Instant::now();
        let outcome = scanner.scan_with_cancel(&request, cancel).await;
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        let report = outcome?;

        let record = ScanRecord::new(request.host(), report, started.elapsed());
        let stdout = io::stdout();
        output::write_results(&mut stdout.lock(), &record, format, show_unreachable)?;
        Ok(())
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portprobe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let args = parse(&["10.0.0.1", "-p", "22,80"]);
        let request = args.build_request(&ProbeSettings::default()).unwrap();

        assert_eq!(request.host(), "10.0.0.1");
        assert_eq!(request.ports().len(), 2);
        assert_eq!(request.concurrency_limit(), 50);
        assert_eq!(request.timeout_per_probe(), Duration::from_secs(1));
        assert_eq!(request.rate_limit(), None);
    }

    #[test]
    fn test_flags_override_settings() {
        let args = parse(&["localhost", "-c", "8", "-t", "250", "-r", "100", "-o", "json"]);
        let settings = ProbeSettings::default();
        let request = args.build_request(&settings).unwrap();

        assert_eq!(request.ports().len(), 1024);
        assert_eq!(request.concurrency_limit(), 8);
        assert_eq!(request.timeout_per_probe(), Duration::from_millis(250));
        assert_eq!(request.rate_limit().map(|r| r.get()), Some(100));
        assert_eq!(args.output_format(&settings).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_bad_port_spec() {
        let args = parse(&["localhost", "-p", "80-20"]);
        let err = args.build_request(&ProbeSettings::default()).unwrap_err();
        assert!(matches!(err, CliError::Port(_)));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let args = parse(&["localhost", "-c", "0"]);
        let err = args.build_request(&ProbeSettings::default()).unwrap_err();
        assert!(matches!(err, CliError::Scan(_)));
    }

    #[test]
    fn test_settings_output_format() {
        let args = parse(&["localhost"]);
        let settings = ProbeSettings {
            default_output_format: "csv".into(),
            ..ProbeSettings::default()
        };
        assert_eq!(args.output_format(&settings).unwrap(), OutputFormat::Csv);

        let broken = ProbeSettings {
            default_output_format: "yaml".into(),
            ..ProbeSettings::default()
        };
        assert!(args.output_format(&broken).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let parsed = Args::try_parse_from(["portprobe", "localhost", "-v", "-q"]);
        assert!(parsed.is_err());
    }
}
