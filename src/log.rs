//! Logging setup for the binary.
//!
//! The library only emits `tracing` events; a subscriber is installed here,
//! once, by `main`.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "portprobe=debug"
    } else if quiet {
        "portprobe=error"
    } else {
        "portprobe=warn"
    }
}

/// Install the global fmt subscriber, writing to stderr or appending to `log_file`.
pub fn init_logger(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    }
    .map_err(|e| anyhow!("failed to install logger: {e}"))
}
