//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe network
//! failures are not errors here: they are recorded as data in
//! [`ProbeResult`](crate::scanner::ProbeResult). Only conditions that end a
//! whole scan live in [`ScanError`].

use std::path::PathBuf;
use thiserror::Error;

/// Scan-level error. A scan returns either a complete report or one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("resource exhaustion: {0}")]
    ResourceExhaustion(String),

    #[error("scan cancelled")]
    Cancelled,

    #[error("invalid scan request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Name resolution failure for a scan's host.
///
/// Never returned from a scan: every port of an unresolvable host is
/// reported unreachable instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("failed to resolve {0}: {1}")]
    LookupFailed(String, String),

    #[error("no addresses found for {0}")]
    NoAddresses(String),

    #[error("timed out resolving {0}")]
    TimedOut(String),
}

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Port(#[from] crate::types::PortError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
