//! Probe trait abstraction and per-probe result types.
//!
//! Defines the interface every single-port probe implements, so the
//! concurrent scanner can be driven by the real TCP probe or by an
//! instrumented one in tests.

use crate::error::ScanResult;
use crate::types::{Port, ProbeTarget};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why a probe did not reach its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    /// Nothing completed within the probe timeout.
    Timeout,
    /// The target actively refused the connection (RST received).
    ConnectionRefused,
    /// The host or its network could not be reached.
    HostUnreachable,
    /// Any other negative outcome, including name resolution failure.
    Other,
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionRefused => write!(f, "connection refused"),
            Self::HostUnreachable => write!(f, "host unreachable"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Lifecycle of a single probe.
///
/// `Pending -> Connecting -> {Reachable | Refused | TimedOut | Errored}`.
/// The last four are terminal; a probe never returns to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    Pending,
    Connecting,
    Reachable,
    Refused,
    TimedOut,
    Errored,
}

impl ProbeState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Connecting)
    }
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Connecting => write!(f, "connecting"),
            Self::Reachable => write!(f, "reachable"),
            Self::Refused => write!(f, "refused"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Outcome of probing one port. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub port: Port,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProbeErrorKind>,
}

impl ProbeResult {
    /// A successful connection.
    pub fn reachable(port: Port) -> Self {
        Self {
            port,
            reachable: true,
            error: None,
        }
    }

    /// A failed connection with the reason it failed.
    pub fn unreachable(port: Port, error: ProbeErrorKind) -> Self {
        Self {
            port,
            reachable: false,
            error: Some(error),
        }
    }

    /// Terminal state this result corresponds to.
    pub fn state(&self) -> ProbeState {
        match (self.reachable, self.error) {
            (true, _) => ProbeState::Reachable,
            (false, Some(ProbeErrorKind::ConnectionRefused)) => ProbeState::Refused,
            (false, Some(ProbeErrorKind::Timeout)) => ProbeState::TimedOut,
            (false, _) => ProbeState::Errored,
        }
    }
}

/// A single-port reachability check.
///
/// Implementations make exactly one attempt per call and encode ordinary
/// network failures in the returned [`ProbeResult`]. An `Err` is reserved for
/// conditions that must abort the whole scan, such as running out of file
/// descriptors.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ScanResult<ProbeResult>;
}
