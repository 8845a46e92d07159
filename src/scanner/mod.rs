//! Scanner module - single-port probes and the concurrent scanner that
//! fans them out.
//!
//! [`TcpProbe`] checks one port; [`ConcurrentScanner`] runs many probes on
//! the tokio runtime under a semaphore-enforced concurrency cap and gathers
//! the results into a [`ScanReport`].

mod concurrent;
mod rate_limiter;
mod report;
mod request;
mod resolve;
mod tcp;
pub mod traits;

pub use concurrent::{ConcurrentScanner, ResultObserver};
pub use rate_limiter::RateLimiter;
pub use report::{ScanReport, ScanSummary};
pub use request::ScanRequest;
pub use tcp::TcpProbe;
pub use traits::{ProbeErrorKind, ProbeResult, ProbeState, Prober};

use crate::error::ScanResult;

/// Probe every port in `request` over TCP connect.
///
/// Shorthand for `ConcurrentScanner::new().scan(request)`.
pub async fn scan(request: &ScanRequest) -> ScanResult<ScanReport> {
    ConcurrentScanner::new().scan(request).await
}
