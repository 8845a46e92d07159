//! Bounded-concurrency fan-out of probes over a port list.

use crate::error::{ResolveError, ScanError, ScanResult};
use crate::scanner::rate_limiter::RateLimiter;
use crate::scanner::report::ScanReport;
use crate::scanner::request::ScanRequest;
use crate::scanner::resolve::resolve_host;
use crate::scanner::tcp::TcpProbe;
use crate::scanner::traits::{ProbeErrorKind, ProbeResult, ProbeState, Prober};
use crate::types::ProbeTarget;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Callback invoked once per completed probe, on the aggregating task.
pub type ResultObserver = Box<dyn Fn(&ProbeResult) + Send + Sync>;

/// Runs one probe per requested port with at most `concurrency_limit` in flight.
///
/// Admission is gated by a counting semaphore: a probe task is only spawned
/// after it holds a permit, and the permit is released when the probe
/// finishes. Results are collected by port, so the report is the same
/// whatever order probes complete in.
///
/// # Example
///
/// ```rust,ignore
/// use portprobe::scanner::{ConcurrentScanner, ScanRequest};
/// use portprobe::types::Port;
/// use std::time::Duration;
///
/// let ports = [22, 80, 443].into_iter().filter_map(Port::new);
/// let request = ScanRequest::new("127.0.0.1", ports, 50, Duration::from_secs(1))?;
/// let report = ConcurrentScanner::new().scan(&request).await?;
/// for result in &report {
///     println!("{} {}", result.port, result.state());
/// }
/// ```
pub struct ConcurrentScanner<P = TcpProbe> {
    prober: Arc<P>,
    observer: Option<ResultObserver>,
}

impl ConcurrentScanner<TcpProbe> {
    /// Scanner backed by the TCP connect probe.
    pub fn new() -> Self {
        Self::with_prober(TcpProbe::new())
    }
}

impl Default for ConcurrentScanner<TcpProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Prober + 'static> ConcurrentScanner<P> {
    pub fn with_prober(prober: P) -> Self {
        Self {
            prober: Arc::new(prober),
            observer: None,
        }
    }

    /// Get notified of every result as it arrives (e.g. to drive a progress bar).
    pub fn with_observer(
        mut self,
        observer: impl Fn(&ProbeResult) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Scan every port in the request. Cannot be cancelled from outside.
    pub async fn scan(&self, request: &ScanRequest) -> ScanResult<ScanReport> {
        self.scan_with_cancel(request, &CancellationToken::new()).await
    }

    /// Scan every port in the request, stopping early if `cancel` fires.
    ///
    /// Returns either a report with exactly one entry per requested port or
    /// a scan-level error, never a partial report. On cancellation or a fatal
    /// probe error every in-flight probe is aborted and awaited before this
    /// returns, so no sockets outlive the call.
    ///
    /// The host is resolved once, before the first connection attempt. A
    /// host that cannot be resolved within `timeout_per_probe` yields a
    /// complete report with every port unreachable (`Other`).
    pub async fn scan_with_cancel(
        &self,
        request: &ScanRequest,
        cancel: &CancellationToken,
    ) -> ScanResult<ScanReport> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let started = Instant::now();
        info!(
            host = request.host(),
            ports = request.ports().len(),
            concurrency = request.concurrency_limit(),
            timeout_ms = request.timeout_per_probe().as_millis() as u64,
            "starting scan"
        );

        if request.ports().is_empty() {
            return Ok(ScanReport::new());
        }

        let addr = tokio::select! {
            biased;

            () = cancel.cancelled() => {
                warn!(host = request.host(), "scan cancelled while resolving");
                return Err(ScanError::Cancelled);
            }

            resolved = resolve_within(request.host(), request.timeout_per_probe()) => {
                match resolved {
                    Ok(addr) => addr,
                    Err(e) => {
                        warn!(host = request.host(), error = %e, "every port unreachable");
                        return Ok(self.unresolved(request));
                    }
                }
            }
        };
        debug!(host = request.host(), %addr, "host resolved");

        // Never more permits than ports, which also keeps an oversized limit
        // below the semaphore's maximum.
        let permits = request.concurrency_limit().min(request.ports().len());
        let semaphore = Arc::new(Semaphore::new(permits));
        let limiter = request.rate_limit().map(RateLimiter::new);
        let mut tasks = JoinSet::new();
        let mut report = ScanReport::new();

        let mut pending = request.ports().iter().copied();
        let mut next = pending.next();

        while next.is_some() || !tasks.is_empty() {
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tasks.shutdown().await;
                    warn!(host = request.host(), completed = report.len(), "scan cancelled");
                    return Err(ScanError::Cancelled);
                }

                Some(joined) = tasks.join_next() => {
                    match flatten(joined) {
                        Ok(result) => self.record(&mut report, result),
                        Err(e) => {
                            tasks.shutdown().await;
                            warn!(host = request.host(), error = %e, "aborting scan");
                            return Err(e);
                        }
                    }
                }

                permit = Arc::clone(&semaphore).acquire_owned(), if next.is_some() => {
                    let permit = permit.map_err(|_| {
                        ScanError::ResourceExhaustion("probe admission closed".into())
                    })?;
                    if let Some(port) = next.take() {
                        let target = ProbeTarget::new(request.host(), addr, port);
                        let timeout = request.timeout_per_probe();
                        self.dispatch(&mut tasks, target, timeout, permit, limiter.clone());
                        next = pending.next();
                    }
                }
            }
        }

        debug_assert_eq!(report.len(), request.ports().len());
        info!(
            host = request.host(),
            reachable = report.reachable_ports().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(report)
    }

    /// Spawn the probe for one target. The permit travels with the task.
    fn dispatch(
        &self,
        tasks: &mut JoinSet<ScanResult<ProbeResult>>,
        target: ProbeTarget,
        timeout: Duration,
        permit: OwnedSemaphorePermit,
        limiter: Option<RateLimiter>,
    ) {
        let prober = Arc::clone(&self.prober);
        debug!(%target, state = %ProbeState::Pending, "probe admitted");

        tasks.spawn(async move {
            let _permit = permit;
            if let Some(limiter) = limiter {
                limiter.wait().await;
            }
            debug!(%target, state = %ProbeState::Connecting, "probe dispatched");
            prober.probe(&target, timeout).await
        });
    }

    /// Every port unreachable: no address means no connection to attempt.
    fn unresolved(&self, request: &ScanRequest) -> ScanReport {
        let mut report = ScanReport::new();
        for &port in request.ports() {
            self.record(&mut report, ProbeResult::unreachable(port, ProbeErrorKind::Other));
        }
        report
    }

    fn record(&self, report: &mut ScanReport, result: ProbeResult) {
        if let Some(observer) = &self.observer {
            observer(&result);
        }
        report.insert(result);
    }
}

/// Resolve `host`, giving up after `limit`.
async fn resolve_within(host: &str, limit: Duration) -> Result<IpAddr, ResolveError> {
    tokio::time::timeout(limit, resolve_host(host))
        .await
        .unwrap_or_else(|_| Err(ResolveError::TimedOut(host.to_string())))
}

/// Unwrap a finished task, resuming its panic on this task if it had one.
fn flatten(joined: Result<ScanResult<ProbeResult>, JoinError>) -> ScanResult<ProbeResult> {
    match joined {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(ScanError::Cancelled),
    }
}
