//! Scan request: what to probe and under which limits.

use crate::error::{ScanError, ScanResult};
use crate::types::Port;
use std::collections::HashSet;
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

/// Parameters of one scan. Read-only to the scanner.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    host: String,
    ports: Vec<Port>,
    concurrency_limit: NonZeroUsize,
    timeout_per_probe: Duration,
    rate_limit: Option<NonZeroU32>,
}

impl ScanRequest {
    /// Build a request, rejecting an empty host, duplicate ports, a zero
    /// concurrency limit or a zero timeout.
    ///
    /// Ports keep the order they were given in. An empty port list is valid
    /// and produces an empty report.
    pub fn new(
        host: impl Into<String>,
        ports: impl IntoIterator<Item = Port>,
        concurrency_limit: usize,
        timeout_per_probe: Duration,
    ) -> ScanResult<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ScanError::InvalidRequest("host must not be empty".into()));
        }

        let ports: Vec<Port> = ports.into_iter().collect();
        let mut seen = HashSet::with_capacity(ports.len());
        if let Some(dup) = ports.iter().find(|p| !seen.insert(**p)) {
            return Err(ScanError::InvalidRequest(format!("port {dup} listed twice")));
        }

        let concurrency_limit = NonZeroUsize::new(concurrency_limit).ok_or_else(|| {
            ScanError::InvalidRequest("concurrency limit must be at least 1".into())
        })?;

        if timeout_per_probe.is_zero() {
            return Err(ScanError::InvalidRequest(
                "probe timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            host,
            ports,
            concurrency_limit,
            timeout_per_probe,
            rate_limit: None,
        })
    }

    /// Cap probe dispatches per second. Zero means unlimited.
    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.rate_limit = NonZeroU32::new(per_second);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit.get()
    }

    pub fn timeout_per_probe(&self) -> Duration {
        self.timeout_per_probe
    }

    pub fn rate_limit(&self) -> Option<NonZeroU32> {
        self.rate_limit
    }
}
