//! Scan report: one result per requested port, keyed by port.

use crate::scanner::traits::{ProbeErrorKind, ProbeResult};
use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final mapping from port to probe result.
///
/// Keyed by port, so iteration order does not depend on the order in which
/// probes completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanReport {
    results: BTreeMap<Port, ProbeResult>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result. Returns the previous entry if the port was already present.
    pub(crate) fn insert(&mut self, result: ProbeResult) -> Option<ProbeResult> {
        self.results.insert(result.port, result)
    }

    pub fn get(&self, port: Port) -> Option<&ProbeResult> {
        self.results.get(&port)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in ascending port order.
    pub fn iter(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.values()
    }

    /// Ports that accepted a connection.
    pub fn reachable_ports(&self) -> Vec<Port> {
        self.iter().filter(|r| r.reachable).map(|r| r.port).collect()
    }

    /// Count results per outcome.
    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            total: self.len(),
            ..ScanSummary::default()
        };
        for result in self.iter() {
            match result.error {
                None if result.reachable => summary.reachable += 1,
                Some(ProbeErrorKind::ConnectionRefused) => summary.refused += 1,
                Some(ProbeErrorKind::Timeout) => summary.timed_out += 1,
                _ => summary.errored += 1,
            }
        }
        summary
    }
}

impl<'a> IntoIterator for &'a ScanReport {
    type Item = &'a ProbeResult;
    type IntoIter = std::collections::btree_map::Values<'a, Port, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.values()
    }
}

/// Per-outcome counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub reachable: usize,
    pub refused: usize,
    pub timed_out: usize,
    pub errored: usize,
}

impl ScanSummary {
    pub fn unreachable(&self) -> usize {
        self.total - self.reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(p: u16) -> Port {
        Port::new(p).unwrap()
    }

    #[test]
    fn test_report_is_port_ordered() {
        let mut report = ScanReport::new();
        report.insert(ProbeResult::unreachable(port(8081), ProbeErrorKind::Timeout));
        report.insert(ProbeResult::reachable(port(22)));
        report.insert(ProbeResult::reachable(port(443)));

        let order: Vec<u16> = report.iter().map(|r| r.port.as_u16()).collect();
        assert_eq!(order, vec![22, 443, 8081]);
        assert_eq!(report.reachable_ports(), vec![port(22), port(443)]);
    }

    #[test]
    fn test_summary_counts() {
        let mut report = ScanReport::new();
        report.insert(ProbeResult::reachable(port(1)));
        report.insert(ProbeResult::unreachable(port(2), ProbeErrorKind::ConnectionRefused));
        report.insert(ProbeResult::unreachable(port(3), ProbeErrorKind::ConnectionRefused));
        report.insert(ProbeResult::unreachable(port(4), ProbeErrorKind::Timeout));
        report.insert(ProbeResult::unreachable(port(5), ProbeErrorKind::HostUnreachable));

        let summary = report.summary();
        assert_eq!(
            summary,
            ScanSummary {
                total: 5,
                reachable: 1,
                refused: 2,
                timed_out: 1,
                errored: 1,
            }
        );
        assert_eq!(summary.unreachable(), 4);
    }

    #[test]
    fn test_report_serializes_as_map() {
        let mut report = ScanReport::new();
        report.insert(ProbeResult::reachable(port(8080)));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["8080"]["reachable"], true);
    }
}
