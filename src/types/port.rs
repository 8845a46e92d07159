//! Port types with validation and parsing.
//!
//! `Port` guarantees a value in 1-65535. `PortSpec` parses the command-line
//! port grammar into a sorted, deduplicated list of ports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated TCP port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Lowest port a probe may target.
    pub const MIN: u16 = 1;
    /// Highest port a probe may target.
    pub const MAX: u16 = 65535;

    /// Create a new Port, returning None for port 0.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A port specification made of one or more ranges.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "1-1024"
/// - Mixed: "22,80,443,8000-9000"
#[derive(Debug, Clone, Default)]
pub struct PortSpec {
    ranges: Vec<PortRange>,
}

impl PortSpec {
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn add_range(&mut self, range: PortRange) {
        self.ranges.push(range);
    }

    pub fn add_port(&mut self, port: Port) {
        self.ranges.push(PortRange::single(port));
    }

    /// All ports as a sorted, deduplicated vector.
    pub fn to_ports(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = self.ranges.iter().flat_map(|r| r.iter()).collect();
        ports.sort_unstable();
        ports.dedup();
        ports
    }
}

fn parse_bound(raw: &str) -> Result<Port, PortError> {
    let raw = raw.trim();
    let value: u16 = raw
        .parse()
        .map_err(|_| PortError::InvalidFormat(raw.to_string()))?;
    Port::try_from(value)
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let mut spec = Self::new();
        for part in s.split(',').map(str::trim) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let range = PortRange::new(parse_bound(start)?, parse_bound(end)?)?;
                    spec.add_range(range);
                }
                None => spec.add_port(parse_bound(part)?),
            }
        }

        Ok(spec)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
        assert_eq!(Port::try_from(0), Err(PortError::OutOfRange(0)));
    }

    #[test]
    fn test_port_range() {
        let range = PortRange::new(Port::new(1).unwrap(), Port::new(100).unwrap()).unwrap();
        assert_eq!(range.iter().count(), 100);
        assert_eq!(range.to_string(), "1-100");

        let backwards = PortRange::new(Port::new(9).unwrap(), Port::new(3).unwrap());
        assert_eq!(backwards, Err(PortError::InvalidRange(9, 3)));
    }

    #[test]
    fn test_port_spec_parsing() {
        let spec: PortSpec = "80".parse().unwrap();
        assert_eq!(spec.to_ports().len(), 1);

        let spec: PortSpec = "22,80,443,8000-8010".parse().unwrap();
        assert_eq!(spec.to_ports().len(), 14);
        assert_eq!(spec.to_string(), "22,80,443,8000-8010");
    }

    #[test]
    fn test_port_spec_dedup_and_sort() {
        let spec: PortSpec = "443,80,80,79-81".parse().unwrap();
        let ports: Vec<u16> = spec.to_ports().into_iter().map(u16::from).collect();
        assert_eq!(ports, vec![79, 80, 81, 443]);
    }

    #[test]
    fn test_port_spec_rejects_garbage() {
        assert_eq!("".parse::<PortSpec>().unwrap_err(), PortError::Empty);
        assert!(matches!(
            "http".parse::<PortSpec>(),
            Err(PortError::InvalidFormat(_))
        ));
        assert!(matches!(
            "0-10".parse::<PortSpec>(),
            Err(PortError::OutOfRange(0))
        ));
        assert!(matches!(
            "1-2-3".parse::<PortSpec>(),
            Err(PortError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_port_serde_rejects_zero() {
        let port: Port = serde_json::from_str("8080").unwrap();
        assert_eq!(port.as_u16(), 8080);
        assert!(serde_json::from_str::<Port>("0").is_err());
    }
}
