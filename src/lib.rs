//! # portprobe - Concurrent TCP Port Reachability Prober
//!
//! Given a host and a list of ports, portprobe determines for each port
//! whether a TCP connection can be established within a per-probe timeout.
//! Probes run in parallel on the tokio runtime under a hard concurrency cap.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::scanner::{ConcurrentScanner, ScanRequest};
//! use portprobe::types::Port;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portprobe::ScanError> {
//!     let ports = [22, 80, 443].into_iter().filter_map(Port::new);
//!     let request = ScanRequest::new("192.168.1.1", ports, 50, Duration::from_secs(1))?;
//!     let report = ConcurrentScanner::new().scan(&request).await?;
//!
//!     for result in &report {
//!         println!("Port {} is {}", result.port, result.state());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated port and target types
//! - [`scanner`] - The TCP probe, the `Prober` trait and the concurrent scanner
//! - [`error`] - Scan-level and front-end error types
//! - [`config`] - Settings file backing command-line defaults
//! - [`output`] - Plain, JSON and CSV renderers
//! - [`cli`] / [`log`] - The `portprobe` binary's argument parsing and logging

pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use scanner::{
    scan, ConcurrentScanner, ProbeErrorKind, ProbeResult, ProbeState, Prober, ScanReport,
    ScanRequest, TcpProbe,
};
pub use types::{Port, PortSpec, ProbeTarget};
