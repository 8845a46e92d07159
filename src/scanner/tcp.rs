//! TCP connect probe.
//!
//! Performs a single connect() against one port using the operating
//! system's socket API. No elevated privileges are needed and no data is
//! exchanged: the stream is closed as soon as the handshake completes.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{ProbeErrorKind, ProbeResult, Prober};
use crate::types::ProbeTarget;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;
use tracing::debug;

/// TCP connect probe.
///
/// Each call makes exactly one connection attempt to the target's resolved
/// address. Socket allocation and the handshake run inside the caller's
/// timeout, and the socket is released on every path, including when the
/// future is dropped mid-connect.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl TcpProbe {
    pub fn new() -> Self {
        Self
    }

    async fn attempt_connect(&self, target: &ProbeTarget) -> Result<TcpStream, Failure> {
        let addr = target.socket_addr();
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(|e| classify(&e))?;

        socket.connect(addr).await.map_err(|e| classify(&e))
    }
}

#[async_trait]
impl Prober for TcpProbe {
    async fn probe(&self, target: &ProbeTarget, limit: Duration) -> ScanResult<ProbeResult> {
        let port = target.port();

        let result = match timeout(limit, self.attempt_connect(target)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                ProbeResult::reachable(port)
            }
            Ok(Err(Failure::Unreachable(kind))) => ProbeResult::unreachable(port, kind),
            Ok(Err(Failure::Exhausted(e))) => {
                return Err(ScanError::ResourceExhaustion(format!("{target}: {e}")));
            }
            Err(_) => ProbeResult::unreachable(port, ProbeErrorKind::Timeout),
        };

        debug!(%target, state = %result.state(), "probe finished");
        Ok(result)
    }
}

/// How a connection attempt failed.
#[derive(Debug)]
enum Failure {
    /// Ordinary negative outcome, recorded in the result.
    Unreachable(ProbeErrorKind),
    /// The process or kernel ran out of something; the scan cannot go on.
    Exhausted(io::Error),
}

/// Map an I/O error from socket allocation or connect into a failure class.
fn classify(err: &io::Error) -> Failure {
    if is_exhaustion(err) {
        return Failure::Exhausted(io::Error::new(err.kind(), err.to_string()));
    }

    let kind = match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeErrorKind::ConnectionRefused,
        io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
            ProbeErrorKind::HostUnreachable
        }
        io::ErrorKind::TimedOut => ProbeErrorKind::Timeout,
        _ => ProbeErrorKind::Other,
    };
    Failure::Unreachable(kind)
}

#[cfg(unix)]
fn is_exhaustion(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EMFILE | libc::ENFILE | libc::ENOBUFS | libc::ENOMEM)
    )
}

#[cfg(not(unix))]
fn is_exhaustion(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::OutOfMemory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::net::TcpListener;

    const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn kind_of(err: io::Error) -> Option<ProbeErrorKind> {
        match classify(&err) {
            Failure::Unreachable(kind) => Some(kind),
            Failure::Exhausted(_) => None,
        }
    }

    #[test]
    fn test_classify_network_errors() {
        assert_eq!(
            kind_of(io::ErrorKind::ConnectionRefused.into()),
            Some(ProbeErrorKind::ConnectionRefused)
        );
        assert_eq!(
            kind_of(io::ErrorKind::HostUnreachable.into()),
            Some(ProbeErrorKind::HostUnreachable)
        );
        assert_eq!(
            kind_of(io::ErrorKind::NetworkUnreachable.into()),
            Some(ProbeErrorKind::HostUnreachable)
        );
        assert_eq!(
            kind_of(io::ErrorKind::TimedOut.into()),
            Some(ProbeErrorKind::Timeout)
        );
        assert_eq!(
            kind_of(io::ErrorKind::PermissionDenied.into()),
            Some(ProbeErrorKind::Other)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_exhaustion() {
        for code in [libc::EMFILE, libc::ENFILE, libc::ENOBUFS, libc::ENOMEM] {
            assert!(kind_of(io::Error::from_raw_os_error(code)).is_none());
        }
        assert_eq!(
            kind_of(io::Error::from_raw_os_error(libc::ECONNREFUSED)),
            Some(ProbeErrorKind::ConnectionRefused)
        );
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let target = ProbeTarget::new("127.0.0.1", LOOPBACK, port);
        let result = TcpProbe::new()
            .probe(&target, Duration::from_millis(500))
            .await
            .unwrap();

        assert!(result.reachable);
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_probe_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        let target = ProbeTarget::new("127.0.0.1", LOOPBACK, port);
        let result = TcpProbe::new()
            .probe(&target, Duration::from_millis(500))
            .await
            .unwrap();

        assert!(!result.reachable);
        assert_eq!(result.error, Some(ProbeErrorKind::ConnectionRefused));
    }

    #[tokio::test]
    async fn test_connects_to_resolved_address_without_lookup() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        // The name is never looked up; only the carried address is used.
        let target = ProbeTarget::new("nonexistent.invalid", LOOPBACK, port);
        let result = TcpProbe::new()
            .probe(&target, Duration::from_millis(500))
            .await
            .unwrap();

        assert!(result.reachable);
    }
}
