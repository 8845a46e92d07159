//! Probe target: one (host, port) pair and the address it resolved to.

use super::Port;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// A single host/port pair handed to a probe.
///
/// The host is kept as given (IP literal or hostname) for display; the
/// connection goes to `addr`, which the scanner resolves once per scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeTarget {
    host: String,
    addr: IpAddr,
    port: Port,
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, addr: IpAddr, port: Port) -> Self {
        Self {
            host: host.into(),
            addr,
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Port {
        self.port
    }

    /// Address and port to connect to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port.as_u16())
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bracket bare IPv6 literals so the port stays unambiguous.
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
