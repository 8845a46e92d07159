//! Cancelling a scan tears down every in-flight connection.
//!
//! Kept in its own test binary so no other test opens descriptors while
//! the count is taken.

#![cfg(target_os = "linux")]

use async_trait::async_trait;
use portprobe::{
    ConcurrentScanner, Port, ProbeResult, ProbeTarget, Prober, ScanError, ScanRequest, ScanResult,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

/// Connects to a fixed local listener and then holds the socket open for
/// the whole timeout, so every admitted probe owns a live descriptor.
struct HoldingProbe {
    addr: SocketAddr,
    connected: Arc<AtomicUsize>,
}

#[async_trait]
impl Prober for HoldingProbe {
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ScanResult<ProbeResult> {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        self.connected.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(timeout).await;
        drop(stream);
        Ok(ProbeResult::reachable(target.port()))
    }
}

fn open_descriptors() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_releases_sockets() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let connected = Arc::new(AtomicUsize::new(0));
    let scanner = ConcurrentScanner::with_prober(HoldingProbe {
        addr: listener.local_addr().unwrap(),
        connected: Arc::clone(&connected),
    });

    let limit = 8;
    let ports = (1..=40).filter_map(Port::new);
    let request = ScanRequest::new("127.0.0.1", ports, limit, Duration::from_secs(60)).unwrap();

    let baseline = open_descriptors();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watched = Arc::clone(&connected);
    tokio::spawn(async move {
        while watched.load(Ordering::SeqCst) < limit {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        trigger.cancel();
    });

    let started = Instant::now();
    let err = scanner.scan_with_cancel(&request, &cancel).await.unwrap_err();

    assert_eq!(err, ScanError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(connected.load(Ordering::SeqCst), limit);
    assert_eq!(open_descriptors(), baseline);
}
