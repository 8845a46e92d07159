//! Host name resolution, done once per scan before any connection attempt.

use crate::error::ResolveError;
use std::net::{IpAddr, Ipv4Addr};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Resolve `host` to the address every probe of a scan connects to.
///
/// IP literals and `localhost` are answered without a lookup. Other names
/// go through the async resolver and the first address returned is used.
pub async fn resolve_host(host: &str) -> Result<IpAddr, ResolveError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| ResolveError::LookupFailed(host.to_string(), e.to_string()))?;

    response
        .iter()
        .next()
        .ok_or_else(|| ResolveError::NoAddresses(host.to_string()))
}
