//! Rate limiting for probe dispatch.
//!
//! Token bucket pacing shared by every probe task of one scan. It only
//! delays dispatch; the concurrency cap is enforced separately.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Caps how many probes may start per second.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<GovLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    /// Allow at most `per_second` dispatches per second, evenly spaced.
    pub fn new(per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(per_second).allow_burst(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(GovLimiter::direct(quota)),
        }
    }

    /// Wait until the next dispatch is allowed.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn per_second(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_rate_limiter_wait() {
        let limiter = RateLimiter::new(per_second(1000));
        limiter.wait().await;
    }

    #[tokio::test]
    async fn test_clones_share_the_bucket() {
        let limiter = RateLimiter::new(per_second(10));
        let clone = limiter.clone();

        let started = Instant::now();
        limiter.wait().await;
        clone.wait().await;

        // The clone had to wait out the token its original just spent.
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
