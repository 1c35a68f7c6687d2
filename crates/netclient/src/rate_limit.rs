use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// A crude per-host leaky-bucket limiter: tracks the earliest instant a
/// request to a given host is allowed to proceed and pushes it forward by
/// `1/rps` on every admission. Good enough to keep a crawl from hammering
/// any one source faster than its configured budget; not a general-purpose
/// rate limiter.
pub struct HostRateLimiter {
    requests_per_second: Option<u32>,
    next_allowed: Mutex<FxHashMap<String, Instant>>,
}

impl HostRateLimiter {
    pub fn new(requests_per_second: Option<u32>) -> Self {
        Self {
            requests_per_second,
            next_allowed: Mutex::new(FxHashMap::default()),
        }
    }

    /// Waits, if necessary, until `host` is allowed to be hit again.
    pub async fn acquire(&self, host: &str) {
        let Some(rps) = self.requests_per_second else {
            return;
        };
        if rps == 0 {
            return;
        }
        let interval = Duration::from_secs_f64(1.0 / rps as f64);

        let wait_until = {
            let mut guard = self.next_allowed.lock();
            let now = Instant::now();
            let scheduled = guard.get(host).copied().unwrap_or(now).max(now);
            guard.insert(host.to_string(), scheduled + interval);
            scheduled
        };

        let now = Instant::now();
        if wait_until > now {
            tokio::time::sleep(wait_until - now).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unlimited_does_not_wait() {
        let limiter = HostRateLimiter::new(None);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire("example.com").await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn limits_distinct_hosts_independently() {
        let limiter = HostRateLimiter::new(Some(2));
        let start = Instant::now();
        limiter.acquire("a.example").await;
        limiter.acquire("b.example").await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
