//! Sliding window limiter for status polling.
//!
//! Each key keeps the instants of its accepted requests; anything older than
//! the window is forgotten on the next check. Rejected requests are not
//! recorded, so a client that backs off regains access once old requests
//! slide out of the window.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request for `key` and tells whether it is within the limit.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = hits.entry(key.to_string()).or_default();

        while let Some(oldest) = entries.front() {
            if now.duration_since(*oldest) < self.window {
                break;
            }
            entries.pop_front();
        }

        if entries.len() >= self.max_requests {
            return false;
        }
        entries.push_back(now);
        true
    }

    /// Drops keys with no request inside the window.
    pub fn purge_idle(&self) -> usize {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let before = hits.len();
        hits.retain(|_, entries| {
            entries
                .back()
                .is_some_and(|last| now.duration_since(*last) < self.window)
        });
        before - hits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rejects_above_threshold_within_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);

        assert!(limiter.check("A"));
        assert!(limiter.check("A"));
        assert!(limiter.check("A"));
        assert!(!limiter.check("A"));

        // Keys are independent.
        assert!(limiter.check("B"));
    }

    #[tokio::test(start_paused = true)]
    async fn window_slides() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);

        assert!(limiter.check("A"));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.check("A"));
        assert!(!limiter.check("A"));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(limiter.check("A"));
        assert!(!limiter.check("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn purge_idle_forgets_quiet_keys() {
        let limiter = RateLimiter::new(Duration::from_secs(10), 1);
        limiter.check("A");
        tokio::time::advance(Duration::from_secs(5)).await;
        limiter.check("B");
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(limiter.purge_idle(), 1);
        assert!(!limiter.check("B"));
        assert!(limiter.check("A"));
    }
}
