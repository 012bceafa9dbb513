// src/services/rate_limit.rs

//! Randomized pacing between detail requests.

use std::time::Duration;

use rand::Rng;

use crate::models::CrawlerConfig;

/// Sleeps a uniformly random interval between successive calls to [`wait`].
///
/// The collector calls [`wait`] before every detail fetch, so the first
/// posting of a run goes out immediately and each later one follows a pause
/// drawn from `min_ms..=max_ms`. Listing pages are never delayed.
///
/// [`wait`]: RateLimiter::wait
#[derive(Debug)]
pub struct RateLimiter {
    min_ms: u64,
    max_ms: u64,
    primed: bool,
}

impl RateLimiter {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
            primed: false,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// Pause before the next request. The first call returns immediately.
    pub async fn wait(&mut self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::debug!("Sleeping {} ms before next posting", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    fn next_delay(&mut self) -> Duration {
        if !self.primed {
            self.primed = true;
            return Duration::ZERO;
        }
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }
}
