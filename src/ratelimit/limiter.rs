//! Multi-tier rate limiter.

use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::rules::RateLimitRule;
use super::window::RateWindow;
use crate::error::{Result, RiftwatchError};

/// A set of rate windows that must all permit a request.
///
/// The limiter is throttled by its tightest tier: it is available only
/// when every tier is, and the wait time is that of the slowest tier.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// One window per configured tier, in configuration order
    windows: Vec<RateWindow>,
}

impl RateLimiter {
    /// Create a limiter with one window per rule.
    pub fn new(rules: &[RateLimitRule]) -> Result<Self> {
        if rules.is_empty() {
            return Err(RiftwatchError::Config(
                "at least one rate limit tier is required".to_string(),
            ));
        }

        let windows = rules
            .iter()
            .map(|rule| {
                debug!(
                    limit = rule.limit,
                    window_secs = rule.window_secs,
                    "Creating rate window"
                );
                rule.build_window()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { windows })
    }

    /// Record one request on every tier.
    pub fn record(&mut self) {
        self.record_at(Instant::now());
    }

    /// Record one request made at `now` on every tier.
    pub fn record_at(&mut self, now: Instant) {
        for window in &mut self.windows {
            window.record_at(now);
        }
        trace!(tiers = self.windows.len(), "Recorded request");
    }

    /// Whether every tier currently permits another request.
    pub fn available(&mut self) -> bool {
        self.available_at(Instant::now())
    }

    /// Whether every tier permits another request at `now`.
    pub fn available_at(&mut self, now: Instant) -> bool {
        // Purge every tier, not just up to the first one that refuses
        self.windows
            .iter_mut()
            .fold(true, |all, window| window.available_at(now) && all)
    }

    /// How long until every tier permits another request.
    pub fn wait_time(&mut self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    /// How long, as seen from `now`, until every tier permits another
    /// request. Zero when available.
    pub fn wait_time_at(&mut self, now: Instant) -> Duration {
        let wait = self
            .windows
            .iter_mut()
            .map(|window| window.wait_from(now))
            .max()
            .unwrap_or(Duration::ZERO);

        trace!(wait_ms = wait.as_millis() as u64, "Computed wait time");
        wait
    }

    /// Get the configured windows.
    pub fn windows(&self) -> &[RateWindow] {
        &self.windows
    }
}
