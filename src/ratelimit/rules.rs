//! Rate limit tier configuration.
//!
//! Each tier is one externally imposed limit: a number of requests per
//! window. All configured tiers must be satisfied at once.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::window::{RateWindow, MAX_WINDOW};
use crate::error::{Result, RiftwatchError};

/// Requests allowed per window for a development key, short tier.
const DEV_SHORT_LIMIT: usize = 10;
/// Window width of the short development tier, in seconds.
const DEV_SHORT_WINDOW_SECS: f64 = 10.0;
/// Requests allowed per window for a development key, long tier.
const DEV_LONG_LIMIT: usize = 500;
/// Window width of the long development tier, in seconds.
const DEV_LONG_WINDOW_SECS: f64 = 600.0;

/// A single rate limit tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimitRule {
    /// Number of requests allowed per window
    pub limit: usize,
    /// Width of the window in seconds
    pub window_secs: f64,
}

impl RateLimitRule {
    /// Create a new rule.
    pub fn new(limit: usize, window_secs: f64) -> Self {
        Self { limit, window_secs }
    }

    /// The tiers granted to a development API key.
    pub fn development_key() -> Vec<Self> {
        vec![
            Self::new(DEV_SHORT_LIMIT, DEV_SHORT_WINDOW_SECS),
            Self::new(DEV_LONG_LIMIT, DEV_LONG_WINDOW_SECS),
        ]
    }

    /// Get the window width as a duration.
    ///
    /// Fails for widths that are not positive, not representable, or wider
    /// than [`MAX_WINDOW`].
    pub fn window(&self) -> Result<Duration> {
        if self.window_secs <= 0.0 {
            return Err(RiftwatchError::Config(format!(
                "rate limit tier {} must have a positive window",
                self
            )));
        }
        let window = Duration::try_from_secs_f64(self.window_secs).map_err(|e| {
            RiftwatchError::Config(format!("rate limit tier {} has an invalid window: {}", self, e))
        })?;
        if window > MAX_WINDOW {
            return Err(RiftwatchError::Config(format!(
                "rate limit tier {} exceeds the widest window of {}s",
                self,
                MAX_WINDOW.as_secs()
            )));
        }
        Ok(window)
    }

    /// Check that the rule describes a usable window.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(RiftwatchError::Config(format!(
                "rate limit tier {} must allow at least one request",
                self
            )));
        }
        self.window()?;
        Ok(())
    }

    /// Build the tracking window for this rule.
    pub fn build_window(&self) -> Result<RateWindow> {
        self.validate()?;
        RateWindow::new(self.limit, self.window()?)
    }
}

impl From<(usize, f64)> for RateLimitRule {
    fn from((limit, window_secs): (usize, f64)) -> Self {
        Self::new(limit, window_secs)
    }
}

impl std::fmt::Display for RateLimitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}s", self.limit, self.window_secs)
    }
}
