//! Sliding-window request tracker.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::{Result, RiftwatchError};

/// Widest window a tier may use (one year).
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Tracks recent actions inside a rolling time window.
///
/// Each recorded action is stored as the instant it happened and leaves
/// the window once `window` has elapsed since then. Since the window width
/// is fixed, actions expire in recording order and purging only ever trims
/// the front.
///
/// The window reports status but never refuses a `record`: enforcing the
/// limit is up to the caller.
#[derive(Debug, Clone)]
pub struct RateWindow {
    /// Maximum actions permitted inside the window
    limit: usize,
    /// Width of the window, at most `MAX_WINDOW`
    window: Duration,
    /// Recording instant of every live action, oldest first
    recorded: VecDeque<Instant>,
}

impl RateWindow {
    /// Create a window permitting `limit` actions per `window`.
    pub fn new(limit: usize, window: Duration) -> Result<Self> {
        if limit == 0 {
            return Err(RiftwatchError::Config(
                "rate window limit must be greater than zero".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(RiftwatchError::Config(
                "rate window width must be greater than zero".to_string(),
            ));
        }
        if window > MAX_WINDOW {
            return Err(RiftwatchError::Config(format!(
                "rate window width must be at most {}s, got {}s",
                MAX_WINDOW.as_secs(),
                window.as_secs_f64()
            )));
        }

        Ok(Self {
            limit,
            window,
            recorded: VecDeque::with_capacity(limit),
        })
    }

    /// Create a window from a width expressed in (fractional) seconds.
    pub fn from_secs_f64(limit: usize, window_secs: f64) -> Result<Self> {
        if window_secs <= 0.0 {
            return Err(RiftwatchError::Config(format!(
                "rate window width must be a positive number of seconds, got {}",
                window_secs
            )));
        }
        let window = Duration::try_from_secs_f64(window_secs).map_err(|e| {
            RiftwatchError::Config(format!("invalid rate window width {}: {}", window_secs, e))
        })?;
        Self::new(limit, window)
    }

    /// Record an action happening now.
    pub fn record(&mut self) {
        self.record_at(Instant::now());
    }

    /// Record an action happening at `now`.
    pub fn record_at(&mut self, now: Instant) {
        self.recorded.push_back(now);
    }

    /// Whether another action is currently permitted.
    pub fn available(&mut self) -> bool {
        self.available_at(Instant::now())
    }

    /// Whether another action is permitted at `now`.
    pub fn available_at(&mut self, now: Instant) -> bool {
        self.purge(now);
        self.recorded.len() < self.limit
    }

    /// The instant at which the next action becomes permitted.
    ///
    /// Returns the current instant when an action is permitted right away.
    pub fn next_available_at(&mut self) -> Instant {
        self.next_available_from(Instant::now())
    }

    /// The instant, as seen from `now`, at which the next action becomes
    /// permitted.
    ///
    /// When full, this is the expiration of the oldest live action: at
    /// that instant one slot frees up. A window recorded past its limit
    /// may still be full then, so callers waiting for capacity should
    /// check again afterwards, as `ApiClient::wait_for_capacity` does.
    pub fn next_available_from(&mut self, now: Instant) -> Instant {
        // The wait never exceeds MAX_WINDOW
        now + self.wait_from(now)
    }

    /// How long, as seen from `now`, until the next action is permitted.
    pub fn wait_from(&mut self, now: Instant) -> Duration {
        if self.available_at(now) {
            return Duration::ZERO;
        }
        self.recorded
            .front()
            .map(|&oldest| self.window.saturating_sub(now.saturating_duration_since(oldest)))
            .unwrap_or(Duration::ZERO)
    }

    /// Get the limit for this window.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Get the width of this window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of actions still inside the window as of the last purge.
    pub fn in_flight(&self) -> usize {
        self.recorded.len()
    }

    /// Drop every action recorded at least `window` before `now`.
    fn purge(&mut self, now: Instant) {
        let window = self.window;
        while self
            .recorded
            .front()
            .is_some_and(|&at| now.saturating_duration_since(at) >= window)
        {
            self.recorded.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_window_rejects_zero_limit() {
        assert!(RateWindow::new(0, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_window_rejects_bad_width() {
        assert!(RateWindow::new(1, Duration::ZERO).is_err());
        assert!(RateWindow::from_secs_f64(1, 0.0).is_err());
        assert!(RateWindow::from_secs_f64(1, -2.0).is_err());
        assert!(RateWindow::from_secs_f64(1, f64::NAN).is_err());
    }

    #[test]
    fn test_window_rejects_unrepresentable_width() {
        assert!(matches!(RateWindow::from_secs_f64(1, 1e20), Err(RiftwatchError::Config(_))));
        assert!(matches!(RateWindow::from_secs_f64(1, 1e19), Err(RiftwatchError::Config(_))));
        assert!(RateWindow::from_secs_f64(1, f64::INFINITY).is_err());
        assert!(RateWindow::new(1, Duration::MAX).is_err());
        assert!(RateWindow::new(1, MAX_WINDOW + ms(1)).is_err());
    }

    #[test]
    fn test_widest_window_records_and_waits() {
        let mut window = RateWindow::new(1, MAX_WINDOW).unwrap();
        let t0 = Instant::now();

        window.record();
        window.record_at(t0);
        assert!(!window.available_at(t0));
        assert!(window.wait_from(t0) <= MAX_WINDOW);
        assert!(window.next_available_from(t0) > t0);
    }

    #[test]
    fn test_over_recorded_window_frees_one_slot_at_a_time() {
        let mut window = RateWindow::new(1, Duration::from_secs(1)).unwrap();
        let t0 = Instant::now();

        window.record_at(t0);
        window.record_at(t0 + ms(500));

        let first = window.next_available_from(t0 + ms(600));
        assert_eq!(first, t0 + Duration::from_secs(1));
        // The second entry is still live, so the window stays full
        assert!(!window.available_at(first));
        assert_eq!(window.wait_from(first), ms(500));
        assert!(window.available_at(t0 + ms(1500)));
    }

    #[test]
    fn test_window_from_fractional_secs() {
        let window = RateWindow::from_secs_f64(3, 0.2).unwrap();
        assert_eq!(window.limit(), 3);
        assert_eq!(window.window(), ms(200));
    }

    #[test]
    fn test_window_at_limit() {
        let mut window = RateWindow::new(2, Duration::from_secs(2)).unwrap();
        let t0 = Instant::now();

        window.record_at(t0);
        window.record_at(t0);

        assert!(!window.available_at(t0));
        assert!(window.available_at(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_window_over_limit() {
        let mut window = RateWindow::new(1, Duration::from_secs(2)).unwrap();
        let t0 = Instant::now();

        window.record_at(t0);
        window.record_at(t0);

        assert!(!window.available_at(t0));
        assert_eq!(window.in_flight(), 2);

        // Both entries leave together, nothing lingers
        assert!(window.available_at(t0 + Duration::from_secs(2)));
        assert_eq!(window.in_flight(), 0);
    }

    #[test]
    fn test_window_under_limit() {
        let mut window = RateWindow::new(2, Duration::from_secs(2)).unwrap();
        window.record();
        assert!(window.available());
    }

    #[test]
    fn test_window_boundary_is_exact() {
        let mut window = RateWindow::new(2, ms(200)).unwrap();
        let t0 = Instant::now();

        window.record_at(t0);
        assert!(window.available_at(t0));

        window.record_at(t0 + ms(100));
        assert!(!window.available_at(t0 + ms(100)));
        assert!(!window.available_at(t0 + ms(199)));

        // The first entry expires at exactly t0 + 200ms
        assert!(window.available_at(t0 + ms(200)));
        assert!(window.available_at(t0 + ms(220)));
    }

    #[test]
    fn test_window_real_clock() {
        let mut window = RateWindow::new(2, ms(200)).unwrap();

        window.record();
        assert!(window.available());

        window.record();
        assert!(!window.available());

        std::thread::sleep(ms(220));
        assert!(window.available());
    }

    #[test]
    fn test_next_available_when_free() {
        let mut window = RateWindow::new(2, Duration::from_secs(1)).unwrap();
        let t0 = Instant::now();

        window.record_at(t0);
        assert_eq!(window.next_available_from(t0 + ms(10)), t0 + ms(10));
    }

    #[test]
    fn test_next_available_is_oldest_expiration() {
        let mut window = RateWindow::new(2, Duration::from_secs(1)).unwrap();
        let t0 = Instant::now();

        window.record_at(t0);
        window.record_at(t0 + ms(300));

        let next = window.next_available_from(t0 + ms(400));
        assert_eq!(next, t0 + Duration::from_secs(1));

        // Once the oldest entry leaves, a slot is free again
        assert!(window.available_at(next));
        assert_eq!(window.in_flight(), 1);
    }
}
