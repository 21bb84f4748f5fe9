//! Client-side rate limit bookkeeping.

mod limiter;
mod rules;
mod window;

pub use limiter::RateLimiter;
pub use rules::RateLimitRule;
pub use window::{RateWindow, MAX_WINDOW};
