//! Activity end times, in seconds since midnight.
use crate::context::Context;
use crate::random::ContextRandomExt;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Seconds since midnight of `hour:00`.
#[must_use]
pub fn hours(hour: f64) -> f64 {
    hour * SECONDS_PER_HOUR
}

#[must_use]
pub fn minutes(minute: f64) -> f64 {
    minute * SECONDS_PER_MINUTE
}

pub trait ContextTimeExt {
    /// `anchor_seconds` plus a normal jitter with standard deviation `sd_seconds`. Consumes one
    /// Gaussian draw. The result is not clamped to the day and may be negative or past midnight.
    fn anchored_time(&self, anchor_seconds: f64, sd_seconds: f64) -> f64;
}

impl ContextTimeExt for Context {
    fn anchored_time(&self, anchor_seconds: f64, sd_seconds: f64) -> f64 {
        anchor_seconds + self.sample_gaussian() * sd_seconds
    }
}
