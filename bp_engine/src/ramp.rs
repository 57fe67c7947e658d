//! Rate-limited current limit.
//!
//! Increases are bounded by `max_increase_per_second × elapsed`; decreases
//! apply immediately. [`RateLimitedTarget::force_to`] bypasses the rate rule
//! and becomes the baseline for the next ramp.

/// Continuous-valued current limit with an asymmetric rate rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitedTarget {
    /// Maximum ramp-up rate [A/s].
    max_increase_per_second: f64,
    /// Current continuous limit [A].
    state: f64,
}

impl RateLimitedTarget {
    /// New target at 0 A.
    pub const fn new(max_increase_per_second: f64) -> Self {
        Self {
            max_increase_per_second,
            state: 0.0,
        }
    }

    /// Advance one cycle toward `target` and return the published value.
    ///
    /// Negative `elapsed_s` is treated as zero.
    #[inline]
    pub fn advance(&mut self, target: f64, elapsed_s: f64) -> i32 {
        if target >= self.state {
            let budget = self.max_increase_per_second * elapsed_s.max(0.0);
            self.state = target.min(self.state + budget);
        } else {
            self.state = target;
        }
        self.published()
    }

    /// Set the state directly, bypassing the rate rule.
    #[inline]
    pub fn force_to(&mut self, value: f64) {
        self.state = value;
    }

    /// Current continuous state [A].
    #[inline]
    pub const fn state(&self) -> f64 {
        self.state
    }

    /// State rounded half away from zero.
    #[inline]
    pub fn published(&self) -> i32 {
        // `as` saturates at the i32 bounds.
        self.state.round() as i32
    }

    /// Configured ramp-up rate [A/s].
    #[inline]
    pub const fn max_increase_per_second(&self) -> f64 {
        self.max_increase_per_second
    }
}
