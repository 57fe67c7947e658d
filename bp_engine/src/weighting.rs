//! Load weighting across parallel battery strings.
//!
//! Distributes a power request over up to three strings in proportion to
//! what each can currently take or deliver (`min(string ceiling, published
//! limit) × voltage`). With no power requested, every ready string gets an
//! equal share. Absent or not-ready strings get 0.

use bp_common::consts::{MAX_CURRENT_PER_STRING, MAX_STRINGS};
use bp_common::protection::strings::{StringControlMode, StringStatus};

/// Raw weights, one per string slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StringWeights(pub [f64; MAX_STRINGS]);

impl StringWeights {
    #[inline]
    pub const fn as_array(&self) -> &[f64; MAX_STRINGS] {
        &self.0
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Weights scaled to sum to 1; all zero when nothing can take load.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return Self::default();
        }
        Self(self.0.map(|w| w / total))
    }
}

/// Weighting policy for one converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringWeighting {
    /// Per-string current ceiling [A].
    max_string_current: i32,
}

impl Default for StringWeighting {
    fn default() -> Self {
        Self::new(MAX_CURRENT_PER_STRING)
    }
}

impl StringWeighting {
    pub const fn new(max_string_current: i32) -> Self {
        Self { max_string_current }
    }

    /// Weights for `active_power` (> 0 discharge, < 0 charge, 0 idle).
    pub fn weights(
        &self,
        active_power: f64,
        strings: [Option<&StringStatus>; MAX_STRINGS],
    ) -> StringWeights {
        StringWeights(strings.map(|s| match s {
            Some(s) if s.is_ready() => {
                if active_power > 0.0 {
                    self.capacity(s.discharge_max_current, s.voltage)
                } else if active_power < 0.0 {
                    self.capacity(s.charge_max_current, s.voltage)
                } else {
                    1.0
                }
            }
            _ => 0.0,
        }))
    }

    fn capacity(&self, limit: i32, voltage: f64) -> f64 {
        f64::from(self.max_string_current.min(limit)) * voltage
    }
}

/// Control-word bits of all running strings.
///
/// A string whose state is undefined does not count as running.
pub fn string_control_mode(strings: [Option<&StringStatus>; MAX_STRINGS]) -> StringControlMode {
    strings
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            Some(s) if s.is_ready() => StringControlMode::for_index(i),
            _ => None,
        })
        .fold(StringControlMode::empty(), |mode, bit| mode | bit)
}
