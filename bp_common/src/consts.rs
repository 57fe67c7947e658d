//! System-wide constants for the battery protection workspace.
//!
//! Single source of truth for the reference configuration values.

use static_assertions::const_assert;

/// Maximum ramp-up rate of a published current limit [A/s].
pub const MAX_INCREASE_AMPERE_PER_SECOND: f64 = 0.5;

/// Initial seed for the "maximum ever advertised" current tracker [A].
pub const INITIAL_BMS_MAX_EVER_CURRENT: i32 = 80;

/// Continuous breach time before a force override engages [s].
pub const FORCE_CONFIRM_DURATION_S: f64 = 60.0;

/// Published limit while a force override is active.
///
/// Negative: "must move power in the opposite direction", not a current.
pub const FORCE_SENTINEL_CURRENT: i32 = -1;

/// Per-string current ceiling used for load weighting [A].
pub const MAX_CURRENT_PER_STRING: i32 = 80;

/// Number of parallel battery strings handled by the weighting.
pub const MAX_STRINGS: usize = 3;

/// Capacity of a derating curve (fixed-size, allocation-free).
pub const MAX_CURVE_POINTS: usize = 32;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/bp/protection.toml";

const_assert!(MAX_CURVE_POINTS >= 2);
const_assert!(FORCE_SENTINEL_CURRENT < 0);
