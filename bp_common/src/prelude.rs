//! Prelude module for common re-exports.
//!
//! ```rust
//! use bp_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::protection::config::{HandlerConfig, ProtectionConfig};

// ─── Reference Constants ────────────────────────────────────────────
pub use crate::consts::{
    FORCE_CONFIRM_DURATION_S, INITIAL_BMS_MAX_EVER_CURRENT, MAX_INCREASE_AMPERE_PER_SECOND,
};

// ─── Protection Types ───────────────────────────────────────────────
pub use crate::protection::curve::{CurveConfig, CurvePoint, StepSide};
pub use crate::protection::force::{ForceParams, ForceState, Polarity};
pub use crate::protection::snapshot::{BatterySnapshot, ProtectionLimits, StartStop};
pub use crate::protection::strings::{StringControlMode, StringStatus};
