//! Per-cycle measurement snapshot and published limits.

use serde::{Deserialize, Serialize};

/// Battery start/stop status as reported by the hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartStop {
    /// Battery is running.
    Start,
    /// Battery is stopped.
    Stop,
    /// Status not (yet) known.
    #[default]
    Undefined,
}

/// Measurements read once per control cycle.
///
/// The hardware layer always supplies a last-known value; the engine treats
/// every field as valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatterySnapshot {
    /// Manufacturer-advertised charge current ceiling [A].
    pub charge_max_current: i32,
    /// Manufacturer-advertised discharge current ceiling [A].
    pub discharge_max_current: i32,
    /// Lowest cell voltage [mV].
    pub min_cell_voltage: f64,
    /// Highest cell voltage [mV].
    pub max_cell_voltage: f64,
    /// Lowest cell temperature [°C].
    pub min_cell_temperature: f64,
    /// Highest cell temperature [°C].
    pub max_cell_temperature: f64,
    /// Start/stop status (not used by the limit computation).
    #[serde(default)]
    pub start_stop: StartStop,
}

/// The two control values published every cycle.
///
/// A negative value is a directive, not a current: `-1` on the charge limit
/// means "must discharge now", on the discharge limit "must charge now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtectionLimits {
    /// Maximum allowed charge current [A].
    pub charge_max_current: i32,
    /// Maximum allowed discharge current [A].
    pub discharge_max_current: i32,
}

impl ProtectionLimits {
    /// Whether the charge limit carries the force-discharge directive.
    #[inline]
    pub const fn is_force_discharge(&self) -> bool {
        self.charge_max_current < 0
    }

    /// Whether the discharge limit carries the force-charge directive.
    #[inline]
    pub const fn is_force_charge(&self) -> bool {
        self.discharge_max_current < 0
    }
}
