//! Force-override parameters, states and polarity.
//!
//! The charge side watches the highest cell voltage and forces a discharge when
//! it stays too high; the discharge side watches the lowest cell voltage and
//! forces a charge when it stays too low. Both share one automaton, mirrored
//! through [`Polarity`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::snapshot::BatterySnapshot;

/// Direction a current-limit handler protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Charge limit; high-voltage force-discharge override.
    Charge,
    /// Discharge limit; low-voltage force-charge override.
    Discharge,
}

impl Polarity {
    /// Whether `voltage` is at or beyond `threshold` in the protected direction.
    ///
    /// Equality counts as a breach for every threshold.
    #[inline]
    pub fn breaches(self, voltage: f64, threshold: f64) -> bool {
        match self {
            Self::Charge => voltage >= threshold,
            Self::Discharge => voltage <= threshold,
        }
    }

    /// Whether `start`, `hold`, `block` are strictly ordered for this polarity.
    ///
    /// Charge: `block < hold < start`. Discharge: `start < hold < block`.
    pub fn is_ordered(self, params: &ForceParams) -> bool {
        match self {
            Self::Charge => params.block < params.hold && params.hold < params.start,
            Self::Discharge => params.start < params.hold && params.hold < params.block,
        }
    }

    /// Cell voltage extreme that drives both the voltage curve and the override.
    #[inline]
    pub fn cell_voltage(self, snapshot: &BatterySnapshot) -> f64 {
        match self {
            Self::Charge => snapshot.max_cell_voltage,
            Self::Discharge => snapshot.min_cell_voltage,
        }
    }

    /// Manufacturer-advertised current ceiling for this direction.
    #[inline]
    pub fn advertised_limit(self, snapshot: &BatterySnapshot) -> i32 {
        match self {
            Self::Charge => snapshot.charge_max_current,
            Self::Discharge => snapshot.discharge_max_current,
        }
    }

    /// Name of the directive issued while the override is forcing.
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Charge => "force-discharge",
            Self::Discharge => "force-charge",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charge => write!(f, "charge"),
            Self::Discharge => write!(f, "discharge"),
        }
    }
}

/// Force-override voltage thresholds [mV].
///
/// # TOML Example
///
/// ```toml
/// force = { start = 3660.0, hold = 3640.0, block = 3450.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceParams {
    /// Voltage that arms the override once sustained for the confirm time.
    pub start: f64,
    /// Voltage the reading must stay at or beyond to keep forcing.
    pub hold: f64,
    /// Voltage the reading must stay at or beyond to keep the limit blocked.
    pub block: f64,
}

impl ForceParams {
    pub const fn new(start: f64, hold: f64, block: f64) -> Self {
        Self { start, hold, block }
    }
}

/// Force-override automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceState {
    /// Normal computation applies.
    #[default]
    Normal,
    /// Start threshold breached, dwell timer running.
    AwaitConfirm,
    /// Publishing the "move power the other way" sentinel.
    Forcing,
    /// Publishing zero until the block threshold is cleared.
    Blocked,
}

impl ForceState {
    /// Whether the published limit is currently dictated by the override.
    #[inline]
    pub const fn is_overriding(self) -> bool {
        matches!(self, Self::Forcing | Self::Blocked)
    }
}

impl fmt::Display for ForceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "Normal",
            Self::AwaitConfirm => "AwaitConfirm",
            Self::Forcing => "Forcing",
            Self::Blocked => "Blocked",
        };
        f.write_str(name)
    }
}
