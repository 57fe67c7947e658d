//! Protection configuration structures.
//!
//! One [`HandlerConfig`] per direction, grouped in a [`ProtectionConfig`].
//! [`ProtectionConfig::reference`] is the reference configuration for a
//! lithium iron phosphate pack with an 80 A manufacturer limit.

use serde::{Deserialize, Serialize};

use super::curve::CurveConfig;
use super::force::ForceParams;
use crate::consts::{
    FORCE_CONFIRM_DURATION_S, INITIAL_BMS_MAX_EVER_CURRENT, MAX_INCREASE_AMPERE_PER_SECOND,
};

/// Configuration of one current-limit handler.
///
/// # TOML Example
///
/// ```toml
/// [protection.charge]
/// initial_max_ever_current = 80
/// max_increase_per_second = 0.5
/// force = { start = 3660.0, hold = 3640.0, block = 3450.0 }
/// voltage_to_percent = [{ x = 3000.0, y = 0.1 }, { x = 3450.0, y = 1.0 }]
/// temperature_to_percent = [{ x = 0.0, y = 0.2 }, { x = 16.0, y = 1.0 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Seed of the "maximum ever advertised" tracker [A].
    #[serde(default = "default_initial_max_ever_current")]
    pub initial_max_ever_current: i32,
    /// Maximum ramp-up rate of the published limit [A/s].
    #[serde(default = "default_max_increase_per_second")]
    pub max_increase_per_second: f64,
    /// Force-override thresholds.
    pub force: ForceParams,
    /// Cell voltage [mV] → derating fraction.
    pub voltage_to_percent: CurveConfig,
    /// Cell temperature [°C] → derating fraction.
    pub temperature_to_percent: CurveConfig,
}

fn default_initial_max_ever_current() -> i32 {
    INITIAL_BMS_MAX_EVER_CURRENT
}
fn default_max_increase_per_second() -> f64 {
    MAX_INCREASE_AMPERE_PER_SECOND
}
fn default_force_confirm_duration_s() -> f64 {
    FORCE_CONFIRM_DURATION_S
}

impl HandlerConfig {
    /// Reference charge handler: force-discharge above 3660 mV.
    pub fn reference_charge() -> Self {
        Self {
            initial_max_ever_current: INITIAL_BMS_MAX_EVER_CURRENT,
            max_increase_per_second: MAX_INCREASE_AMPERE_PER_SECOND,
            force: ForceParams::new(3660.0, 3640.0, 3450.0),
            voltage_to_percent: CurveConfig::new()
                .point(3000.0, 0.1)
                .point_above(3000.0, 1.0)
                .point(3450.0, 1.0)
                .point(3600.0, 0.02)
                .point_below(3650.0, 0.02)
                .point(3650.0, 0.0),
            temperature_to_percent: CurveConfig::new()
                .point_below(-10.0, 0.0)
                .point(-10.0, 0.215)
                .point(0.0, 0.215)
                .point(1.0, 0.325)
                .point(5.0, 0.325)
                .point(6.0, 0.65)
                .point(15.0, 0.65)
                .point(16.0, 1.0)
                .point(44.0, 1.0)
                .point(45.0, 0.65)
                .point(49.0, 0.65)
                .point(50.0, 0.325)
                .point(54.0, 0.325)
                .point(55.0, 0.0),
        }
    }

    /// Reference discharge handler: force-charge below 2850 mV.
    pub fn reference_discharge() -> Self {
        Self {
            initial_max_ever_current: INITIAL_BMS_MAX_EVER_CURRENT,
            max_increase_per_second: MAX_INCREASE_AMPERE_PER_SECOND,
            force: ForceParams::new(2850.0, 2910.0, 3000.0),
            voltage_to_percent: CurveConfig::new()
                .point(2900.0, 0.0)
                .point_above(2900.0, 0.05)
                .point(2920.0, 0.05)
                .point(3000.0, 1.0)
                .point(3700.0, 1.0)
                .point_above(3700.0, 0.0),
            temperature_to_percent: CurveConfig::new()
                .point_below(-10.0, 0.0)
                .point(-10.0, 0.215)
                .point(0.0, 0.215)
                .point(1.0, 1.0)
                .point(44.0, 1.0)
                .point(45.0, 0.865)
                .point(49.0, 0.865)
                .point(50.0, 0.325)
                .point(54.0, 0.325)
                .point(55.0, 0.0),
        }
    }
}

/// Configuration of a complete protection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionConfig {
    /// Continuous breach time before a force override engages [s].
    #[serde(default = "default_force_confirm_duration_s")]
    pub force_confirm_duration_s: f64,
    /// Charge-limit handler.
    pub charge: HandlerConfig,
    /// Discharge-limit handler.
    pub discharge: HandlerConfig,
}

impl ProtectionConfig {
    /// Reference configuration for both handlers.
    pub fn reference() -> Self {
        Self {
            force_confirm_duration_s: FORCE_CONFIRM_DURATION_S,
            charge: HandlerConfig::reference_charge(),
            discharge: HandlerConfig::reference_discharge(),
        }
    }
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self::reference()
    }
}
