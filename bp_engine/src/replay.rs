//! Deterministic trace replay.
//!
//! A trace is a TOML list of cycles. Each cycle gives the time elapsed since
//! the previous one and any measurement that changed; fields left out keep
//! their last-known value. The first cycle must give every measurement.
//!
//! ```toml
//! [[cycle]]
//! elapsed_s = 0.0
//! charge_max_current = 80
//! discharge_max_current = 80
//! min_cell_voltage = 2950.0
//! max_cell_voltage = 3300.0
//! min_cell_temperature = 16.0
//! max_cell_temperature = 17.0
//! expect_charge = 0
//!
//! [[cycle]]
//! label = "open, but ramp limited"
//! elapsed_s = 2.0
//! min_cell_voltage = 3000.0
//! expect_charge = 1
//! ```

use std::time::Duration;

use bp_common::protection::force::ForceState;
use bp_common::protection::snapshot::{BatterySnapshot, ProtectionLimits, StartStop};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::ProtectionEngine;

/// Trace replay error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// First cycle leaves a measurement undefined.
    #[error("cycle {cycle}: no value for `{field}` yet")]
    MissingField { cycle: usize, field: &'static str },
    /// Elapsed time negative, not finite, or overflowing the trace clock.
    #[error("cycle {cycle}: invalid elapsed time {elapsed_s}")]
    InvalidElapsed { cycle: usize, elapsed_s: f64 },
}

/// A recorded input trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "cycle", default)]
    pub cycles: Vec<TraceCycle>,
}

/// One cycle of a trace; `None` carries the previous value over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceCycle {
    #[serde(default)]
    pub label: Option<String>,
    /// Time since the previous cycle [s].
    #[serde(default)]
    pub elapsed_s: f64,
    pub charge_max_current: Option<i32>,
    pub discharge_max_current: Option<i32>,
    pub min_cell_voltage: Option<f64>,
    pub max_cell_voltage: Option<f64>,
    pub min_cell_temperature: Option<f64>,
    pub max_cell_temperature: Option<f64>,
    pub start_stop: Option<StartStop>,
    /// Expected published charge limit.
    pub expect_charge: Option<i32>,
    /// Expected published discharge limit.
    pub expect_discharge: Option<i32>,
}

/// Output of one replayed cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayRecord {
    pub cycle: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Time since the start of the trace [s].
    pub time_s: f64,
    pub limits: ProtectionLimits,
    pub charge_force: ForceState,
    pub discharge_force: ForceState,
    /// `Some(false)` if an expectation in the trace was not met.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expectation_met: Option<bool>,
}

/// Measurement values accumulated across cycles.
#[derive(Debug, Default)]
struct LastKnown {
    charge_max_current: Option<i32>,
    discharge_max_current: Option<i32>,
    min_cell_voltage: Option<f64>,
    max_cell_voltage: Option<f64>,
    min_cell_temperature: Option<f64>,
    max_cell_temperature: Option<f64>,
    start_stop: StartStop,
}

impl LastKnown {
    fn update(&mut self, c: &TraceCycle) {
        self.charge_max_current = c.charge_max_current.or(self.charge_max_current);
        self.discharge_max_current = c.discharge_max_current.or(self.discharge_max_current);
        self.min_cell_voltage = c.min_cell_voltage.or(self.min_cell_voltage);
        self.max_cell_voltage = c.max_cell_voltage.or(self.max_cell_voltage);
        self.min_cell_temperature = c.min_cell_temperature.or(self.min_cell_temperature);
        self.max_cell_temperature = c.max_cell_temperature.or(self.max_cell_temperature);
        if let Some(s) = c.start_stop {
            self.start_stop = s;
        }
    }

    fn snapshot(&self, cycle: usize) -> Result<BatterySnapshot, ReplayError> {
        fn need<T: Copy>(v: Option<T>, cycle: usize, field: &'static str) -> Result<T, ReplayError> {
            v.ok_or(ReplayError::MissingField { cycle, field })
        }
        Ok(BatterySnapshot {
            charge_max_current: need(self.charge_max_current, cycle, "charge_max_current")?,
            discharge_max_current: need(self.discharge_max_current, cycle, "discharge_max_current")?,
            min_cell_voltage: need(self.min_cell_voltage, cycle, "min_cell_voltage")?,
            max_cell_voltage: need(self.max_cell_voltage, cycle, "max_cell_voltage")?,
            min_cell_temperature: need(self.min_cell_temperature, cycle, "min_cell_temperature")?,
            max_cell_temperature: need(self.max_cell_temperature, cycle, "max_cell_temperature")?,
            start_stop: self.start_stop,
        })
    }
}

/// Replay `trace` through `engine`, one record per cycle.
///
/// Use a fresh engine for reproducible output.
pub fn replay(engine: &mut ProtectionEngine, trace: &Trace) -> Result<Vec<ReplayRecord>, ReplayError> {
    let mut known = LastKnown::default();
    let mut now = Duration::ZERO;
    let mut records = Vec::with_capacity(trace.cycles.len());

    for (cycle, c) in trace.cycles.iter().enumerate() {
        let invalid = || ReplayError::InvalidElapsed {
            cycle,
            elapsed_s: c.elapsed_s,
        };
        let step = Duration::try_from_secs_f64(c.elapsed_s).map_err(|_| invalid())?;
        now = now.checked_add(step).ok_or_else(invalid)?;
        known.update(c);
        let snapshot = known.snapshot(cycle)?;

        let limits = engine.apply(&snapshot, now);

        let expectation_met = match (c.expect_charge, c.expect_discharge) {
            (None, None) => None,
            (charge, discharge) => Some(
                charge.is_none_or(|v| v == limits.charge_max_current)
                    && discharge.is_none_or(|v| v == limits.discharge_max_current),
            ),
        };

        records.push(ReplayRecord {
            cycle,
            label: c.label.clone(),
            time_s: now.as_secs_f64(),
            limits,
            charge_force: engine.charge().force_state(),
            discharge_force: engine.discharge().force_state(),
            expectation_met,
        });
    }

    Ok(records)
}
