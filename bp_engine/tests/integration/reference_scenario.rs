//! Integration test: reference ramp, derating and force-discharge sequence.
//!
//! Drives a fresh engine with a monotonic clock through:
//! 1. Ramp-up from zero at 0.5 A/s
//! 2. High cell voltage derating of the charge limit
//! 3. Force-discharge: confirm → forcing → blocked → normal

use std::time::Duration;

use bp_common::protection::config::ProtectionConfig;
use bp_common::protection::force::ForceState;
use bp_common::protection::snapshot::{BatterySnapshot, StartStop};
use bp_engine::ProtectionEngine;

// ── Helpers ─────────────────────────────────────────────────────────

struct Rig {
    engine: ProtectionEngine,
    snapshot: BatterySnapshot,
    now: Duration,
}

impl Rig {
    fn new() -> Self {
        Self {
            engine: ProtectionEngine::new(&ProtectionConfig::reference()).unwrap(),
            snapshot: BatterySnapshot {
                charge_max_current: 80,
                discharge_max_current: 80,
                min_cell_voltage: 2950.0,
                max_cell_voltage: 3300.0,
                min_cell_temperature: 16.0,
                max_cell_temperature: 17.0,
                start_stop: StartStop::Start,
            },
            now: Duration::from_secs(3600),
        }
    }

    /// Advance the clock by `secs`, run one cycle, return `(charge, discharge)`.
    fn step(&mut self, secs: u64) -> (i32, i32) {
        self.now += Duration::from_secs(secs);
        let limits = self.engine.apply(&self.snapshot, self.now);
        (limits.charge_max_current, limits.discharge_max_current)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn first_cycle_publishes_zero() {
    let mut rig = Rig::new();
    assert_eq!(rig.step(0), (0, 0));
    assert_eq!(rig.engine.clock().cycle_count(), 1);
}

#[test]
fn ramps_up_then_derates_on_high_voltage() {
    let mut rig = Rig::new();
    assert_eq!(rig.step(0), (0, 0));

    rig.snapshot.min_cell_voltage = 3000.0;
    assert_eq!(rig.step(2), (1, 1));

    rig.snapshot.min_cell_voltage = 3050.0;
    assert_eq!(rig.step(2), (2, 2));
    assert_eq!(rig.step(10), (7, 7));
    assert_eq!(rig.step(600), (80, 80));

    rig.snapshot.max_cell_voltage = 3499.0;
    assert_eq!(rig.step(600), (54, 80));

    // Decreases are never rate limited.
    rig.snapshot.max_cell_voltage = 3649.0;
    assert_eq!(rig.step(600), (2, 80));
    assert_eq!(rig.step(600), (2, 80));

    rig.snapshot.max_cell_voltage = 3650.0;
    assert_eq!(rig.step(600), (0, 80));
}

#[test]
fn force_discharge_full_cycle() {
    let mut rig = Rig::new();
    rig.step(0);
    rig.snapshot.min_cell_voltage = 3050.0;
    rig.step(600);
    rig.snapshot.max_cell_voltage = 3650.0;
    assert_eq!(rig.step(600), (0, 80));

    rig.snapshot.max_cell_voltage = 3660.0;
    assert_eq!(rig.step(1), (0, 80));
    assert_eq!(rig.engine.charge().force_state(), ForceState::AwaitConfirm);

    assert_eq!(rig.step(60), (-1, 80));
    assert_eq!(rig.engine.charge().force_state(), ForceState::Forcing);
    assert!(rig.engine.limits().is_force_discharge());

    rig.snapshot.max_cell_voltage = 3640.0;
    assert_eq!(rig.step(1), (-1, 80));

    rig.snapshot.max_cell_voltage = 3639.0;
    assert_eq!(rig.step(1), (0, 80));
    assert_eq!(rig.engine.charge().force_state(), ForceState::Blocked);

    rig.snapshot.max_cell_voltage = 3600.0;
    assert_eq!(rig.step(1), (0, 80));

    rig.snapshot.max_cell_voltage = 3450.0;
    assert_eq!(rig.step(1), (0, 80));

    // Released: ramp resumes from the forced value.
    rig.snapshot.max_cell_voltage = 3449.0;
    assert_eq!(rig.step(1), (1, 80));
    assert_eq!(rig.engine.charge().force_state(), ForceState::Normal);
    assert_eq!(rig.step(3), (2, 80));

    assert_eq!(rig.engine.discharge().force_state(), ForceState::Normal);
}

#[test]
fn breakdown_explains_published_limit() {
    let mut rig = Rig::new();
    rig.snapshot.min_cell_voltage = 3050.0;
    rig.snapshot.max_cell_voltage = 3499.0;
    rig.step(0);
    rig.step(1000);

    let (charge, discharge) = rig.engine.breakdown();
    assert_eq!(charge.published, 54);
    assert_eq!(charge.max_ever_current, 80.0);
    assert_eq!(charge.temperature_percent, 1.0);
    assert!((charge.voltage_percent - (1.0 - 49.0 * 0.98 / 150.0)).abs() < 1e-12);
    assert_eq!(discharge.published, 80);
    assert_eq!(discharge.target, 80.0);
}
