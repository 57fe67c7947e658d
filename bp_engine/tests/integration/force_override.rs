//! Integration test: force-charge on the discharge side.
//!
//! Mirrors the force-discharge sequence for a deeply discharged cell and
//! checks that the two directions never interfere.

use bp_common::protection::config::ProtectionConfig;
use bp_common::protection::force::ForceState;
use bp_common::protection::snapshot::{BatterySnapshot, StartStop};
use bp_engine::ProtectionEngine;

// ── Helpers ─────────────────────────────────────────────────────────

fn ramped_engine() -> (ProtectionEngine, BatterySnapshot) {
    let mut engine = ProtectionEngine::new(&ProtectionConfig::reference()).unwrap();
    let snapshot = BatterySnapshot {
        charge_max_current: 80,
        discharge_max_current: 80,
        min_cell_voltage: 3300.0,
        max_cell_voltage: 3300.0,
        min_cell_temperature: 20.0,
        max_cell_temperature: 25.0,
        start_stop: StartStop::Start,
    };
    engine.apply_elapsed(&snapshot, 0.0);
    let limits = engine.apply_elapsed(&snapshot, 600.0);
    assert_eq!(limits.charge_max_current, 80);
    assert_eq!(limits.discharge_max_current, 80);
    (engine, snapshot)
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn force_charge_full_cycle() {
    let (mut engine, mut s) = ramped_engine();

    s.min_cell_voltage = 2850.0;
    let limits = engine.apply_elapsed(&s, 1.0);
    assert_eq!(limits.discharge_max_current, 0);
    assert_eq!(engine.discharge().force_state(), ForceState::AwaitConfirm);

    let limits = engine.apply_elapsed(&s, 60.0);
    assert_eq!(limits.discharge_max_current, -1);
    assert!(limits.is_force_charge());
    assert!(!limits.is_force_discharge());

    s.min_cell_voltage = 2910.0;
    assert_eq!(engine.apply_elapsed(&s, 1.0).discharge_max_current, -1);

    s.min_cell_voltage = 2911.0;
    assert_eq!(engine.apply_elapsed(&s, 1.0).discharge_max_current, 0);
    assert_eq!(engine.discharge().force_state(), ForceState::Blocked);

    s.min_cell_voltage = 3000.0;
    assert_eq!(engine.apply_elapsed(&s, 1.0).discharge_max_current, 0);

    s.min_cell_voltage = 3001.0;
    assert_eq!(engine.apply_elapsed(&s, 1.0).discharge_max_current, 1);
    assert_eq!(engine.discharge().force_state(), ForceState::Normal);

    // The charge side kept its limit throughout.
    assert_eq!(engine.limits().charge_max_current, 80);
    assert_eq!(engine.charge().force_state(), ForceState::Normal);
}

#[test]
fn recovery_before_confirm_never_forces() {
    let (mut engine, mut s) = ramped_engine();

    s.max_cell_voltage = 3665.0;
    for _ in 0..59 {
        assert_eq!(engine.apply_elapsed(&s, 1.0).charge_max_current, 0);
    }
    assert_eq!(engine.charge().force_state(), ForceState::AwaitConfirm);

    // One dip below start restarts the confirm window.
    s.max_cell_voltage = 3655.0;
    engine.apply_elapsed(&s, 1.0);
    assert_eq!(engine.charge().force_state(), ForceState::Normal);

    s.max_cell_voltage = 3665.0;
    for _ in 0..30 {
        assert_eq!(engine.apply_elapsed(&s, 1.0).charge_max_current, 0);
    }
    assert_eq!(engine.charge().force_state(), ForceState::AwaitConfirm);
}

#[test]
fn confirm_window_counts_from_first_breach_cycle() {
    let (mut engine, mut s) = ramped_engine();

    s.max_cell_voltage = 3660.0;
    engine.apply_elapsed(&s, 30.0);
    // Time before the breach was seen does not count.
    assert_eq!(engine.apply_elapsed(&s, 59.0).charge_max_current, 0);
    assert_eq!(engine.apply_elapsed(&s, 1.0).charge_max_current, -1);
}

#[test]
fn both_directions_can_force_at_once() {
    let (mut engine, mut s) = ramped_engine();

    s.max_cell_voltage = 3700.0;
    s.min_cell_voltage = 2800.0;
    engine.apply_elapsed(&s, 1.0);
    let limits = engine.apply_elapsed(&s, 60.0);
    assert!(limits.is_force_discharge());
    assert!(limits.is_force_charge());
}
