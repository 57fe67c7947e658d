//! Integration test: configuration files and trace replay.
//!
//! Loads the shipped sample configuration, replays the shipped reference
//! trace and checks file-level validation errors.

use std::io::Write;
use std::path::PathBuf;

use bp_common::config::{ConfigError, ConfigLoader, LogLevel};
use bp_common::protection::config::ProtectionConfig;
use bp_engine::config::load_config;
use bp_engine::replay::{Trace, replay};
use tempfile::NamedTempFile;

// ── Helpers ─────────────────────────────────────────────────────────

fn sample(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config").join(path)
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn sample_config_matches_reference() {
    let file = load_config(&sample("protection.toml")).unwrap();
    assert_eq!(file.shared.battery_id, "battery0");
    assert_eq!(file.shared.log_level, LogLevel::Info);
    assert_eq!(file.protection, ProtectionConfig::reference());
}

#[test]
fn reference_trace_meets_every_expectation() {
    let file = load_config(&sample("protection.toml")).unwrap();
    let trace = Trace::load(&sample("traces/reference.toml")).unwrap();
    let mut engine = file.build_engine().unwrap();

    let records = replay(&mut engine, &trace).unwrap();
    assert_eq!(records.len(), 17);
    for record in &records {
        assert_eq!(
            record.expectation_met,
            Some(true),
            "cycle {} ({:?}): {:?}",
            record.cycle,
            record.label,
            record.limits
        );
    }

    let last = records.last().unwrap();
    assert_eq!(last.limits.charge_max_current, 2);
    assert_eq!(last.limits.discharge_max_current, 80);
}

#[test]
fn replay_record_serializes_as_json_line() {
    let file = load_config(&sample("protection.toml")).unwrap();
    let trace = Trace::load(&sample("traces/reference.toml")).unwrap();
    let records = replay(&mut file.build_engine().unwrap(), &trace).unwrap();

    let line = serde_json::to_string(&records[10]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["limits"]["charge_max_current"], -1);
    assert_eq!(value["charge_force"], "forcing");
    assert_eq!(value["label"], "force-discharge: engaged");
    assert!(!line.contains('\n'));
}

#[test]
fn missing_file_is_reported() {
    let err = load_config(&sample("does-not-exist.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn invalid_curve_in_file_is_rejected() {
    let file = write_temp(
        r#"
[shared]
battery_id = "battery0"

[protection.charge]
force = { start = 3660.0, hold = 3640.0, block = 3450.0 }
voltage_to_percent = [{ x = 3000.0, y = 1.0 }, { x = nan, y = 0.0 }]
temperature_to_percent = [{ x = 0.0, y = 1.0 }, { x = 50.0, y = 1.0 }]

[protection.discharge]
force = { start = 2850.0, hold = 2910.0, block = 3000.0 }
voltage_to_percent = [{ x = 2900.0, y = 0.0 }, { x = 3000.0, y = 1.0 }]
temperature_to_percent = [{ x = 0.0, y = 1.0 }, { x = 50.0, y = 1.0 }]
"#,
    );
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("not finite")));
}

#[test]
fn unknown_trace_field_is_a_parse_error() {
    let trace = write_temp("[[cycle]]\nmax_cell_voltge = 3300.0\n");
    assert!(matches!(
        Trace::load(trace.path()),
        Err(ConfigError::ParseError(_))
    ));
}
