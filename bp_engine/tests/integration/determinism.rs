//! Integration test: replay determinism and output bounds.
//!
//! Two fresh engines fed the same arbitrary sequence must publish identical
//! limits, and every published limit stays within `[-1, advertised]`.

use std::time::Duration;

use bp_common::protection::config::ProtectionConfig;
use bp_common::protection::snapshot::{BatterySnapshot, StartStop};
use bp_engine::ProtectionEngine;
use proptest::prelude::*;

fn cycle() -> impl Strategy<Value = (u64, BatterySnapshot)> {
    (
        0u64..120_000,
        0i32..120,
        0i32..120,
        2700.0f64..3200.0,
        3200.0f64..3750.0,
        -20.0f64..30.0,
        30.0f64..60.0,
    )
        .prop_map(|(ms, charge, discharge, v_min, v_max, t_min, t_max)| {
            (
                ms,
                BatterySnapshot {
                    charge_max_current: charge,
                    discharge_max_current: discharge,
                    min_cell_voltage: v_min,
                    max_cell_voltage: v_max,
                    min_cell_temperature: t_min,
                    max_cell_temperature: t_max,
                    start_stop: StartStop::Start,
                },
            )
        })
}

proptest! {
    #[test]
    fn identical_traces_give_identical_limits(trace in prop::collection::vec(cycle(), 1..60)) {
        let config = ProtectionConfig::reference();
        let mut a = ProtectionEngine::new(&config).unwrap();
        let mut b = ProtectionEngine::new(&config).unwrap();

        let mut now = Duration::ZERO;
        for (ms, snapshot) in &trace {
            now += Duration::from_millis(*ms);
            prop_assert_eq!(a.apply(snapshot, now), b.apply(snapshot, now));
            prop_assert_eq!(a.breakdown(), b.breakdown());
        }
    }

    #[test]
    fn published_limits_stay_in_range(trace in prop::collection::vec(cycle(), 1..60)) {
        let mut engine = ProtectionEngine::new(&ProtectionConfig::reference()).unwrap();

        let mut now = Duration::ZERO;
        for (ms, snapshot) in &trace {
            now += Duration::from_millis(*ms);
            let limits = engine.apply(snapshot, now);
            prop_assert!(limits.charge_max_current >= -1);
            prop_assert!(limits.charge_max_current <= snapshot.charge_max_current.max(0));
            prop_assert!(limits.discharge_max_current >= -1);
            prop_assert!(limits.discharge_max_current <= snapshot.discharge_max_current.max(0));
        }
    }
}
