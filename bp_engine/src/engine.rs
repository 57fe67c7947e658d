//! Protection engine: one charge and one discharge handler per battery.
//!
//! The external scheduler calls [`ProtectionEngine::apply`] once per control
//! cycle with the latest snapshot and a monotonic timestamp. Elapsed time is
//! derived from the previous call; the first call sees zero elapsed time.
//! Everything happens inside that call, so no partial update is ever
//! observable, and replaying a recorded trace from a fresh engine reproduces
//! the same outputs.

use std::time::Duration;

use bp_common::protection::config::ProtectionConfig;
use bp_common::protection::force::Polarity;
use bp_common::protection::snapshot::{BatterySnapshot, ProtectionLimits};

use crate::error::ProtectionError;
use crate::handler::{CurrentLimitHandler, LimitBreakdown};

// ─── Cycle Clock ────────────────────────────────────────────────────

/// Elapsed-time bookkeeping between cycles.
#[derive(Debug, Clone, Default)]
pub struct CycleClock {
    /// Timestamp of the latest cycle.
    last: Option<Duration>,
    /// Total cycles executed.
    cycle_count: u64,
}

impl CycleClock {
    pub const fn new() -> Self {
        Self {
            last: None,
            cycle_count: 0,
        }
    }

    /// Seconds since the previous tick (0 on the first tick).
    ///
    /// A timestamp older than the previous one yields 0 and does not move the
    /// clock backwards.
    pub fn tick(&mut self, now: Duration) -> f64 {
        self.cycle_count += 1;
        match self.last {
            None => {
                self.last = Some(now);
                0.0
            }
            Some(prev) => match now.checked_sub(prev) {
                Some(elapsed) => {
                    self.last = Some(now);
                    elapsed.as_secs_f64()
                }
                None => 0.0,
            },
        }
    }

    /// Count a cycle whose elapsed time was supplied by the caller.
    ///
    /// Moves the last timestamp forward by `elapsed_s` so a following
    /// [`tick`](Self::tick) does not count the same interval again.
    /// Before the first tick there is no timestamp to move.
    pub fn advance(&mut self, elapsed_s: f64) {
        self.cycle_count += 1;
        let step = Duration::try_from_secs_f64(elapsed_s.max(0.0));
        if let (Some(prev), Ok(step)) = (self.last, step) {
            self.last = Some(prev.saturating_add(step));
        }
    }

    #[inline]
    pub const fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    #[inline]
    pub const fn last(&self) -> Option<Duration> {
        self.last
    }
}

// ─── Engine ─────────────────────────────────────────────────────────

/// Owns both current-limit handlers of a single battery.
///
/// `apply` takes `&mut self`: one logical owner drives the engine.
#[derive(Debug, Clone)]
pub struct ProtectionEngine {
    charge: CurrentLimitHandler,
    discharge: CurrentLimitHandler,
    clock: CycleClock,
    limits: ProtectionLimits,
}

impl ProtectionEngine {
    /// Build an engine; fails on any invalid curve, threshold or rate.
    pub fn new(config: &ProtectionConfig) -> Result<Self, ProtectionError> {
        Ok(Self {
            charge: CurrentLimitHandler::new(
                Polarity::Charge,
                &config.charge,
                config.force_confirm_duration_s,
            )?,
            discharge: CurrentLimitHandler::new(
                Polarity::Discharge,
                &config.discharge,
                config.force_confirm_duration_s,
            )?,
            clock: CycleClock::new(),
            limits: ProtectionLimits::default(),
        })
    }

    /// Run one cycle at monotonic time `now`.
    pub fn apply(&mut self, snapshot: &BatterySnapshot, now: Duration) -> ProtectionLimits {
        let elapsed_s = self.clock.tick(now);
        self.run_handlers(snapshot, elapsed_s)
    }

    /// Run one cycle with an explicit elapsed time.
    ///
    /// The clock advances by the same amount, so `apply` and `apply_elapsed`
    /// may be mixed.
    pub fn apply_elapsed(&mut self, snapshot: &BatterySnapshot, elapsed_s: f64) -> ProtectionLimits {
        self.clock.advance(elapsed_s);
        self.run_handlers(snapshot, elapsed_s)
    }

    fn run_handlers(&mut self, snapshot: &BatterySnapshot, elapsed_s: f64) -> ProtectionLimits {
        self.limits = ProtectionLimits {
            charge_max_current: self.charge.apply(snapshot, elapsed_s),
            discharge_max_current: self.discharge.apply(snapshot, elapsed_s),
        };
        self.limits
    }

    /// Limits published by the last cycle.
    #[inline]
    pub const fn limits(&self) -> ProtectionLimits {
        self.limits
    }

    #[inline]
    pub const fn charge(&self) -> &CurrentLimitHandler {
        &self.charge
    }

    #[inline]
    pub const fn discharge(&self) -> &CurrentLimitHandler {
        &self.discharge
    }

    #[inline]
    pub const fn clock(&self) -> &CycleClock {
        &self.clock
    }

    /// Breakdown of the last cycle: `(charge, discharge)`.
    #[inline]
    pub const fn breakdown(&self) -> (&LimitBreakdown, &LimitBreakdown) {
        (self.charge.breakdown(), self.discharge.breakdown())
    }
}
