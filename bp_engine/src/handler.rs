//! Current-limit handler.
//!
//! One handler per direction. Each cycle:
//!
//! 1. Raise the sticky "maximum ever advertised" current if the hardware now
//!    advertises more.
//! 2. Derate it by the voltage curve at the polarity's cell-voltage extreme and
//!    by the lower of the temperature curve at both temperature extremes.
//! 3. Cap the result at the instantaneous advertised limit.
//! 4. Ramp toward it through the rate limiter.
//! 5. Let the force override replace the ramp state if engaged.
//!
//! The ramp runs every cycle, so once the override releases, ramping resumes
//! from the last forced value.

use bp_common::protection::config::HandlerConfig;
use bp_common::protection::force::{ForceState, Polarity};
use bp_common::protection::snapshot::BatterySnapshot;
use serde::Serialize;
use tracing::{debug, info};

use crate::curve::Curve;
use crate::error::ProtectionError;
use crate::force::ForceOverride;
use crate::ramp::RateLimitedTarget;

/// Per-cycle inputs of one handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlerInput {
    /// Manufacturer-advertised ceiling for this direction [A].
    pub advertised_limit: i32,
    /// Cell voltage extreme for this direction [mV].
    pub cell_voltage: f64,
    /// Lowest cell temperature [°C].
    pub min_cell_temperature: f64,
    /// Highest cell temperature [°C].
    pub max_cell_temperature: f64,
}

impl HandlerInput {
    /// Select the inputs relevant to `polarity` from a snapshot.
    pub fn from_snapshot(polarity: Polarity, snapshot: &BatterySnapshot) -> Self {
        Self {
            advertised_limit: polarity.advertised_limit(snapshot),
            cell_voltage: polarity.cell_voltage(snapshot),
            min_cell_temperature: snapshot.min_cell_temperature,
            max_cell_temperature: snapshot.max_cell_temperature,
        }
    }
}

/// How the last published limit came about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitBreakdown {
    pub polarity: Polarity,
    /// Advertised ceiling this cycle [A].
    pub advertised_limit: i32,
    /// Sticky maximum after this cycle [A].
    pub max_ever_current: f64,
    pub voltage_percent: f64,
    pub temperature_percent: f64,
    /// Curve-implied target before rate limiting [A].
    pub target: f64,
    /// Rate limiter state after ramp and override [A].
    pub ramp_state: f64,
    pub force_state: ForceState,
    /// Published limit [A].
    pub published: i32,
}

impl LimitBreakdown {
    fn initial(polarity: Polarity, max_ever_current: f64) -> Self {
        Self {
            polarity,
            advertised_limit: 0,
            max_ever_current,
            voltage_percent: 0.0,
            temperature_percent: 0.0,
            target: 0.0,
            ramp_state: 0.0,
            force_state: ForceState::Normal,
            published: 0,
        }
    }
}

/// Produces one published current limit per cycle for one direction.
#[derive(Debug, Clone)]
pub struct CurrentLimitHandler {
    polarity: Polarity,
    voltage_to_percent: Curve,
    temperature_to_percent: Curve,
    /// Never decreases.
    max_ever_current: f64,
    ramp: RateLimitedTarget,
    force: ForceOverride,
    last: LimitBreakdown,
}

impl CurrentLimitHandler {
    /// Build a handler from its configuration.
    pub fn new(
        polarity: Polarity,
        config: &HandlerConfig,
        force_confirm_duration_s: f64,
    ) -> Result<Self, ProtectionError> {
        let voltage_to_percent =
            Curve::from_config(&config.voltage_to_percent).map_err(|source| {
                ProtectionError::Curve {
                    polarity,
                    curve: "voltage",
                    source,
                }
            })?;
        let temperature_to_percent = Curve::from_config(&config.temperature_to_percent)
            .map_err(|source| ProtectionError::Curve {
                polarity,
                curve: "temperature",
                source,
            })?;

        let rate = config.max_increase_per_second;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ProtectionError::InvalidRate { polarity, rate });
        }
        if config.initial_max_ever_current < 0 {
            return Err(ProtectionError::InvalidSeed {
                polarity,
                seed: config.initial_max_ever_current,
            });
        }

        let force = ForceOverride::new(polarity, config.force, force_confirm_duration_s)?;
        let max_ever_current = f64::from(config.initial_max_ever_current);

        Ok(Self {
            polarity,
            voltage_to_percent,
            temperature_to_percent,
            max_ever_current,
            ramp: RateLimitedTarget::new(rate),
            force,
            last: LimitBreakdown::initial(polarity, max_ever_current),
        })
    }

    /// Run one cycle from a full snapshot.
    #[inline]
    pub fn apply(&mut self, snapshot: &BatterySnapshot, elapsed_s: f64) -> i32 {
        self.apply_input(HandlerInput::from_snapshot(self.polarity, snapshot), elapsed_s)
    }

    /// Run one cycle and return the published limit.
    pub fn apply_input(&mut self, input: HandlerInput, elapsed_s: f64) -> i32 {
        let advertised = f64::from(input.advertised_limit);
        if advertised > self.max_ever_current {
            info!(
                polarity = %self.polarity,
                from = self.max_ever_current,
                to = advertised,
                "max ever current raised"
            );
            self.max_ever_current = advertised;
        }

        let voltage_percent = self.voltage_to_percent.evaluate(input.cell_voltage);
        let temperature_percent = self
            .temperature_to_percent
            .evaluate(input.min_cell_temperature)
            .min(
                self.temperature_to_percent
                    .evaluate(input.max_cell_temperature),
            );
        let target = advertised.min(self.max_ever_current * voltage_percent * temperature_percent);

        self.ramp.advance(target, elapsed_s);
        if let Some(value) = self.force.evaluate(input.cell_voltage, elapsed_s).value() {
            self.ramp.force_to(value);
        }
        let published = self.ramp.published();

        self.last = LimitBreakdown {
            polarity: self.polarity,
            advertised_limit: input.advertised_limit,
            max_ever_current: self.max_ever_current,
            voltage_percent,
            temperature_percent,
            target,
            ramp_state: self.ramp.state(),
            force_state: self.force.state(),
            published,
        };
        debug!(
            polarity = %self.polarity,
            advertised = input.advertised_limit,
            max_ever = self.max_ever_current,
            voltage_pct = voltage_percent,
            temperature_pct = temperature_percent,
            target_current = target,
            force = %self.force.state(),
            published,
            "limit computed"
        );

        published
    }

    #[inline]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Last published limit [A].
    #[inline]
    pub const fn published(&self) -> i32 {
        self.last.published
    }

    /// Sticky maximum ever advertised [A].
    #[inline]
    pub const fn max_ever_current(&self) -> f64 {
        self.max_ever_current
    }

    #[inline]
    pub const fn force_state(&self) -> ForceState {
        self.force.state()
    }

    /// Breakdown of the last cycle.
    #[inline]
    pub const fn breakdown(&self) -> &LimitBreakdown {
        &self.last
    }
}
