//! Hysteretic force override.
//!
//! ```text
//! Normal ──breach(start)──▶ AwaitConfirm ──breach(start) for confirm time──▶ Forcing
//!   ▲                            │                                            │
//!   │◀──────────clear(start)─────┘                                   clear(hold)
//!   │                                                                         ▼
//!   └──────────────────────────clear(block)───────────────────────────── Blocked
//! ```
//!
//! `breach` is inclusive (see [`Polarity::breaches`]). While `Forcing` the
//! owner publishes [`FORCE_SENTINEL_CURRENT`]; while `Blocked` it publishes 0.
//! The dwell timer only runs in `AwaitConfirm` and is reset on leaving it.

use bp_common::consts::FORCE_SENTINEL_CURRENT;
use bp_common::protection::force::{ForceParams, ForceState, Polarity};
use thiserror::Error;
use tracing::{info, warn};

/// Force-override construction error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForceError {
    /// Thresholds are not strictly ordered for the polarity.
    #[error(
        "{polarity} force thresholds out of order: start={start}, hold={hold}, block={block}"
    )]
    ThresholdOrder {
        polarity: Polarity,
        start: f64,
        hold: f64,
        block: f64,
    },
    /// Confirm duration is negative or not finite.
    #[error("force confirm duration must be finite and >= 0, got {0}")]
    InvalidConfirmDuration(f64),
}

/// What the owner must do with its limit this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceAction {
    /// Normal computation applies.
    None,
    /// Publish the "move power the other way" sentinel.
    Force,
    /// Publish zero.
    Block,
}

impl ForceAction {
    /// Value to write into the rate limiter, if any.
    #[inline]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Force => Some(FORCE_SENTINEL_CURRENT as f64),
            Self::Block => Some(0.0),
        }
    }
}

/// Three-threshold override automaton with a confirm dwell.
#[derive(Debug, Clone)]
pub struct ForceOverride {
    polarity: Polarity,
    params: ForceParams,
    /// Breach time required before forcing [s].
    confirm_duration_s: f64,
    state: ForceState,
    /// Time spent in `AwaitConfirm` so far [s].
    dwell_s: f64,
}

impl ForceOverride {
    /// Create an override in `Normal`.
    pub fn new(
        polarity: Polarity,
        params: ForceParams,
        confirm_duration_s: f64,
    ) -> Result<Self, ForceError> {
        if !polarity.is_ordered(&params) {
            return Err(ForceError::ThresholdOrder {
                polarity,
                start: params.start,
                hold: params.hold,
                block: params.block,
            });
        }
        if !confirm_duration_s.is_finite() || confirm_duration_s < 0.0 {
            return Err(ForceError::InvalidConfirmDuration(confirm_duration_s));
        }
        Ok(Self {
            polarity,
            params,
            confirm_duration_s,
            state: ForceState::Normal,
            dwell_s: 0.0,
        })
    }

    /// Current automaton state.
    #[inline]
    pub const fn state(&self) -> ForceState {
        self.state
    }

    /// Time accumulated in `AwaitConfirm` [s].
    #[inline]
    pub const fn dwell(&self) -> f64 {
        self.dwell_s
    }

    #[inline]
    pub const fn params(&self) -> &ForceParams {
        &self.params
    }

    /// Feed one cycle's extreme cell voltage.
    pub fn evaluate(&mut self, voltage: f64, elapsed_s: f64) -> ForceAction {
        let p = self.polarity;
        let next = match self.state {
            ForceState::Normal if p.breaches(voltage, self.params.start) => {
                ForceState::AwaitConfirm
            }
            ForceState::Normal => ForceState::Normal,
            ForceState::AwaitConfirm if !p.breaches(voltage, self.params.start) => {
                ForceState::Normal
            }
            ForceState::AwaitConfirm => {
                self.dwell_s += elapsed_s.max(0.0);
                if self.dwell_s >= self.confirm_duration_s {
                    ForceState::Forcing
                } else {
                    ForceState::AwaitConfirm
                }
            }
            ForceState::Forcing if p.breaches(voltage, self.params.hold) => ForceState::Forcing,
            ForceState::Forcing => ForceState::Blocked,
            ForceState::Blocked if p.breaches(voltage, self.params.block) => ForceState::Blocked,
            ForceState::Blocked => ForceState::Normal,
        };

        if next != self.state {
            self.transition(next, voltage);
        }

        match self.state {
            ForceState::Forcing => ForceAction::Force,
            ForceState::Blocked => ForceAction::Block,
            ForceState::Normal | ForceState::AwaitConfirm => ForceAction::None,
        }
    }

    fn transition(&mut self, next: ForceState, voltage: f64) {
        if next == ForceState::Forcing {
            warn!(
                polarity = %self.polarity,
                voltage,
                dwell_s = self.dwell_s,
                "{} engaged",
                self.polarity.directive()
            );
        } else {
            info!(
                polarity = %self.polarity,
                from = %self.state,
                to = %next,
                voltage,
                "force override transition"
            );
        }
        if self.state == ForceState::AwaitConfirm || next == ForceState::AwaitConfirm {
            self.dwell_s = 0.0;
        }
        self.state = next;
    }
}
