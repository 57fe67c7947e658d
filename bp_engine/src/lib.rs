//! # Battery Protection Engine
//!
//! Computes, once per control cycle, the maximum safe charge and discharge
//! current of a battery. Several independent constraints are folded into the
//! two published limits:
//!
//! 1. **Manufacturer limit**: the advertised ceiling, plus a sticky maximum
//!    of everything ever advertised as the derating basis.
//! 2. **Voltage / temperature curves**: piecewise-linear derating fractions.
//! 3. **Rate limit**: increases ramp at a fixed A/s, decreases are immediate.
//! 4. **Force override**: a sustained over/under-voltage forces power the
//!    other way, then blocks, before normal computation resumes.
//!
//! ## Determinism
//!
//! Time is injected by the caller. The engine is a pure function of its prior
//! state, the measurement snapshot and the elapsed time; the same trace always
//! yields the same limits. The cycle path performs no heap allocation.

pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod force;
pub mod handler;
pub mod ramp;
pub mod replay;
pub mod weighting;

pub use engine::ProtectionEngine;
pub use error::ProtectionError;
