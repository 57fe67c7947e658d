//! Engine construction errors.
//!
//! Every failure is detected when an engine is built from configuration;
//! a built engine never fails at runtime.

use bp_common::protection::force::Polarity;
use thiserror::Error;

use crate::curve::CurveError;
use crate::force::ForceError;

/// Error building a handler or an engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtectionError {
    /// Invalid voltage or temperature curve.
    #[error("{polarity} {curve} curve: {source}")]
    Curve {
        polarity: Polarity,
        curve: &'static str,
        #[source]
        source: CurveError,
    },

    /// Invalid force-override parameters.
    #[error(transparent)]
    Force(#[from] ForceError),

    /// Ramp-up rate not finite and positive.
    #[error("{polarity} max increase per second must be finite and > 0, got {rate}")]
    InvalidRate { polarity: Polarity, rate: f64 },

    /// Negative sticky-maximum seed.
    #[error("{polarity} initial max ever current must be >= 0, got {seed}")]
    InvalidSeed { polarity: Polarity, seed: i32 },
}
