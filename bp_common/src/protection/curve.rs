//! Derating curve keypoints.
//!
//! A curve is configured as a list of `(x, y)` keypoints in any order. Sharp
//! thresholds are written as two keypoints a single floating-point step apart;
//! [`StepSide`] lets a configuration file say "just below x" or "just above x"
//! without spelling out the neighbouring `f64`.

use serde::{Deserialize, Serialize};

/// Which neighbour of `x` a keypoint actually sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepSide {
    /// Next representable value below `x`.
    Before,
    /// Next representable value above `x`.
    After,
}

/// A single keypoint of a derating curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Measurement (cell voltage [mV] or cell temperature [°C]).
    pub x: f64,
    /// Derating fraction, normally within `[0, 1]`.
    pub y: f64,
    /// Shift `x` by one ULP to build a near-discontinuity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<StepSide>,
}

impl CurvePoint {
    /// Keypoint exactly at `x`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, step: None }
    }

    /// Keypoint at the largest `f64` strictly below `x`.
    pub const fn just_below(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            step: Some(StepSide::Before),
        }
    }

    /// Keypoint at the smallest `f64` strictly above `x`.
    pub const fn just_above(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            step: Some(StepSide::After),
        }
    }

    /// Effective abscissa after applying the step shift.
    #[inline]
    pub fn position(&self) -> f64 {
        match self.step {
            None => self.x,
            Some(StepSide::Before) => self.x.next_down(),
            Some(StepSide::After) => self.x.next_up(),
        }
    }
}

/// Keypoint list of one derating curve, as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveConfig {
    pub points: Vec<CurvePoint>,
}

impl CurveConfig {
    /// Empty curve configuration.
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append a keypoint exactly at `x`.
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push(CurvePoint::new(x, y));
        self
    }

    /// Append a keypoint one step below `x`.
    pub fn point_below(mut self, x: f64, y: f64) -> Self {
        self.points.push(CurvePoint::just_below(x, y));
        self
    }

    /// Append a keypoint one step above `x`.
    pub fn point_above(mut self, x: f64, y: f64) -> Self {
        self.points.push(CurvePoint::just_above(x, y));
        self
    }

    /// Number of configured keypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no keypoint is configured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
