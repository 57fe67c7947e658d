//! Piecewise-linear derating curve.
//!
//! Maps a measurement (cell voltage or temperature) to a derating fraction.
//! Keypoints are sorted by `x` at construction; of several keypoints at the
//! same `x`, the one given last wins. Evaluation interpolates
//! linearly between neighbours and extrapolates flat beyond both ends, so
//! every finite input has a value.
//!
//! Sharp thresholds are two keypoints one `f64` step apart; see
//! [`CurvePoint::just_below`] and [`CurvePoint::just_above`].

use bp_common::consts::MAX_CURVE_POINTS;
use bp_common::protection::curve::{CurveConfig, CurvePoint};
use thiserror::Error;

/// Curve construction error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// Fewer than two distinct `x` values.
    #[error("curve needs at least 2 points, got {count}")]
    TooFewPoints { count: usize },
    /// More keypoints than the fixed storage holds.
    #[error("curve holds at most {max} points")]
    TooManyPoints { max: usize },
    /// A keypoint coordinate is NaN or infinite.
    #[error("curve point {index} is not finite")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Keypoint {
    x: f64,
    y: f64,
}

/// Immutable piecewise-linear function with flat extrapolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: heapless::Vec<Keypoint, MAX_CURVE_POINTS>,
}

impl Curve {
    /// Build a curve from keypoints given in any order.
    pub fn new(points: &[CurvePoint]) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints {
                count: points.len(),
            });
        }

        let mut sorted = heapless::Vec::<Keypoint, MAX_CURVE_POINTS>::new();
        for (index, p) in points.iter().enumerate() {
            let x = p.position();
            if !x.is_finite() || !p.y.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            sorted
                .push(Keypoint { x, y: p.y })
                .map_err(|_| CurveError::TooManyPoints {
                    max: MAX_CURVE_POINTS,
                })?;
        }
        // Stable: equal abscissas keep their insertion order.
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        // One y per x; a later keypoint replaces an earlier one.
        let mut points = heapless::Vec::<Keypoint, MAX_CURVE_POINTS>::new();
        for p in sorted {
            let n = points.len();
            if n > 0 && points[n - 1].x == p.x {
                points[n - 1] = p;
            } else {
                points.push(p).map_err(|_| CurveError::TooManyPoints {
                    max: MAX_CURVE_POINTS,
                })?;
            }
        }
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints {
                count: points.len(),
            });
        }

        Ok(Self { points })
    }

    /// Build a curve from its configuration.
    #[inline]
    pub fn from_config(config: &CurveConfig) -> Result<Self, CurveError> {
        Self::new(&config.points)
    }

    /// Evaluate the curve at `x`.
    ///
    /// NaN yields the smallest `y` of the curve.
    pub fn evaluate(&self, x: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if x.is_nan() {
            return self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        }
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // first.x < x < last.x, so 1 <= idx < len and lo.x <= x < hi.x.
        let idx = self.points.partition_point(|p| p.x <= x);
        let lo = self.points[idx - 1];
        let hi = self.points[idx];
        if x == lo.x {
            return lo.y;
        }
        lo.y + (x - lo.x) * (hi.y - lo.y) / (hi.x - lo.x)
    }

    /// Keypoints as `(x, y)` in ascending `x`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y))
    }

    /// Number of keypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a curve has at least two keypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
