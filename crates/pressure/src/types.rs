use serde::{Deserialize, Serialize};
use stylus_config::FitMode;

use crate::validation::{validate_points, CurveError};

/// One pressure + position + time reading taken during a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Pressure in [0, 1]
    pub pressure: f64,
    /// Position in device/widget pixels
    pub x: f64,
    pub y: f64,
    /// Device clock timestamp in milliseconds
    pub timestamp_ms: u64,
}

/// Whether a fitted curve targets the active brush or every brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyScope {
    /// Store the curve for the active brush only
    #[default]
    CurrentBrushOnly,
    /// Drop every per-brush curve and make this the global default
    AllBrushes,
}

/// A single control point of a pressure curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Raw input pressure
    pub x: f64,
    /// Output pressure
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pressure response curve as ordered control points
///
/// Control points always satisfy: at least two points, strictly increasing
/// x, first x = 0, last x = 1, every y within [0, 1]. The host's curve
/// evaluator interpolates between points; [`Curve::evaluate`] offers a
/// piecewise linear preview.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<CurvePoint>,
    /// Fit policy that authored this curve (None for identity/imported)
    mode: Option<FitMode>,
}

impl Default for Curve {
    fn default() -> Self {
        Self::identity()
    }
}

impl Curve {
    /// Linear 1:1 response
    pub fn identity() -> Self {
        Self {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
            mode: None,
        }
    }

    /// Build a curve from control points, checking every invariant
    pub fn from_points(points: Vec<CurvePoint>, mode: Option<FitMode>) -> Result<Self, CurveError> {
        validate_points(&points)?;
        Ok(Self { points, mode })
    }

    /// Build a curve from `[x, y]` pairs
    pub fn from_pairs(pairs: &[[f64; 2]], mode: Option<FitMode>) -> Result<Self, CurveError> {
        let points = pairs.iter().map(|p| CurvePoint::new(p[0], p[1])).collect();
        Self::from_points(points, mode)
    }

    /// Curve emitted by the fitter. Points are generated on `i / n` with
    /// clamped outputs, so they already satisfy the invariants.
    pub(crate) fn fitted(points: Vec<CurvePoint>, mode: FitMode) -> Self {
        debug_assert!(validate_points(&points).is_ok());
        Self {
            points,
            mode: Some(mode),
        }
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn mode(&self) -> Option<FitMode> {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Control points as `[x, y]` pairs
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.x, p.y]).collect()
    }

    /// True when every point lies on `y = x`
    pub fn is_identity(&self) -> bool {
        self.points.iter().all(|p| (p.x - p.y).abs() < 1e-9)
    }

    /// Piecewise linear evaluation at `x` (clamped to [0, 1])
    pub fn evaluate(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };

        for window in self.points.windows(2) {
            let (a, b) = (window[0], window[1]);
            if x >= a.x && x <= b.x {
                let t = (x - a.x) / (b.x - a.x);
                return a.y + t * (b.y - a.y);
            }
        }

        // Unreachable for valid curves (x spans [0, 1])
        self.points.last().map(|p| p.y).unwrap_or(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_curve() {
        let curve = Curve::identity();
        assert_eq!(curve.len(), 2);
        assert!(curve.is_identity());
        assert_eq!(curve.mode(), None);
        assert_eq!(curve.to_pairs(), vec![[0.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_evaluate_interpolates() {
        let curve =
            Curve::from_pairs(&[[0.0, 0.0], [0.5, 0.25], [1.0, 1.0]], Some(FitMode::PowerLaw))
                .unwrap();

        assert!((curve.evaluate(0.0) - 0.0).abs() < 1e-12);
        assert!((curve.evaluate(0.25) - 0.125).abs() < 1e-12);
        assert!((curve.evaluate(0.5) - 0.25).abs() < 1e-12);
        assert!((curve.evaluate(0.75) - 0.625).abs() < 1e-12);
        assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-12);
        // Out of range input is clamped
        assert!((curve.evaluate(2.0) - 1.0).abs() < 1e-12);
        assert!((curve.evaluate(-1.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_points_rejects_invalid() {
        assert!(Curve::from_pairs(&[[0.0, 0.0]], None).is_err());
        assert!(Curve::from_pairs(&[[0.1, 0.0], [1.0, 1.0]], None).is_err());
        assert!(Curve::from_pairs(&[[0.0, 0.0], [0.5, 0.5], [0.5, 0.6], [1.0, 1.0]], None).is_err());
        assert!(Curve::from_pairs(&[[0.0, 0.0], [1.0, 1.5]], None).is_err());
    }

    #[test]
    fn test_default_scope_is_current_brush() {
        assert_eq!(ApplyScope::default(), ApplyScope::CurrentBrushOnly);
    }
}
