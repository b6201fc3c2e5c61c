use crate::constants::DEFAULT_PRESSURE;
use crate::types::CurvePoint;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("Curve needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("Curve must span x=0..1, got {first}..{last}")]
    NotAnchored { first: f64, last: f64 },
    #[error("Curve x values must strictly increase (point {index})")]
    NotIncreasing { index: usize },
    #[error("Curve point {index} out of range: ({x}, {y})")]
    OutOfRange { index: usize, x: f64, y: f64 },
}

/// Check a control point sequence against the curve invariants
pub fn validate_points(points: &[CurvePoint]) -> Result<(), CurveError> {
    if points.len() < 2 {
        return Err(CurveError::TooFewPoints(points.len()));
    }

    for (index, p) in points.iter().enumerate() {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_range(p.x) || !in_range(p.y) {
            return Err(CurveError::OutOfRange {
                index,
                x: p.x,
                y: p.y,
            });
        }
    }

    let first = points[0].x;
    let last = points[points.len() - 1].x;
    if first != 0.0 || last != 1.0 {
        return Err(CurveError::NotAnchored { first, last });
    }

    for (index, pair) in points.windows(2).enumerate() {
        if pair[1].x <= pair[0].x {
            return Err(CurveError::NotIncreasing { index: index + 1 });
        }
    }

    Ok(())
}

/// Clamp a value into [0, 1]; NaN maps to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Normalize a device pressure reading.
///
/// Devices without a pressure axis report `None`, which is recorded as
/// [`DEFAULT_PRESSURE`]. NaN readings are treated the same way.
pub fn clamp_pressure(pressure: Option<f64>) -> f64 {
    match pressure {
        Some(p) if !p.is_nan() => p.clamp(0.0, 1.0),
        _ => DEFAULT_PRESSURE,
    }
}
