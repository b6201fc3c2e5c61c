//! Curve fitting
//!
//! Turns recorded pressure and velocity samples into a response curve.
//! Every fit policy emits points on an even grid `x_i = i / n`, so the
//! curve invariants hold by construction.

use stylus_config::{clamp_power, CalibrationConfig, FitMode, DEFAULT_CONTROL_SEGMENTS};
use tracing::debug;

use crate::constants::{
    MIN_CALIBRATION_SAMPLES, MIN_VELOCITY_STRENGTH, OUTLIER_SIGMA, SIGMOID_BASE_STEEPNESS,
    SIGMOID_MAX_STEEPNESS, SIGMOID_MIN_SPREAD, SIGMOID_MIN_STEEPNESS, VELOCITY_SCALE_WEIGHT,
};
use crate::error::CalibrationError;
use crate::stats::{reject_outliers, Statistics, VelocityStats};
use crate::types::{Curve, CurvePoint};
use crate::validation::clamp_unit;

/// Result of a successful fit
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub curve: Curve,
    pub mode: FitMode,
    /// Exponent after clamping
    pub exponent: f64,
    /// Output scale in [0.8, 1.0] derived from stroke speed
    pub velocity_strength: f64,
    pub pressure_stats: Statistics,
    pub velocity_stats: VelocityStats,
    /// Pressure samples dropped as outliers
    pub rejected_samples: usize,
}

/// Fits response curves under a configured policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFitter {
    mode: FitMode,
    segments: usize,
}

impl Default for CurveFitter {
    fn default() -> Self {
        Self::new(FitMode::default(), DEFAULT_CONTROL_SEGMENTS)
    }
}

impl CurveFitter {
    /// Create a fitter; `segments` below 1 is raised to 1
    pub fn new(mode: FitMode, segments: usize) -> Self {
        Self {
            mode,
            segments: segments.max(1),
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.fit_mode, config.control_segments)
    }

    pub fn mode(&self) -> FitMode {
        self.mode
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Fit a curve to raw samples
    ///
    /// Needs at least [`MIN_CALIBRATION_SAMPLES`] pressure samples. Outliers
    /// beyond three standard deviations are dropped from both sample sets
    /// before the statistics are taken.
    pub fn fit(
        &self,
        pressure: &[f64],
        velocity: &[f64],
        exponent: f64,
    ) -> Result<FitOutcome, CalibrationError> {
        if pressure.len() < MIN_CALIBRATION_SAMPLES {
            return Err(CalibrationError::InsufficientSamples {
                found: pressure.len(),
                required: MIN_CALIBRATION_SAMPLES,
            });
        }

        let kept_pressure = reject_outliers(pressure, OUTLIER_SIGMA);
        let kept_velocity = reject_outliers(velocity, OUTLIER_SIGMA);
        let rejected_samples = pressure.len() - kept_pressure.len();

        let pressure_stats = Statistics::describe(&kept_pressure).map_err(|_| {
            CalibrationError::InsufficientSamples {
                found: kept_pressure.len(),
                required: MIN_CALIBRATION_SAMPLES,
            }
        })?;
        let velocity_stats = VelocityStats::from_samples(&kept_velocity);

        let mut outcome = self.fit_with_stats(&pressure_stats, &velocity_stats, exponent);
        outcome.rejected_samples = rejected_samples;

        debug!(
            "CurveFitter::fit: mode={}, power={:.2}, strength={:.3}, samples={} (rejected {}), velocities={}",
            self.mode.as_str(),
            outcome.exponent,
            outcome.velocity_strength,
            pressure.len(),
            rejected_samples,
            velocity_stats.sample_count
        );

        Ok(outcome)
    }

    /// Fit a curve from precomputed statistics
    pub fn fit_with_stats(
        &self,
        pressure_stats: &Statistics,
        velocity_stats: &VelocityStats,
        exponent: f64,
    ) -> FitOutcome {
        let exponent = clamp_power(exponent);
        let strength = velocity_strength(velocity_stats);

        let shape: Box<dyn Fn(f64) -> f64> = match self.mode {
            FitMode::PowerLaw => Box::new(move |x| power_law(x, exponent, strength)),
            FitMode::RangeNormalize => {
                let stats = *pressure_stats;
                Box::new(move |x| range_normalize(x, &stats))
            }
            FitMode::SquaredNormalize => {
                let stats = *pressure_stats;
                Box::new(move |x| squared_normalize(x, &stats))
            }
            FitMode::Sigmoid => {
                let params = SigmoidParams::from_stats(pressure_stats, exponent, strength);
                Box::new(move |x| params.evaluate(x))
            }
        };

        let n = self.segments;
        let points = (0..=n)
            .map(|i| {
                let x = i as f64 / n as f64;
                CurvePoint::new(x, clamp_unit(shape(x)))
            })
            .collect();

        FitOutcome {
            curve: Curve::fitted(points, self.mode),
            mode: self.mode,
            exponent,
            velocity_strength: strength,
            pressure_stats: *pressure_stats,
            velocity_stats: *velocity_stats,
            rejected_samples: 0,
        }
    }
}

/// Output scale from stroke speed: faster strokes give thinner lines.
///
/// 1.0 when no velocity was recorded or the range is degenerate.
pub fn velocity_strength(stats: &VelocityStats) -> f64 {
    match stats.normalized_mean() {
        Some(norm) => (1.0 - VELOCITY_SCALE_WEIGHT * norm).clamp(MIN_VELOCITY_STRENGTH, 1.0),
        None => 1.0,
    }
}

pub fn power_law(x: f64, exponent: f64, strength: f64) -> f64 {
    clamp_unit(x.powf(exponent) * strength)
}

/// Position of `x` within the recorded pressure range; `x` itself when
/// the range is degenerate
fn normalized_position(x: f64, stats: &Statistics) -> f64 {
    let range = stats.range();
    if range <= 0.0 {
        return x;
    }
    clamp_unit((x - stats.min) / range)
}

pub fn range_normalize(x: f64, stats: &Statistics) -> f64 {
    normalized_position(x, stats)
}

pub fn squared_normalize(x: f64, stats: &Statistics) -> f64 {
    let t = normalized_position(x, stats);
    clamp_unit(t * t)
}

/// Logistic curve parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidParams {
    /// Midpoint (median pressure)
    pub center: f64,
    pub steepness: f64,
    /// Upper asymptote (velocity strength)
    pub ceiling: f64,
}

impl SigmoidParams {
    pub fn from_stats(stats: &Statistics, exponent: f64, strength: f64) -> Self {
        let range = stats.range();
        let spread = if range <= 0.0 {
            0.5
        } else if stats.iqr > 0.0 {
            stats.iqr / range
        } else {
            2.0 * stats.stddev / range
        };

        let steepness = (SIGMOID_BASE_STEEPNESS * exponent * 0.5 / spread.max(SIGMOID_MIN_SPREAD))
            .clamp(SIGMOID_MIN_STEEPNESS, SIGMOID_MAX_STEEPNESS);

        Self {
            center: stats.median,
            steepness,
            ceiling: strength,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        clamp_unit(self.ceiling / (1.0 + (-self.steepness * (x - self.center)).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn test_insufficient_samples() {
        let fitter = CurveFitter::default();
        let err = fitter.fit(&[0.5; 9], &[], 1.0).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::InsufficientSamples {
                found: 9,
                required: 10
            }
        );
    }

    #[test]
    fn test_power_law_identity() {
        let fitter = CurveFitter::new(FitMode::PowerLaw, 7);
        let outcome = fitter.fit(&ramp(20, 0.1, 0.9), &[], 1.0).unwrap();

        assert_eq!(outcome.velocity_strength, 1.0);
        assert_eq!(outcome.curve.len(), 8);
        for p in outcome.curve.points() {
            assert!((p.y - p.x).abs() < 1e-12, "point {:?}", p);
        }
    }

    #[test]
    fn test_power_law_exponent_and_strength() {
        let fitter = CurveFitter::new(FitMode::PowerLaw, 4);
        // Average velocity at the midpoint of the range: strength 0.9
        let velocity = [100.0, 200.0, 300.0];
        let outcome = fitter.fit(&ramp(12, 0.2, 0.8), &velocity, 2.0).unwrap();

        assert!((outcome.velocity_strength - 0.9).abs() < 1e-12);
        let pairs = outcome.curve.to_pairs();
        assert_eq!(pairs.len(), 5);
        assert!((pairs[2][1] - 0.25 * 0.9).abs() < 1e-12);
        assert!((pairs[4][1] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_exponent_is_clamped() {
        let fitter = CurveFitter::default();
        let samples = ramp(10, 0.0, 1.0);
        assert_eq!(fitter.fit(&samples, &[], 0.1).unwrap().exponent, 0.5);
        assert_eq!(fitter.fit(&samples, &[], 9.0).unwrap().exponent, 6.0);
    }

    #[test]
    fn test_velocity_strength_bounds() {
        assert_eq!(velocity_strength(&VelocityStats::default()), 1.0);

        let fast = VelocityStats {
            min: 0.0,
            max: 100.0,
            mean: 100.0,
            sample_count: 5,
        };
        assert!((velocity_strength(&fast) - 0.8).abs() < 1e-12);

        let flat = VelocityStats {
            min: 50.0,
            max: 50.0,
            mean: 50.0,
            sample_count: 5,
        };
        assert_eq!(velocity_strength(&flat), 1.0);
    }

    #[test]
    fn test_range_normalize() {
        let fitter = CurveFitter::new(FitMode::RangeNormalize, 4);
        let outcome = fitter.fit(&ramp(11, 0.25, 0.75), &[], 1.0).unwrap();
        let ys: Vec<f64> = outcome.curve.points().iter().map(|p| p.y).collect();
        assert_eq!(ys[0], 0.0);
        assert_eq!(ys[1], 0.0);
        assert!((ys[2] - 0.5).abs() < 1e-12);
        assert_eq!(ys[3], 1.0);
        assert_eq!(ys[4], 1.0);
    }

    #[test]
    fn test_range_normalize_degenerate_range() {
        let fitter = CurveFitter::new(FitMode::RangeNormalize, 7);
        let outcome = fitter.fit(&[0.6; 12], &[], 1.0).unwrap();
        assert!(outcome.curve.is_identity());

        let squared = CurveFitter::new(FitMode::SquaredNormalize, 4)
            .fit(&[0.6; 12], &[], 1.0)
            .unwrap();
        assert!((squared.curve.points()[2].y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_squared_normalize() {
        let fitter = CurveFitter::new(FitMode::SquaredNormalize, 4);
        let outcome = fitter.fit(&ramp(11, 0.0, 1.0), &[], 1.0).unwrap();
        let ys: Vec<f64> = outcome.curve.points().iter().map(|p| p.y).collect();
        assert!((ys[1] - 0.0625).abs() < 1e-12);
        assert!((ys[2] - 0.25).abs() < 1e-12);
        assert_eq!(ys[4], 1.0);
    }

    #[test]
    fn test_sigmoid_shape() {
        let fitter = CurveFitter::new(FitMode::Sigmoid, 10);
        let outcome = fitter.fit(&ramp(21, 0.2, 0.8), &[], 1.0).unwrap();
        let points = outcome.curve.points();

        // Monotonic, bounded, centered on the median
        for pair in points.windows(2) {
            assert!(pair[1].y >= pair[0].y);
        }
        for p in points {
            assert!((0.0..=1.0).contains(&p.y));
        }
        assert!((points[5].y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sigmoid_params() {
        let stats = Statistics::describe(&[0.5; 10]).unwrap();
        let params = SigmoidParams::from_stats(&stats, 1.0, 1.0);
        // Degenerate range: spread 0.5, steepness 8
        assert_eq!(params.steepness, 8.0);
        assert_eq!(params.center, 0.5);

        let steep = SigmoidParams::from_stats(&stats, 6.0, 1.0);
        assert_eq!(steep.steepness, SIGMOID_MAX_STEEPNESS);
        let shallow = SigmoidParams::from_stats(&stats, 0.5, 1.0);
        assert_eq!(shallow.steepness, SIGMOID_MIN_STEEPNESS);
    }

    #[test]
    fn test_segments_floor() {
        let fitter = CurveFitter::new(FitMode::PowerLaw, 0);
        assert_eq!(fitter.segments(), 1);
        let outcome = fitter.fit(&[0.5; 10], &[], 2.0).unwrap();
        assert_eq!(outcome.curve.to_pairs(), vec![[0.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_outliers_are_counted() {
        let spread = CurveFitter::default().fit(&ramp(20, 0.4, 0.6), &[], 1.0).unwrap();
        assert_eq!(spread.rejected_samples, 0);

        let mut pressure = vec![0.5; 40];
        pressure.push(1.0);
        let outcome = CurveFitter::default().fit(&pressure, &[], 1.0).unwrap();
        assert_eq!(outcome.rejected_samples, 1);
        assert!(outcome.pressure_stats.max < 1.0);
    }
}
