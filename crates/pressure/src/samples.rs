//! Sample buffer for calibration recording
//!
//! Collects pressure readings and derived stroke velocities while the
//! user draws on the calibration pad. Velocities are only derived between
//! consecutive samples of the same stroke.

use tracing::trace;

use crate::types::Sample;
use crate::validation::clamp_pressure;
use crate::velocity::{distance, interval_seconds, velocity};

/// Append-only pressure and velocity sample collection
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    /// Pressure of every recorded sample, in [0, 1]
    pressure: Vec<f64>,
    /// Velocity between consecutive samples of a stroke (px/s)
    velocity: Vec<f64>,
    /// Previous sample in the current stroke (None at stroke start)
    last: Option<Sample>,
    /// Number of strokes begun since the last clear
    stroke_count: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stroke at `(x, y)`
    ///
    /// The first sample of a stroke never produces a velocity, so strokes
    /// separated by a pen lift do not yield a bogus jump.
    pub fn begin_stroke(&mut self, x: f64, y: f64) {
        trace!("SampleBuffer::begin_stroke at ({:.1}, {:.1})", x, y);
        self.last = None;
        self.stroke_count += 1;
    }

    /// Record one reading
    ///
    /// `pressure` is `None` when the device has no pressure axis.
    pub fn record(&mut self, pressure: Option<f64>, x: f64, y: f64, timestamp_ms: u64) {
        let sample = Sample {
            pressure: clamp_pressure(pressure),
            x,
            y,
            timestamp_ms,
        };
        self.pressure.push(sample.pressure);

        if let Some(prev) = self.last {
            let dt = interval_seconds(prev.timestamp_ms, sample.timestamp_ms);
            let dist = distance((prev.x, prev.y), (sample.x, sample.y));
            match velocity(dist, dt) {
                Ok(v) if v.is_finite() => self.velocity.push(v),
                Ok(v) => trace!("SampleBuffer::record: skipping non-finite velocity {}", v),
                Err(err) => trace!("SampleBuffer::record: {}", err),
            }
        }

        self.last = Some(sample);
    }

    /// Finish the current stroke
    pub fn end_stroke(&mut self) {
        self.last = None;
    }

    /// Drop every recorded sample
    pub fn clear(&mut self) {
        self.pressure.clear();
        self.velocity.clear();
        self.last = None;
        self.stroke_count = 0;
    }

    pub fn sample_count(&self) -> usize {
        self.pressure.len()
    }

    pub fn velocity_count(&self) -> usize {
        self.velocity.len()
    }

    pub fn stroke_count(&self) -> usize {
        self.stroke_count
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// True while a stroke is open and has at least one sample
    pub fn in_stroke(&self) -> bool {
        self.last.is_some()
    }

    pub fn pressure_samples(&self) -> &[f64] {
        &self.pressure
    }

    pub fn velocity_samples(&self) -> &[f64] {
        &self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_derives_velocity() {
        let mut buffer = SampleBuffer::new();
        buffer.begin_stroke(0.0, 0.0);
        buffer.record(Some(0.2), 0.0, 0.0, 0);
        buffer.record(Some(0.4), 10.0, 0.0, 50);
        buffer.record(Some(0.6), 20.0, 0.0, 100);

        assert_eq!(buffer.sample_count(), 3);
        assert_eq!(buffer.velocity_count(), 2);
        for v in buffer.velocity_samples() {
            assert!((v - 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_missing_pressure_axis_records_half() {
        let mut buffer = SampleBuffer::new();
        buffer.begin_stroke(0.0, 0.0);
        buffer.record(None, 0.0, 0.0, 0);
        assert_eq!(buffer.pressure_samples(), &[0.5]);
    }

    #[test]
    fn test_pressure_is_clamped() {
        let mut buffer = SampleBuffer::new();
        buffer.begin_stroke(0.0, 0.0);
        buffer.record(Some(1.7), 0.0, 0.0, 0);
        buffer.record(Some(-0.3), 1.0, 0.0, 10);
        assert_eq!(buffer.pressure_samples(), &[1.0, 0.0]);
    }

    #[test]
    fn test_zero_interval_skips_velocity() {
        let mut buffer = SampleBuffer::new();
        buffer.begin_stroke(0.0, 0.0);
        buffer.record(Some(0.5), 0.0, 0.0, 100);
        buffer.record(Some(0.5), 5.0, 0.0, 100);
        // Clock going backwards is skipped too
        buffer.record(Some(0.5), 10.0, 0.0, 90);

        assert_eq!(buffer.sample_count(), 3);
        assert_eq!(buffer.velocity_count(), 0);
    }

    #[test]
    fn test_no_velocity_across_strokes() {
        let mut buffer = SampleBuffer::new();
        buffer.begin_stroke(0.0, 0.0);
        buffer.record(Some(0.5), 0.0, 0.0, 0);
        buffer.record(Some(0.5), 10.0, 0.0, 10);
        buffer.end_stroke();

        buffer.begin_stroke(500.0, 500.0);
        buffer.record(Some(0.5), 500.0, 500.0, 20);

        assert_eq!(buffer.sample_count(), 3);
        assert_eq!(buffer.velocity_count(), 1);
        assert_eq!(buffer.stroke_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut buffer = SampleBuffer::new();
        buffer.begin_stroke(0.0, 0.0);
        buffer.record(Some(0.5), 0.0, 0.0, 0);
        buffer.record(Some(0.5), 3.0, 4.0, 10);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.velocity_count(), 0);
        assert_eq!(buffer.stroke_count(), 0);
        assert!(!buffer.in_stroke());
    }
}
