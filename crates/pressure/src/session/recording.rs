//! Sample recording for the calibration session

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::constants::MIN_CALIBRATION_SAMPLES;
use crate::device::DeviceCurveSink;
use crate::stats::{Statistics, VelocityStats};

use super::CalibrationSession;

/// Snapshot of what has been recorded so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub recording: bool,
    pub sample_count: usize,
    pub velocity_count: usize,
    pub stroke_count: usize,
    /// None until the first sample
    pub pressure: Option<Statistics>,
    /// Defaults when no velocity was recorded
    pub velocity: VelocityStats,
    pub can_apply: bool,
}

impl SessionSummary {
    /// Status line for the calibration UI
    pub fn status_message(&self) -> String {
        if !self.recording {
            "Draw naturally with your stylus, using your normal drawing pressure. \
             Recording starts when you begin drawing."
                .to_string()
        } else if self.sample_count == 0 {
            "Recording... Draw multiple strokes.".to_string()
        } else {
            format!(
                "Collected {} samples so far. Draw more strokes or click 'Apply Calibration'.",
                self.sample_count
            )
        }
    }
}

impl<S: DeviceCurveSink> CalibrationSession<S> {
    /// Start collecting samples
    ///
    /// Also happens implicitly on the first stroke.
    pub fn begin_recording(&mut self) {
        if self.recording {
            return;
        }
        self.recording = true;
        match &self.active_device {
            Some(device) => info!("Calibration recording started, target device: {}", device),
            None => info!("Calibration recording started, no active device"),
        }
    }

    /// Pen down at `(x, y)`
    pub fn begin_stroke(&mut self, x: f64, y: f64) {
        self.begin_recording();
        self.drawing = true;
        self.buffer.begin_stroke(x, y);
    }

    /// Pen motion. Returns whether the sample was recorded.
    ///
    /// `pressure` is None when the device has no pressure axis.
    pub fn record_sample(&mut self, pressure: Option<f64>, x: f64, y: f64, timestamp_ms: u64) -> bool {
        if !(self.recording && self.drawing) {
            trace!("record_sample: not drawing, ignoring");
            return false;
        }
        self.buffer.record(pressure, x, y, timestamp_ms);
        true
    }

    /// Pen up. Logs the cumulative statistics and returns them.
    pub fn end_stroke(&mut self) -> SessionSummary {
        self.drawing = false;
        self.buffer.end_stroke();

        let summary = self.summary();
        if self.recording && summary.sample_count > 0 {
            debug!(
                "Stroke complete: {} samples, {} velocity samples over {} strokes",
                summary.sample_count, summary.velocity_count, summary.stroke_count
            );
            if summary.velocity_count > 0 {
                debug!(
                    "Velocity min={:.2} max={:.2} avg={:.2} px/s",
                    summary.velocity.min, summary.velocity.max, summary.velocity.mean
                );
            }
        }
        summary
    }

    /// Drop recorded samples and stop recording
    pub fn clear_session(&mut self) {
        self.buffer.clear();
        self.recording = false;
        self.drawing = false;
        info!("Calibration samples cleared");
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Enough samples for `apply_calibration`
    pub fn can_apply(&self) -> bool {
        self.buffer.sample_count() >= MIN_CALIBRATION_SAMPLES
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            recording: self.recording,
            sample_count: self.buffer.sample_count(),
            velocity_count: self.buffer.velocity_count(),
            stroke_count: self.buffer.stroke_count(),
            pressure: Statistics::describe(self.buffer.pressure_samples()).ok(),
            velocity: VelocityStats::from_samples(self.buffer.velocity_samples()),
            can_apply: self.can_apply(),
        }
    }
}
