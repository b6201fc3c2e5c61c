//! Applying a calibration

use serde::Serialize;
use stylus_config::{BufferPolicy, FitMode};
use tracing::info;

use crate::constants::VELOCITY_ADJUSTMENT_THRESHOLD;
use crate::device::DeviceCurveSink;
use crate::error::CalibrationError;
use crate::stats::{Statistics, VelocityStats};
use crate::store::BrushKey;
use crate::types::{ApplyScope, Curve};

use super::CalibrationSession;

/// What an applied calibration produced
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationReport {
    pub curve: Curve,
    pub mode: FitMode,
    pub exponent: f64,
    pub velocity_strength: f64,
    pub scope: ApplyScope,
    /// Brush the curve was stored for (None for the global default)
    pub brush: Option<BrushKey>,
    pub sample_count: usize,
    pub velocity_count: usize,
    pub rejected_samples: usize,
    pub pressure_stats: Statistics,
    pub velocity_stats: VelocityStats,
    /// Whether the store was written to disk
    pub saved: bool,
}

#[derive(Serialize)]
struct ReportLine<'a> {
    mode: &'a str,
    exponent: f64,
    velocity_strength: f64,
    samples: usize,
    rejected: usize,
}

impl CalibrationReport {
    /// Status text shown after applying
    pub fn status_message(&self) -> String {
        if self.velocity_strength < VELOCITY_ADJUSTMENT_THRESHOLD {
            format!(
                "Calibration applied!\nPower={:.2}, Velocity scaling={:.2} (faster→thinner)",
                self.exponent, self.velocity_strength
            )
        } else {
            format!(
                "Calibration applied!\nPower={:.2} (no velocity adjustment)",
                self.exponent
            )
        }
    }

    /// One-line JSON summary for logs
    pub fn log_line(&self) -> String {
        serde_json::to_string(&ReportLine {
            mode: self.mode.as_str(),
            exponent: self.exponent,
            velocity_strength: self.velocity_strength,
            samples: self.sample_count,
            rejected: self.rejected_samples,
        })
        .unwrap_or_default()
    }
}

impl<S: DeviceCurveSink> CalibrationSession<S> {
    /// Fit the recorded samples and store the curve
    ///
    /// `exponent` of None uses the current power setting. Errors leave the
    /// samples, the store and the device untouched. On success the store is
    /// saved (failures are logged), the resolved curve is pushed to the
    /// active device and the buffer policy is applied.
    pub fn apply_calibration(
        &mut self,
        exponent: Option<f64>,
        scope: ApplyScope,
    ) -> Result<CalibrationReport, CalibrationError> {
        let exponent = exponent.unwrap_or(self.power);
        let outcome = self.fitter.fit(
            self.buffer.pressure_samples(),
            self.buffer.velocity_samples(),
            exponent,
        )?;

        let brush = match scope {
            ApplyScope::CurrentBrushOnly => self.active_brush_key(),
            ApplyScope::AllBrushes => None,
        };
        self.store.apply(brush.as_ref(), &outcome.curve, scope)?;

        let report = CalibrationReport {
            curve: outcome.curve,
            mode: outcome.mode,
            exponent: outcome.exponent,
            velocity_strength: outcome.velocity_strength,
            scope,
            brush,
            sample_count: self.buffer.sample_count(),
            velocity_count: self.buffer.velocity_count(),
            rejected_samples: outcome.rejected_samples,
            pressure_stats: outcome.pressure_stats,
            velocity_stats: outcome.velocity_stats,
            saved: self.persist(),
        };

        self.push_live_curve();

        if self.config.buffer_policy == BufferPolicy::ClearAfterApply {
            self.buffer.clear();
            self.recording = false;
            self.drawing = false;
        }

        match &report.brush {
            Some(brush) => info!("Calibration applied to brush '{}': {}", brush, report.log_line()),
            None => info!("Calibration applied to all brushes: {}", report.log_line()),
        }

        Ok(report)
    }
}
