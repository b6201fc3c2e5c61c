//! Dispatch of UI messages to the calibration session.

use pressure::{
    ApplyScope, BrushIdentity, CalibrationError, CalibrationReport, CalibrationSession, Curve,
    DeviceCurveSink, DeviceId, SessionSummary,
};
use stylus_ipc::{
    decode_ui_message, BrushInfo, CalibrationResult, CalibrationScope, CalibrationToUi, CurveData,
    SessionStats, UiToCalibration,
};
use tracing::{debug, info, warn};

use crate::sink::OutboundDeviceSink;

const NOT_ENOUGH_SAMPLES: &str = "Not enough samples. Draw more strokes and try again.";

/// Thin adapter between UI messages and a [`CalibrationSession`].
#[derive(Debug)]
pub struct CalibrationHandler {
    session: CalibrationSession<OutboundDeviceSink>,
}

impl CalibrationHandler {
    pub fn new(session: CalibrationSession<OutboundDeviceSink>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &CalibrationSession<OutboundDeviceSink> {
        &self.session
    }

    /// Decode and handle one JSON line
    pub fn handle_line(&mut self, line: &str) -> Vec<CalibrationToUi> {
        match decode_ui_message(line) {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                warn!("Dropping invalid message: {}", e);
                vec![CalibrationToUi::Error {
                    code: "invalid_message".to_string(),
                    message: e.to_string(),
                }]
            }
        }
    }

    /// Handle one UI message, returning replies followed by any live
    /// device curve updates it caused
    pub fn handle(&mut self, msg: UiToCalibration) -> Vec<CalibrationToUi> {
        let mut replies = self.dispatch(msg);
        replies.extend(self.session.sink_mut().drain());
        replies
    }

    /// Save the curve store before exit
    pub fn shutdown(&mut self) {
        info!("Shutting down calibration backend");
        self.session.shutdown();
    }

    fn dispatch(&mut self, msg: UiToCalibration) -> Vec<CalibrationToUi> {
        let session = &mut self.session;

        match msg {
            UiToCalibration::BeginRecording => {
                session.begin_recording();
                vec![status(session.summary().status_message())]
            }
            UiToCalibration::BeginStroke { x, y } => {
                let was_recording = session.is_recording();
                session.begin_stroke(x, y);
                if was_recording {
                    Vec::new()
                } else {
                    vec![status(session.summary().status_message())]
                }
            }
            UiToCalibration::Motion {
                pressure,
                x,
                y,
                timestamp_ms,
            } => {
                let was_ready = session.can_apply();
                session.record_sample(pressure, x, y, timestamp_ms);
                if !was_ready && session.can_apply() {
                    vec![apply_ready(session)]
                } else {
                    Vec::new()
                }
            }
            UiToCalibration::EndStroke => {
                let summary = session.end_stroke();
                if summary.recording && summary.sample_count > 0 {
                    vec![
                        CalibrationToUi::SessionStats(session_stats(&summary)),
                        status(summary.status_message()),
                    ]
                } else {
                    Vec::new()
                }
            }
            UiToCalibration::ClearSession => {
                session.clear_session();
                vec![
                    status(session.summary().status_message()),
                    apply_ready(session),
                ]
            }
            UiToCalibration::ApplyCalibration { power, scope } => {
                match session.apply_calibration(power, apply_scope(scope)) {
                    Ok(report) => vec![
                        status(report.status_message()),
                        CalibrationToUi::CurveApplied(calibration_result(&report)),
                        apply_ready(session),
                    ],
                    Err(e) => {
                        debug!("Calibration not applied: {}", e);
                        calibration_error(&e)
                    }
                }
            }
            UiToCalibration::ToggleEnabled => {
                let enabled = session.toggle_enabled();
                vec![CalibrationToUi::EnabledChanged { enabled }]
            }
            UiToCalibration::SetPower { power } => {
                let power = session.set_power_setting(power);
                vec![CalibrationToUi::PowerChanged { power }]
            }
            UiToCalibration::BrushChanged { brush } => {
                session.brush_changed(brush.map(brush_identity));
                vec![curve_for_brush(session, None)]
            }
            UiToCalibration::DeviceChanged { device } => {
                session.device_changed(device.map(DeviceId::new));
                Vec::new()
            }
            UiToCalibration::ResetBrush { brush } => {
                let brush = brush_identity(brush);
                if !session.reset_brush(&brush) {
                    debug!("Brush '{}' had no stored curve", brush.name);
                }
                vec![curve_for_brush(session, Some(&brush))]
            }
            UiToCalibration::ResetAll => {
                session.reset_all();
                vec![status("All pressure curves reset".to_string())]
            }
            UiToCalibration::RequestCurve { brush } => {
                let brush = brush.map(brush_identity);
                vec![curve_for_brush(session, brush.as_ref())]
            }
        }
    }
}

fn status(message: String) -> CalibrationToUi {
    CalibrationToUi::Status { message }
}

fn apply_ready<S: DeviceCurveSink>(session: &CalibrationSession<S>) -> CalibrationToUi {
    CalibrationToUi::ApplyReady {
        ready: session.can_apply(),
        sample_count: session.buffer().sample_count(),
    }
}

fn calibration_error(err: &CalibrationError) -> Vec<CalibrationToUi> {
    match err {
        CalibrationError::InsufficientSamples { .. } => vec![
            status(NOT_ENOUGH_SAMPLES.to_string()),
            CalibrationToUi::Error {
                code: "insufficient_samples".to_string(),
                message: err.to_string(),
            },
        ],
        CalibrationError::NoActiveBrush => vec![CalibrationToUi::Error {
            code: "no_active_brush".to_string(),
            message: err.to_string(),
        }],
    }
}

/// Stored curve for `brush`, or for the active brush when None
fn curve_for_brush<S: DeviceCurveSink>(
    session: &CalibrationSession<S>,
    brush: Option<&BrushIdentity>,
) -> CalibrationToUi {
    let brush = brush.or(session.active_brush());
    CalibrationToUi::CurveForBrush {
        brush: brush.map(|b| b.name.clone()),
        curve: curve_data(&session.curve_for_brush(brush)),
    }
}

fn apply_scope(scope: CalibrationScope) -> ApplyScope {
    match scope {
        CalibrationScope::CurrentBrush => ApplyScope::CurrentBrushOnly,
        CalibrationScope::AllBrushes => ApplyScope::AllBrushes,
    }
}

fn brush_identity(brush: BrushInfo) -> BrushIdentity {
    BrushIdentity {
        name: brush.name,
        stable_id: brush.stable_id,
    }
}

pub(crate) fn curve_data(curve: &Curve) -> CurveData {
    CurveData {
        points: curve.to_pairs(),
        mode: curve.mode().map(|mode| mode.as_str().to_string()),
    }
}

fn calibration_result(report: &CalibrationReport) -> CalibrationResult {
    CalibrationResult {
        power: report.exponent,
        velocity_strength: report.velocity_strength,
        sample_count: report.sample_count,
        rejected_samples: report.rejected_samples,
        brush: report.brush.as_ref().map(|b| b.to_string()),
        curve: curve_data(&report.curve),
        status: report.status_message(),
    }
}

fn session_stats(summary: &SessionSummary) -> SessionStats {
    SessionStats {
        sample_count: summary.sample_count,
        velocity_count: summary.velocity_count,
        stroke_count: summary.stroke_count,
        min_pressure: summary.pressure.map(|s| s.min),
        max_pressure: summary.pressure.map(|s| s.max),
        avg_pressure: summary.pressure.map(|s| s.mean),
        min_velocity: summary.velocity.min,
        max_velocity: summary.velocity.max,
        avg_velocity: summary.velocity.mean,
        can_apply: summary.can_apply,
    }
}
