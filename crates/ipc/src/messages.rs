//! Message enums exchanged between the calibration UI and the backend.

use serde::{Deserialize, Serialize};

use crate::types::{BrushInfo, CalibrationResult, CalibrationScope, CurveData, SessionStats};

/// Messages from the calibration UI to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToCalibration {
    /// Start collecting samples (also implied by the first stroke)
    BeginRecording,

    /// Pen down on the calibration pad
    BeginStroke { x: f64, y: f64 },

    /// Pen motion. `pressure` is None when the device has no pressure axis.
    Motion {
        #[serde(default)]
        pressure: Option<f64>,
        x: f64,
        y: f64,
        timestamp_ms: u64,
    },

    /// Pen up
    EndStroke,

    /// Drop recorded samples
    ClearSession,

    /// Fit recorded samples and store the curve.
    /// `power` of None uses the current power setting.
    ApplyCalibration {
        #[serde(default)]
        power: Option<f64>,
        #[serde(default)]
        scope: CalibrationScope,
    },

    /// Flip calibrated curves on or off
    ToggleEnabled,

    /// Power slider moved
    SetPower { power: f64 },

    /// Host switched brushes
    BrushChanged { brush: Option<BrushInfo> },

    /// Host switched input devices
    DeviceChanged { device: Option<String> },

    /// Forget one brush's curve
    ResetBrush { brush: BrushInfo },

    /// Forget every stored curve
    ResetAll,

    /// Ask for the stored curve of a brush (None = active brush)
    RequestCurve {
        #[serde(default)]
        brush: Option<BrushInfo>,
    },
}

/// Messages from the backend to the calibration UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CalibrationToUi {
    /// Status line text
    Status { message: String },

    /// Whether enough samples exist to apply
    ApplyReady { ready: bool, sample_count: usize },

    /// Recording statistics after a stroke
    SessionStats(SessionStats),

    /// A calibration was applied
    CurveApplied(CalibrationResult),

    /// Reply to `RequestCurve`
    CurveForBrush {
        brush: Option<String>,
        curve: CurveData,
    },

    /// Calibrated curves were switched on or off
    EnabledChanged { enabled: bool },

    /// Power setting after clamping
    PowerChanged { power: f64 },

    /// A device's live pressure curve changed
    DeviceCurveChanged { device: String, curve: CurveData },

    /// Error notification
    Error { code: String, message: String },
}
