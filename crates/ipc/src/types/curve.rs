//! Curve and calibration result payloads.

use serde::{Deserialize, Serialize};

/// Pressure curve control points, `[x, y]` in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    pub points: Vec<[f64; 2]>,
    /// Fit policy that produced the curve, if any
    #[serde(default)]
    pub mode: Option<String>,
}

/// Outcome of an applied calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub power: f64,
    /// Output scale in [0.8, 1.0]; 1.0 means no velocity adjustment
    pub velocity_strength: f64,
    pub sample_count: usize,
    pub rejected_samples: usize,
    /// Brush the curve was stored for, None for all brushes
    pub brush: Option<String>,
    pub curve: CurveData,
    /// Human readable status line
    pub status: String,
}

/// Cumulative recording statistics, sent after every stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub sample_count: usize,
    pub velocity_count: usize,
    pub stroke_count: usize,
    pub min_pressure: Option<f64>,
    pub max_pressure: Option<f64>,
    pub avg_pressure: Option<f64>,
    /// Velocity figures in px/s (defaults when none were recorded)
    pub min_velocity: f64,
    pub max_velocity: f64,
    pub avg_velocity: f64,
    pub can_apply: bool,
}
