//! Brush identity as sent by the UI.

use serde::{Deserialize, Serialize};

/// Brush the UI has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushInfo {
    /// Display name
    pub name: String,
    /// Host identifier that survives renames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
}

/// Target of an applied calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalibrationScope {
    /// Only the selected brush (the "apply to selected brush" checkbox)
    #[default]
    CurrentBrush,
    /// Replace every brush curve with a new global default
    AllBrushes,
}
