//! Calibration message protocol
//!
//! Defines the messages exchanged between a calibration UI and the pressure
//! calibration backend. Messages are JSON objects of the form
//! `{"type": "...", "data": ...}`, one per line.

mod error;
mod messages;
mod types;

pub use error::IpcError;
pub use messages::{CalibrationToUi, UiToCalibration};
pub use types::*;

use serde::Serialize;

/// Serialize a message to a single JSON line (without the newline)
pub fn encode<T: Serialize>(message: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

/// Parse one UI message
pub fn decode_ui_message(line: &str) -> Result<UiToCalibration, IpcError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    if !line.starts_with('{') {
        return Err(IpcError::InvalidFormat(format!(
            "expected a JSON object, got {:?}",
            line.chars().take(32).collect::<String>()
        )));
    }
    Ok(serde_json::from_str(line)?)
}

/// Parse one backend message
pub fn decode_backend_message(line: &str) -> Result<CalibrationToUi, IpcError> {
    Ok(serde_json::from_str(line.trim())?)
}
