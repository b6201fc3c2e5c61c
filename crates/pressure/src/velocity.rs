//! Instantaneous stroke velocity from consecutive samples

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VelocityError {
    /// Zero or negative time between samples. Callers skip the pair.
    #[error("Degenerate sample interval: {dt_seconds}s")]
    DegenerateInterval { dt_seconds: f64 },
}

/// Seconds between two device timestamps (negative if `now_ms` is earlier)
pub fn interval_seconds(prev_ms: u64, now_ms: u64) -> f64 {
    (now_ms as f64 - prev_ms as f64) / 1000.0
}

/// Euclidean distance between two positions
pub fn distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    (dx * dx + dy * dy).sqrt()
}

/// Velocity in pixels per second
pub fn velocity(distance: f64, dt_seconds: f64) -> Result<f64, VelocityError> {
    if dt_seconds <= 0.0 || dt_seconds.is_nan() {
        return Err(VelocityError::DegenerateInterval { dt_seconds });
    }
    Ok(distance / dt_seconds)
}
