use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by calibration operations. None of them change state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("Need at least {required} pressure samples to calibrate, have {found}")]
    InsufficientSamples { found: usize, required: usize },
    #[error("No active brush to apply the curve to")]
    NoActiveBrush,
}

impl From<StoreError> for CalibrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoActiveBrush => CalibrationError::NoActiveBrush,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CalibrationError::InsufficientSamples {
            found: 3,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "Need at least 10 pressure samples to calibrate, have 3"
        );
        assert_eq!(
            CalibrationError::from(StoreError::NoActiveBrush),
            CalibrationError::NoActiveBrush
        );
    }
}
