//! Type definitions for calibration messages.

mod brush;
mod curve;

pub use brush::*;
pub use curve::*;
