//! Stylus pressure calibration engine
//!
//! This crate provides the data processing behind pressure calibration:
//! - [`samples`] - Sample buffer fed from stroke input during recording
//! - [`velocity`] - Instantaneous stroke velocity from consecutive samples
//! - [`stats`] - Descriptive statistics and outlier rejection
//! - [`fitter`] - Curve fitting policies producing response curves
//! - [`store`] - Per-brush and global curve storage with resolution order
//! - [`persistence`] - Tolerant on-disk storage of the curve store
//! - [`device`] - Live device curve sink
//! - [`session`] - Complete calibration session tying it all together

pub mod constants;
pub mod device;
pub mod error;
pub mod fitter;
pub mod persistence;
pub mod samples;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;
pub mod velocity;

pub use constants::*;
pub use device::*;
pub use error::*;
pub use fitter::*;
pub use persistence::*;
pub use samples::*;
pub use session::*;
pub use stats::*;
pub use store::*;
pub use types::*;
pub use validation::*;
pub use velocity::*;

pub use stylus_config::{BrushKeying, BufferPolicy, CalibrationConfig, FitMode};
