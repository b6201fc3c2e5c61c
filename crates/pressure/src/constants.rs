/// Minimum pressure samples before a calibration can be applied.
pub const MIN_CALIBRATION_SAMPLES: usize = 10;

/// Pressure recorded when the device reports no pressure axis.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Outlier rejection threshold in standard deviations.
pub const OUTLIER_SIGMA: f64 = 3.0;

/// Outlier rejection is skipped if it would leave fewer samples than this.
pub const MIN_SAMPLES_AFTER_REJECTION: usize = 5;

/// Velocity statistics used when a recording produced no velocity samples (px/s).
pub const DEFAULT_MIN_VELOCITY: f64 = 0.0;
pub const DEFAULT_MAX_VELOCITY: f64 = 1000.0;
pub const DEFAULT_AVG_VELOCITY: f64 = 500.0;

/// Share of the output range removed at the highest average stroke speed.
pub const VELOCITY_SCALE_WEIGHT: f64 = 0.2;

/// Lower bound of the velocity strength factor (upper bound is 1.0).
pub const MIN_VELOCITY_STRENGTH: f64 = 1.0 - VELOCITY_SCALE_WEIGHT;

/// Velocity strength below this counts as an adjustment in status text.
pub const VELOCITY_ADJUSTMENT_THRESHOLD: f64 = 0.99;

/// Sigmoid steepness for a spread of half the pressure range at power 1.
pub const SIGMOID_BASE_STEEPNESS: f64 = 8.0;

/// Sigmoid steepness bounds.
pub const SIGMOID_MIN_STEEPNESS: f64 = 4.0;
pub const SIGMOID_MAX_STEEPNESS: f64 = 12.0;

/// Smallest spread ratio considered when deriving sigmoid steepness.
pub const SIGMOID_MIN_SPREAD: f64 = 0.05;

/// On-disk curve store format version.
pub const STORE_FORMAT_VERSION: u32 = 1;
