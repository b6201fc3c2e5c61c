//! Shared configuration for stylus calibration
//!
//! This crate provides the single source of truth for calibration settings
//! shared by the pressure engine and the calibration binary: which fit
//! policy to use, how dense the emitted curves are, what happens to the
//! sample buffer after a calibration is applied, how brushes are keyed, and
//! where the curve store lives on disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default power (exponent) for the power-law fit
pub const DEFAULT_POWER: f64 = 1.0;

/// Lowest power the user can select
pub const MIN_POWER: f64 = 0.5;

/// Highest power the user can select
pub const MAX_POWER: f64 = 6.0;

/// Default number of curve segments (8 emitted points incl. endpoints)
pub const DEFAULT_CONTROL_SEGMENTS: usize = 7;

/// Directory under the user config dir holding the curve store
pub const STORE_DIR_NAME: &str = "stylus";

/// File name of the persisted curve store
pub const STORE_FILE_NAME: &str = "pressure-curves.json";

/// Curve fitting policy used when a calibration is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// `y = x^power * velocity_strength`
    #[default]
    PowerLaw,
    /// Stretch `[min, max]` pressure linearly onto `[0, 1]`
    RangeNormalize,
    /// Range normalization followed by squaring
    SquaredNormalize,
    /// Logistic curve centered on the median pressure
    Sigmoid,
}

impl FitMode {
    /// Parse the short names accepted in `STYLUS_FIT_MODE`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "power" | "power_law" => Some(Self::PowerLaw),
            "range" | "range_normalize" => Some(Self::RangeNormalize),
            "squared" | "squared_normalize" => Some(Self::SquaredNormalize),
            "sigmoid" | "logistic" => Some(Self::Sigmoid),
            _ => None,
        }
    }

    /// Short lowercase name, as accepted by [`FitMode::parse`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerLaw => "power",
            Self::RangeNormalize => "range",
            Self::SquaredNormalize => "squared",
            Self::Sigmoid => "sigmoid",
        }
    }
}

/// What happens to recorded samples once a calibration is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPolicy {
    /// Start the next calibration from an empty buffer
    #[default]
    ClearAfterApply,
    /// Keep samples so later strokes refine the same calibration
    Retain,
}

impl BufferPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear" | "clear_after_apply" => Some(Self::ClearAfterApply),
            "retain" | "keep" => Some(Self::Retain),
            _ => None,
        }
    }
}

/// How a brush is turned into a curve store key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushKeying {
    /// Key by the brush display name
    #[default]
    DisplayName,
    /// Key by the host's stable brush id, falling back to the display name
    StableId,
}

impl BrushKeying {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "display_name" => Some(Self::DisplayName),
            "id" | "stable_id" => Some(Self::StableId),
            _ => None,
        }
    }
}

/// Calibration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Fit policy for new calibrations
    pub fit_mode: FitMode,
    /// Number of curve segments; emitted curves have `control_segments + 1` points
    pub control_segments: usize,
    /// Sample buffer handling after apply
    pub buffer_policy: BufferPolicy,
    /// Brush keying strategy for the curve store
    pub brush_keying: BrushKeying,
    /// Power used until the user picks one
    pub default_power: f64,
    /// Explicit curve store location (None = platform config dir)
    pub store_path: Option<PathBuf>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            fit_mode: FitMode::default(),
            control_segments: DEFAULT_CONTROL_SEGMENTS,
            buffer_policy: BufferPolicy::default(),
            brush_keying: BrushKeying::default(),
            default_power: DEFAULT_POWER,
            store_path: None,
        }
    }
}

impl CalibrationConfig {
    /// Build a config from `STYLUS_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Unknown or unparsable values are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("STYLUS_FIT_MODE") {
            match FitMode::parse(&value) {
                Some(mode) => config.fit_mode = mode,
                None => warn!("Ignoring unknown STYLUS_FIT_MODE={:?}", value),
            }
        }

        if let Some(value) = lookup("STYLUS_CONTROL_POINTS") {
            match value.trim().parse::<usize>() {
                Ok(n) if n >= 1 => config.control_segments = n,
                _ => warn!("Ignoring invalid STYLUS_CONTROL_POINTS={:?}", value),
            }
        }

        if let Some(value) = lookup("STYLUS_BUFFER_POLICY") {
            match BufferPolicy::parse(&value) {
                Some(policy) => config.buffer_policy = policy,
                None => warn!("Ignoring unknown STYLUS_BUFFER_POLICY={:?}", value),
            }
        }

        if let Some(value) = lookup("STYLUS_BRUSH_KEYING") {
            match BrushKeying::parse(&value) {
                Some(keying) => config.brush_keying = keying,
                None => warn!("Ignoring unknown STYLUS_BRUSH_KEYING={:?}", value),
            }
        }

        if let Some(value) = lookup("STYLUS_DEFAULT_POWER") {
            match value.trim().parse::<f64>() {
                Ok(power) if power.is_finite() => config.default_power = clamp_power(power),
                _ => warn!("Ignoring invalid STYLUS_DEFAULT_POWER={:?}", value),
            }
        }

        if let Some(value) = lookup("STYLUS_STORE_PATH") {
            if !value.trim().is_empty() {
                config.store_path = Some(PathBuf::from(value));
            }
        }

        config
    }

    /// Resolved curve store location.
    ///
    /// Returns None when no explicit path is set and the platform has no
    /// config directory.
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path.clone().or_else(default_store_path)
    }
}

/// Platform default location of the curve store
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(STORE_DIR_NAME).join(STORE_FILE_NAME))
}

/// Clamp a power value into the selectable range
pub fn clamp_power(power: f64) -> f64 {
    if power.is_nan() {
        return DEFAULT_POWER;
    }
    power.clamp(MIN_POWER, MAX_POWER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CalibrationConfig::default();
        assert_eq!(config.fit_mode, FitMode::PowerLaw);
        assert_eq!(config.control_segments, DEFAULT_CONTROL_SEGMENTS);
        assert_eq!(config.buffer_policy, BufferPolicy::ClearAfterApply);
        assert_eq!(config.brush_keying, BrushKeying::DisplayName);
        assert_eq!(config.default_power, DEFAULT_POWER);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = CalibrationConfig::from_lookup(lookup_from(&[
            ("STYLUS_FIT_MODE", "sigmoid"),
            ("STYLUS_CONTROL_POINTS", "4"),
            ("STYLUS_BUFFER_POLICY", "retain"),
            ("STYLUS_BRUSH_KEYING", "id"),
            ("STYLUS_DEFAULT_POWER", "2.5"),
            ("STYLUS_STORE_PATH", "/tmp/curves.json"),
        ]));

        assert_eq!(config.fit_mode, FitMode::Sigmoid);
        assert_eq!(config.control_segments, 4);
        assert_eq!(config.buffer_policy, BufferPolicy::Retain);
        assert_eq!(config.brush_keying, BrushKeying::StableId);
        assert_eq!(config.default_power, 2.5);
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/curves.json")));
        assert_eq!(
            config.resolved_store_path(),
            Some(PathBuf::from("/tmp/curves.json"))
        );
    }

    #[test]
    fn test_from_lookup_ignores_bad_values() {
        let config = CalibrationConfig::from_lookup(lookup_from(&[
            ("STYLUS_FIT_MODE", "cubic"),
            ("STYLUS_CONTROL_POINTS", "0"),
            ("STYLUS_DEFAULT_POWER", "lots"),
        ]));
        assert_eq!(config, CalibrationConfig::default());
    }

    #[test]
    fn test_power_is_clamped() {
        let config =
            CalibrationConfig::from_lookup(lookup_from(&[("STYLUS_DEFAULT_POWER", "10")]));
        assert_eq!(config.default_power, MAX_POWER);
        assert_eq!(clamp_power(0.1), MIN_POWER);
        assert_eq!(clamp_power(f64::NAN), DEFAULT_POWER);
    }

    #[test]
    fn test_fit_mode_names_round_trip() {
        for mode in [
            FitMode::PowerLaw,
            FitMode::RangeNormalize,
            FitMode::SquaredNormalize,
            FitMode::Sigmoid,
        ] {
            assert_eq!(FitMode::parse(mode.as_str()), Some(mode));
        }
    }
}
