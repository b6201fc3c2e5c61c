//! Descriptive statistics over pressure and velocity samples

use serde::Serialize;
use thiserror::Error;

use crate::constants::{
    DEFAULT_AVG_VELOCITY, DEFAULT_MAX_VELOCITY, DEFAULT_MIN_VELOCITY, MIN_SAMPLES_AFTER_REJECTION,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    #[error("No samples to describe")]
    InsufficientData,
}

/// Summary of a sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// First quartile (nearest rank)
    pub q1: f64,
    /// Third quartile (nearest rank)
    pub q3: f64,
    pub iqr: f64,
    /// Population standard deviation
    pub stddev: f64,
}

impl Statistics {
    /// Describe a non-empty sample set
    pub fn describe(samples: &[f64]) -> Result<Self, StatsError> {
        if samples.is_empty() {
            return Err(StatsError::InsufficientData);
        }

        let sorted = sorted(samples);
        let n = sorted.len();
        let mean = mean(samples);

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let q1 = sorted[n / 4];
        let q3 = sorted[(3 * n) / 4];

        Ok(Self {
            count: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean,
            median,
            q1,
            q3,
            iqr: q3 - q1,
            stddev: population_stddev(samples, mean),
        })
    }

    /// `max - min`
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Stable ascending sort under the IEEE total order
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn population_stddev(samples: &[f64], mean: f64) -> f64 {
    let variance =
        samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}

/// Drop samples further than `k` standard deviations from the mean
///
/// Returns the input unchanged when rejection would leave fewer than
/// [`MIN_SAMPLES_AFTER_REJECTION`] samples.
pub fn reject_outliers(samples: &[f64], k: f64) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mean = mean(samples);
    let stddev = population_stddev(samples, mean);
    let threshold = k * stddev;

    let kept: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|v| (v - mean).abs() <= threshold)
        .collect();

    if kept.len() < MIN_SAMPLES_AFTER_REJECTION {
        samples.to_vec()
    } else {
        kept
    }
}

/// Velocity range and average feeding the velocity strength factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VelocityStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sample_count: usize,
}

impl Default for VelocityStats {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_VELOCITY,
            max: DEFAULT_MAX_VELOCITY,
            mean: DEFAULT_AVG_VELOCITY,
            sample_count: 0,
        }
    }
}

impl VelocityStats {
    /// Stats over recorded velocities, or the defaults when there are none
    pub fn from_samples(samples: &[f64]) -> Self {
        match Statistics::describe(samples) {
            Ok(stats) => Self {
                min: stats.min,
                max: stats.max,
                mean: stats.mean,
                sample_count: stats.count,
            },
            Err(StatsError::InsufficientData) => Self::default(),
        }
    }

    /// Average velocity normalized into the recorded range, or None when
    /// the range is degenerate or nothing was recorded
    pub fn normalized_mean(&self) -> Option<f64> {
        let range = self.max - self.min;
        if self.sample_count == 0 || range <= 0.0 {
            return None;
        }
        Some(((self.mean - self.min) / range).clamp(0.0, 1.0))
    }
}
