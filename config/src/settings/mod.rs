//! Validated analysis settings shared by the sampler and classifier.
//!
//! Each field has a default in [`crate::constants`]; explicit values go
//! through [`AnalysisSettings::new`] so invalid input is rejected before any
//! geometry is touched.

use std::fmt;

use crate::constants::{
    DEFAULT_MAX_DISTANCE, DEFAULT_POINT_SPACING, MAX_SAMPLES, RAY_SELF_HIT_EPSILON,
};

/// Numeric parameters of a visibility analysis.
///
/// # Examples
/// ```
/// use config::AnalysisSettings;
/// let settings = AnalysisSettings::default();
/// assert!(settings.point_spacing > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    /// Desired average spacing `d` between sample points.
    pub point_spacing: f64,
    /// Samples farther than this from the observer are out of range.
    pub max_distance: f64,
    /// Length by which occlusion rays stop short of the sample.
    pub ray_epsilon: f64,
    /// Upper bound on the number of generated samples.
    pub max_samples: usize,
}

impl AnalysisSettings {
    /// Builds settings enforcing strict validation of every value.
    ///
    /// # Examples
    /// ```
    /// use config::AnalysisSettings;
    /// let settings = AnalysisSettings::new(0.05, 20.0, 0.01, 1_000).expect("valid settings");
    /// assert_eq!(settings.max_distance, 20.0);
    /// ```
    pub fn new(
        point_spacing: f64,
        max_distance: f64,
        ray_epsilon: f64,
        max_samples: usize,
    ) -> Result<Self, ConfigError> {
        if !point_spacing.is_finite() || point_spacing <= 0.0 {
            return Err(ConfigError::InvalidSpacing(point_spacing));
        }
        if max_distance.is_nan() || max_distance <= 0.0 {
            return Err(ConfigError::InvalidDistance(max_distance));
        }
        if !ray_epsilon.is_finite() || ray_epsilon < 0.0 {
            return Err(ConfigError::InvalidRayEpsilon(ray_epsilon));
        }
        if max_samples == 0 {
            return Err(ConfigError::InvalidSampleLimit);
        }
        Ok(Self {
            point_spacing,
            max_distance,
            ray_epsilon,
            max_samples,
        })
    }

    /// Returns a copy with a different point spacing, revalidated.
    pub fn with_point_spacing(self, point_spacing: f64) -> Result<Self, ConfigError> {
        Self::new(point_spacing, self.max_distance, self.ray_epsilon, self.max_samples)
    }

    /// Returns a copy with a different maximum distance, revalidated.
    pub fn with_max_distance(self, max_distance: f64) -> Result<Self, ConfigError> {
        Self::new(self.point_spacing, max_distance, self.ray_epsilon, self.max_samples)
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            point_spacing: DEFAULT_POINT_SPACING,
            max_distance: DEFAULT_MAX_DISTANCE,
            ray_epsilon: RAY_SELF_HIT_EPSILON,
            max_samples: MAX_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when the point spacing is zero, negative or not finite.
    InvalidSpacing(f64),
    /// Raised when the maximum distance is zero, negative or NaN.
    InvalidDistance(f64),
    /// Raised when the ray epsilon is negative or not finite.
    InvalidRayEpsilon(f64),
    /// Raised when the sample limit is zero.
    InvalidSampleLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSpacing(value) => {
                write!(f, "point spacing must be positive and finite: {value}")
            }
            ConfigError::InvalidDistance(value) => {
                write!(f, "maximum distance must be positive: {value}")
            }
            ConfigError::InvalidRayEpsilon(value) => {
                write!(f, "ray epsilon must be non-negative and finite: {value}")
            }
            ConfigError::InvalidSampleLimit => write!(f, "sample limit must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
