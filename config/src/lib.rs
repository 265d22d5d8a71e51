//! # Config Crate
//!
//! Centralized configuration constants for the line-of-sight visibility
//! pipeline. All magic numbers and tunable parameters are defined here so the
//! sampler, classifier and exporters agree on the same values.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_MAX_DISTANCE, DEFAULT_POINT_SPACING, EPSILON};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Defaults describe a human observer in a cave-sized environment
//! assert!(DEFAULT_POINT_SPACING < DEFAULT_MAX_DISTANCE);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Dependency Free**: Pure values and validation, no external crates
//! - **Metric Units**: Lengths are metres, angles are degrees unless noted

pub mod constants;
pub mod settings;

pub use settings::{AnalysisSettings, ConfigError};
