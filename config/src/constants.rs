//! # Configuration Constants
//!
//! Centralized constants for the visibility pipeline. Sampling density,
//! observer defaults, ray precision and reporting colors are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Sampling**: Default point spacing and safety limits
//! - **Observer**: Default field of view and viewing distance
//! - **Reporting**: Category colors, material names and default file names

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used to detect zero-length vectors (a sample coincident with the observer)
/// and parallel rays in the ray-triangle test.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Amount by which occlusion rays are shortened, in length units.
///
/// A line-of-sight ray stops this far before the sample point so that it
/// does not re-intersect the target surface at the sample itself.
///
/// # Example
///
/// ```rust
/// use config::constants::RAY_SELF_HIT_EPSILON;
///
/// let distance = 10.0;
/// let ray_length = distance - RAY_SELF_HIT_EPSILON;
/// assert!(ray_length < distance);
/// ```
pub const RAY_SELF_HIT_EPSILON: f64 = 0.01;

/// Area below which a triangle is reported as degenerate in logs.
///
/// Degenerate triangles are still sampled once; this only controls
/// diagnostics.
pub const DEGENERATE_AREA: f64 = 1e-12;

// =============================================================================
// SAMPLING CONSTANTS
// =============================================================================

/// Default average spacing between sample points (metres).
///
/// 3 cm, so a 1 m² panel receives roughly 1111 samples.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_POINT_SPACING;
///
/// let per_square_metre = (1.0 / (DEFAULT_POINT_SPACING * DEFAULT_POINT_SPACING)) as usize;
/// assert_eq!(per_square_metre, 1111);
/// ```
pub const DEFAULT_POINT_SPACING: f64 = 0.03;

/// Maximum number of sample points in a single analysis.
///
/// Safety limit checked before sampling starts, to prevent memory exhaustion
/// from a spacing that is far too small for the target surface.
pub const MAX_SAMPLES: usize = 50_000_000;

/// Maximum number of triangles in a single imported mesh.
///
/// Safety limit to prevent memory exhaustion from extremely complex models.
pub const MAX_TRIANGLES: usize = 10_000_000;

/// Default seed for the sampling random generator.
pub const DEFAULT_SEED: u64 = 0x5EED_1D05;

// =============================================================================
// OBSERVER CONSTANTS
// =============================================================================

/// Default horizontal field of view (full angle, degrees).
///
/// Approximates the horizontal human visual field.
pub const DEFAULT_H_FOV_DEG: f64 = 110.0;

/// Default vertical field of view (full angle, degrees).
///
/// Approximates the vertical human visual field.
pub const DEFAULT_V_FOV_DEG: f64 = 90.0;

/// Default maximum analysis distance (metres).
pub const DEFAULT_MAX_DISTANCE: f64 = 50.0;

// =============================================================================
// REPORTING CONSTANTS
// =============================================================================

/// RGBA color for visible triangles.
pub const COLOR_VISIBLE: [f32; 4] = [0.1, 0.8, 0.1, 1.0];

/// RGBA color for blocked triangles.
pub const COLOR_BLOCKED: [f32; 4] = [0.8, 0.1, 0.1, 1.0];

/// RGBA color for triangles outside the field of view or range.
pub const COLOR_OUTSIDE: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Material names indexed by category (visible, blocked, outside).
pub const CATEGORY_MATERIAL_NAMES: [&str; 3] = ["VISIBLE", "NO_VISIBLE", "FUERA_CAMPO"];

/// Name under which the target surface is registered in an occluder scene.
pub const DEFAULT_TARGET_NAME: &str = "Target_Panel";

/// Default file name for the per-sample results table.
pub const DEFAULT_RESULTS_FILE: &str = "panel_visibility.csv";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Converts a full field-of-view angle in degrees to a half-angle in radians.
///
/// # Example
///
/// ```rust
/// use config::constants::fov_half_angle;
///
/// let half = fov_half_angle(90.0);
/// assert!((half - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
/// ```
#[inline]
pub fn fov_half_angle(full_degrees: f64) -> f64 {
    full_degrees.to_radians() / 2.0
}
