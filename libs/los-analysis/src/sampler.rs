//! # Surface Sampler
//!
//! Area-proportional stochastic sampling of a triangulated surface.
//!
//! ## Algorithm
//!
//! Each triangle of area `A` receives `max(1, floor(A / d²))` points for a
//! spacing `d`. A point is drawn from two uniform values `r1, r2` as
//! `u = sqrt(r1), v = r2`, reflected to `(1 - u, 1 - v)` when `u + v > 1`,
//! and placed at `u·V0 + v·V1 + w·V2` with `w = 1 - u - v`.
//!
//! Output is grouped by triangle in mesh order, and fully determined by the
//! random generator passed in.

use config::constants::{DEGENERATE_AREA, MAX_SAMPLES};
use glam::DVec3;
use log::{debug, warn};
use los_mesh::{Mesh, Triangle};
use rand::Rng;
use serde::Serialize;

/// A point on the target surface and the triangle it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    /// World-space position
    pub position: DVec3,
    /// Index of the owning triangle in the target mesh
    pub triangle_index: usize,
}

/// Number of samples for a triangle of the given area.
///
/// Never less than one, so zero-area triangles are still covered.
///
/// # Example
///
/// ```rust
/// use los_analysis::sampler::samples_per_triangle;
///
/// assert_eq!(samples_per_triangle(1.0, 0.125), 64);
/// assert_eq!(samples_per_triangle(1.0, 0.25), 16);
/// assert_eq!(samples_per_triangle(0.0, 0.125), 1);
/// ```
#[inline]
pub fn samples_per_triangle(area: f64, spacing: f64) -> usize {
    ((area / (spacing * spacing)).floor() as usize).max(1)
}

/// Total number of samples [`sample_surface`] will produce for a mesh.
pub fn expected_sample_count(mesh: &Mesh, spacing: f64) -> usize {
    mesh.faces()
        .map(|t| samples_per_triangle(t.area(), spacing))
        .fold(0usize, usize::saturating_add)
}

/// Pre-allocation for [`sample_surface`], bounded by [`MAX_SAMPLES`] since
/// the expected count saturates for tiny spacings.
fn capacity_hint(mesh: &Mesh, spacing: f64) -> usize {
    expected_sample_count(mesh, spacing).min(MAX_SAMPLES)
}

/// Barycentric weights `(u, v, w)` from two uniform values in `[0, 1)`.
///
/// The reflection keeps the weights non-negative and the resulting points
/// uniformly distributed over the triangle's area.
#[inline]
pub fn barycentric_weights(r1: f64, r2: f64) -> (f64, f64, f64) {
    let mut u = r1.sqrt();
    let mut v = r2;
    if u + v > 1.0 {
        u = 1.0 - u;
        v = 1.0 - v;
    }
    (u, v, 1.0 - u - v)
}

/// Draws one uniformly distributed point on a triangle.
pub fn sample_triangle<R: Rng + ?Sized>(triangle: &Triangle, rng: &mut R) -> DVec3 {
    let (u, v, w) = barycentric_weights(rng.gen::<f64>(), rng.gen::<f64>());
    triangle.point_at(u, v, w)
}

/// Samples every triangle of `mesh` with average spacing `spacing`.
///
/// `spacing` must be positive; callers validate it through
/// [`config::AnalysisSettings`].
pub fn sample_surface<R: Rng + ?Sized>(mesh: &Mesh, spacing: f64, rng: &mut R) -> Vec<SamplePoint> {
    let mut points = Vec::with_capacity(capacity_hint(mesh, spacing));
    let mut degenerate = 0usize;

    for triangle in mesh.faces() {
        let area = triangle.area();
        if !(area > DEGENERATE_AREA) {
            degenerate += 1;
        }

        for _ in 0..samples_per_triangle(area, spacing) {
            points.push(SamplePoint {
                position: sample_triangle(&triangle, rng),
                triangle_index: triangle.index,
            });
        }
    }

    if degenerate > 0 {
        warn!("{degenerate} degenerate triangles sampled with a single point each");
    }
    debug!(
        "Sampled {} points over {} triangles (spacing {spacing})",
        points.len(),
        mesh.triangle_count()
    );

    points
}
