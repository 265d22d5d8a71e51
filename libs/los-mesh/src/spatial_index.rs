//! # Spatial Index for Fast Triangle Queries
//!
//! Uses spatial hashing for O(1) average-case triangle lookups.
//! Keeps occlusion rays from testing every triangle of a large environment.
//!
//! ## Features
//!
//! - **Spatial hashing**: Grid-based acceleration structure
//! - **Ray queries**: Find triangles near a bounded ray segment
//!
//! ## Example
//!
//! ```rust,ignore
//! use los_mesh::SpatialIndex;
//!
//! let index = SpatialIndex::from_mesh(&mesh);
//! let candidates = index.query_ray(origin, direction, 25.0);
//! ```

use std::collections::HashMap;

use config::constants::EPSILON;
use glam::DVec3;

use crate::mesh::Mesh;

/// Cell size multiplier for spatial hashing.
/// Larger values = fewer cells but more triangles per cell.
const CELL_SIZE_FACTOR: f64 = 2.0;

/// Minimum cell size to avoid too many cells.
const MIN_CELL_SIZE: f64 = 0.1;

/// 3D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
    z: i64,
}

impl CellCoord {
    /// Creates a cell coordinate from 3D position.
    fn from_position(pos: DVec3, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
            z: (pos.z / cell_size).floor() as i64,
        }
    }
}

/// Spatial index for fast triangle queries.
///
/// Uses a hash grid to map 3D space to triangle lists. Query results are
/// candidate sets: every triangle that may intersect the query is included,
/// exact tests are left to the caller.
#[derive(Debug)]
pub struct SpatialIndex {
    /// Hash grid: cell -> triangle indices
    grid: HashMap<CellCoord, Vec<usize>>,
    /// Cell size for hashing
    cell_size: f64,
    /// Mesh bounding box min
    bounds_min: DVec3,
    /// Mesh bounding box max
    bounds_max: DVec3,
    /// Total triangle count
    triangle_count: usize,
}

impl SpatialIndex {
    /// Creates a spatial index from a mesh.
    ///
    /// Automatically determines cell size from mesh extent and triangle
    /// count. Triangles referencing missing vertices are skipped.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let (bounds_min, bounds_max) = mesh.bounding_box();
        let triangle_count = mesh.triangle_count();

        let extent = bounds_max - bounds_min;
        let avg_extent = (extent.x + extent.y + extent.z) / 3.0;
        let cell_size = (avg_extent / (triangle_count.max(1) as f64).cbrt() * CELL_SIZE_FACTOR)
            .max(MIN_CELL_SIZE);

        let mut grid: HashMap<CellCoord, Vec<usize>> = HashMap::new();

        for face in mesh.faces() {
            let [v0, v1, v2] = face.vertices;

            let tri_min = v0.min(v1).min(v2);
            let tri_max = v0.max(v1).max(v2);

            // Insert into all overlapping cells
            let cell_min = CellCoord::from_position(tri_min, cell_size);
            let cell_max = CellCoord::from_position(tri_max, cell_size);

            for cx in cell_min.x..=cell_max.x {
                for cy in cell_min.y..=cell_max.y {
                    for cz in cell_min.z..=cell_max.z {
                        let cell = CellCoord { x: cx, y: cy, z: cz };
                        grid.entry(cell).or_default().push(face.index);
                    }
                }
            }
        }

        Self {
            grid,
            cell_size,
            bounds_min,
            bounds_max,
            triangle_count,
        }
    }

    /// Queries triangles along a ray segment `[0, max_distance]`.
    ///
    /// The segment is first clipped to the mesh bounds, then cells are
    /// traversed with a 3D DDA from the entry point until the next cell
    /// boundary lies beyond the exit point.
    /// `direction` should be normalized.
    pub fn query_ray(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Vec<usize> {
        let mut result = Vec::new();
        if self.triangle_count == 0 {
            return result;
        }

        let Some((t_enter, t_exit)) = self.clip_to_bounds(origin, direction, max_distance) else {
            return result;
        };

        let start = origin + direction * t_enter;

        let step = DVec3::new(
            if direction.x >= 0.0 { 1.0 } else { -1.0 },
            if direction.y >= 0.0 { 1.0 } else { -1.0 },
            if direction.z >= 0.0 { 1.0 } else { -1.0 },
        );

        let mut current = CellCoord::from_position(start, self.cell_size);

        // Compute t_max and t_delta for DDA
        let inv_dir = DVec3::new(
            if direction.x.abs() > EPSILON { 1.0 / direction.x } else { f64::INFINITY },
            if direction.y.abs() > EPSILON { 1.0 / direction.y } else { f64::INFINITY },
            if direction.z.abs() > EPSILON { 1.0 / direction.z } else { f64::INFINITY },
        );

        let t_delta = (inv_dir * self.cell_size).abs();

        let cell_boundary = DVec3::new(
            (current.x as f64 + if step.x > 0.0 { 1.0 } else { 0.0 }) * self.cell_size,
            (current.y as f64 + if step.y > 0.0 { 1.0 } else { 0.0 }) * self.cell_size,
            (current.z as f64 + if step.z > 0.0 { 1.0 } else { 0.0 }) * self.cell_size,
        );

        let mut t_max = DVec3::new(
            axis_crossing(cell_boundary.x - start.x, inv_dir.x),
            axis_crossing(cell_boundary.y - start.y, inv_dir.y),
            axis_crossing(cell_boundary.z - start.z, inv_dir.z),
        ) + DVec3::splat(t_enter);

        loop {
            self.collect_cell(&current, &mut result);

            let t_next = t_max.min_element();
            if t_next > t_exit {
                break;
            }

            // Move to next cell
            if t_max.x < t_max.y && t_max.x < t_max.z {
                current.x += step.x as i64;
                t_max.x += t_delta.x;
            } else if t_max.y < t_max.z {
                current.y += step.y as i64;
                t_max.y += t_delta.y;
            } else {
                current.z += step.z as i64;
                t_max.z += t_delta.z;
            }
        }

        dedup(result)
    }

    /// Clips `[0, max_distance]` against the padded mesh bounds (slab test).
    fn clip_to_bounds(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
    ) -> Option<(f64, f64)> {
        let pad = DVec3::splat(self.cell_size * 1e-6);
        let lo = (self.bounds_min - pad).to_array();
        let hi = (self.bounds_max + pad).to_array();
        let o = origin.to_array();
        let d = direction.to_array();

        let mut t_min = 0.0_f64;
        let mut t_max = max_distance;

        for axis in 0..3 {
            if d[axis].abs() < EPSILON {
                if o[axis] < lo[axis] || o[axis] > hi[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (lo[axis] - o[axis]) / d[axis];
            let t2 = (hi[axis] - o[axis]) / d[axis];
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        (t_min <= t_max && t_max.is_finite()).then_some((t_min, t_max))
    }

    fn collect_cell(&self, cell: &CellCoord, result: &mut Vec<usize>) {
        if let Some(tris) = self.grid.get(cell) {
            result.extend_from_slice(tris);
        }
    }

    /// Returns the number of cells in the index.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Returns the cell size used for hashing.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

/// Triangles spanning several cells are collected once per cell.
fn dedup(mut candidates: Vec<usize>) -> Vec<usize> {
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

/// Ray parameter at which an axis boundary `delta` away is crossed.
#[inline]
fn axis_crossing(delta: f64, inv_dir: f64) -> f64 {
    if inv_dir.is_infinite() {
        f64::INFINITY
    } else {
        delta * inv_dir
    }
}
