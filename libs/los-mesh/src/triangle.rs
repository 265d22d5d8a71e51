//! # Triangle
//!
//! A resolved mesh face: three world-space corners plus the index of the
//! face in its owning mesh.

use glam::DVec3;

/// World-space triangle with its index in the owning mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Position of this face in the mesh triangle list
    pub index: usize,
    /// Corner positions `V0, V1, V2`
    pub vertices: [DVec3; 3],
}

impl Triangle {
    /// Creates a triangle from its index and corners.
    pub fn new(index: usize, vertices: [DVec3; 3]) -> Self {
        Self { index, vertices }
    }

    /// Surface area, half the length of the edge cross product.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec3;
    /// use los_mesh::Triangle;
    ///
    /// let tri = Triangle::new(0, [DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 2.0, 0.0)]);
    /// assert_eq!(tri.area(), 2.0);
    /// ```
    pub fn area(&self) -> f64 {
        let [v0, v1, v2] = self.vertices;
        0.5 * (v1 - v0).cross(v2 - v0).length()
    }

    /// Point with barycentric weights `u, v, w` on `V0, V1, V2`.
    #[inline]
    pub fn point_at(&self, u: f64, v: f64, w: f64) -> DVec3 {
        let [v0, v1, v2] = self.vertices;
        v0 * u + v1 * v + v2 * w
    }
}
