//! # Ray Casting
//!
//! Ray-triangle intersection and the occluder query capability consumed by
//! the visibility classifier.
//!
//! ## Thread Safety
//!
//! [`OccluderQuery`] makes no promise about reentrancy. Callers that want to
//! classify samples in parallel require `OccluderQuery + Sync`, so the
//! compiler confirms the query is safe for concurrent invocation.

use std::fmt;

use config::constants::EPSILON;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Identifier of an object in an occluder scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Nearest intersection reported by an occluder query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the unit direction
    pub distance: f64,
    /// Object that was hit
    pub object: ObjectId,
    /// Triangle index inside the hit object's mesh
    pub triangle: usize,
}

/// Ray-intersection capability against occluding geometry.
///
/// `direction` is a unit vector. Implementations report the nearest hit with
/// distance in `(0, max_distance]`, or `None`.
pub trait OccluderQuery {
    /// Casts a ray and returns the nearest hit.
    fn cast_ray(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<RayHit>;

    /// Casts a ray ignoring one object.
    ///
    /// The default filters the nearest hit, which can miss geometry lying
    /// behind the excluded object. Scenes that can skip objects during the
    /// traversal should override it.
    fn cast_ray_excluding(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        exclude: ObjectId,
    ) -> Option<RayHit> {
        self.cast_ray(origin, direction, max_distance)
            .filter(|hit| hit.object != exclude)
    }
}

impl<T: OccluderQuery + ?Sized> OccluderQuery for &T {
    fn cast_ray(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<RayHit> {
        (**self).cast_ray(origin, direction, max_distance)
    }

    fn cast_ray_excluding(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        exclude: ObjectId,
    ) -> Option<RayHit> {
        (**self).cast_ray_excluding(origin, direction, max_distance, exclude)
    }
}

/// Möller–Trumbore ray-triangle intersection algorithm.
///
/// Returns the distance along the ray if there's an intersection, None otherwise.
/// The distance may be negative when the triangle lies behind the origin.
///
/// # Reference
///
/// Möller, T., & Trumbore, B. (1997). Fast, minimum storage ray-triangle intersection.
pub fn ray_triangle_intersection(
    ray_origin: DVec3,
    ray_dir: DVec3,
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    Some(t)
}
