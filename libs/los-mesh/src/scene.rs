//! # Occluder Scene
//!
//! Named collection of meshes answering nearest-hit ray queries, the
//! stand-in for a host scene graph. The target surface may be registered
//! alongside the environment so callers can tell self-hits apart from real
//! obstructions by [`ObjectId`].

use std::collections::HashMap;

use config::constants::EPSILON;
use glam::DVec3;
use log::debug;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::ray::{ray_triangle_intersection, ObjectId, OccluderQuery, RayHit};
use crate::spatial_index::SpatialIndex;

#[derive(Debug)]
struct SceneObject {
    name: String,
    mesh: Mesh,
    index: SpatialIndex,
}

/// Occluding environment made of named, spatially indexed meshes.
///
/// The scene is immutable once queried, so it is `Sync` and can serve
/// parallel classification.
///
/// # Example
///
/// ```rust
/// use los_mesh::OccluderScene;
///
/// let scene = OccluderScene::new();
/// assert!(scene.is_empty());
/// assert!(scene.object_id("Target_Panel").is_none());
/// ```
#[derive(Debug, Default)]
pub struct OccluderScene {
    objects: Vec<SceneObject>,
    by_name: HashMap<String, ObjectId>,
}

impl OccluderScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mesh under a unique name and builds its spatial index.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DuplicateObject`] if the name is taken and
    /// propagates index validation failures of the mesh.
    pub fn add_object(&mut self, name: impl Into<String>, mesh: Mesh) -> MeshResult<ObjectId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(MeshError::DuplicateObject { name });
        }
        mesh.validate_indices()?;

        let id = ObjectId(self.objects.len() as u32);
        let index = SpatialIndex::from_mesh(&mesh);
        debug!(
            "scene object {name} {id}: {} triangles, {} cells (cell size {:.3})",
            mesh.triangle_count(),
            index.cell_count(),
            index.cell_size()
        );

        self.by_name.insert(name.clone(), id);
        self.objects.push(SceneObject { name, mesh, index });
        Ok(id)
    }

    /// Looks up an object by name.
    pub fn object_id(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    /// Returns the mesh of an object.
    pub fn object_mesh(&self, id: ObjectId) -> Option<&Mesh> {
        self.objects.get(id.0 as usize).map(|o| &o.mesh)
    }

    /// Returns the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total triangle count over all objects.
    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }

    /// Nearest hit in `(0, max_distance]` over all objects except `exclude`.
    fn nearest_hit(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        exclude: Option<ObjectId>,
    ) -> Option<RayHit> {
        if max_distance <= 0.0 {
            return None;
        }

        let mut best: Option<RayHit> = None;

        for (i, object) in self.objects.iter().enumerate() {
            let id = ObjectId(i as u32);
            if exclude == Some(id) {
                continue;
            }

            for tri_idx in object.index.query_ray(origin, direction, max_distance) {
                let Some(face) = object.mesh.face(tri_idx) else {
                    continue;
                };
                let [v0, v1, v2] = face.vertices;
                let Some(t) = ray_triangle_intersection(origin, direction, v0, v1, v2) else {
                    continue;
                };
                if t <= EPSILON || t > max_distance {
                    continue;
                }
                if best.map_or(true, |b| t < b.distance) {
                    best = Some(RayHit {
                        distance: t,
                        object: id,
                        triangle: tri_idx,
                    });
                }
            }
        }

        best
    }
}

impl OccluderQuery for OccluderScene {
    fn cast_ray(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<RayHit> {
        self.nearest_hit(origin, direction, max_distance, None)
    }

    fn cast_ray_excluding(
        &self,
        origin: DVec3,
        direction: DVec3,
        max_distance: f64,
        exclude: ObjectId,
    ) -> Option<RayHit> {
        self.nearest_hit(origin, direction, max_distance, Some(exclude))
    }
}
