//! # Mesh Data Structure
//!
//! World-space triangle mesh with optional per-triangle material slots.

use config::constants::MAX_TRIANGLES;
use glam::DVec3;

use crate::error::{MeshError, MeshResult};
use crate::triangle::Triangle;

/// A triangle mesh with vertices and indices.
///
/// All positions are world-space `f64`. Triangle indices are positions in
/// [`Mesh::triangles`], which is the iteration order used by sampling and
/// by per-triangle category feedback.
///
/// # Example
///
/// ```rust
/// use los_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.face(0).unwrap().area(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional material slot per triangle
    materials: Option<Vec<u32>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            materials: None,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices and returns its triangle index.
    ///
    /// Indices are not checked here; call [`Mesh::validate_indices`] before
    /// handing the mesh to code that resolves faces.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) -> usize {
        let index = self.triangles.len();
        self.triangles.push([v0, v1, v2]);
        if let Some(materials) = &mut self.materials {
            materials.push(0);
        }
        index
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangle index triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Resolves a triangle index to its world-space corners.
    ///
    /// Returns `None` when the index is out of range or references a
    /// missing vertex.
    pub fn face(&self, index: usize) -> Option<Triangle> {
        let tri = self.triangles.get(index)?;
        let v0 = *self.vertices.get(tri[0] as usize)?;
        let v1 = *self.vertices.get(tri[1] as usize)?;
        let v2 = *self.vertices.get(tri[2] as usize)?;
        Some(Triangle::new(index, [v0, v1, v2]))
    }

    /// Iterates over all resolvable faces in mesh order.
    pub fn faces(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangles.len()).filter_map(move |i| self.face(i))
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Checks every triangle references existing vertices and the triangle
    /// count is within [`MAX_TRIANGLES`].
    pub fn validate_indices(&self) -> MeshResult<()> {
        if self.triangles.len() > MAX_TRIANGLES {
            return Err(MeshError::TooManyTriangles {
                count: self.triangles.len(),
                max: MAX_TRIANGLES,
            });
        }

        let vertex_count = self.vertices.len() as u32;
        for (i, tri) in self.triangles.iter().enumerate() {
            if tri.iter().any(|&v| v >= vertex_count) {
                return Err(MeshError::invalid_topology(format!(
                    "triangle {i} references vertex outside 0..{vertex_count}: {tri:?}"
                )));
            }
        }

        Ok(())
    }

    /// Assigns a material slot to a triangle.
    ///
    /// Returns `false` without modifying the mesh when `index` is out of
    /// range.
    pub fn set_triangle_material(&mut self, index: usize, material: u32) -> bool {
        if index >= self.triangles.len() {
            return false;
        }
        let count = self.triangles.len();
        let materials = self.materials.get_or_insert_with(|| vec![0; count]);
        materials[index] = material;
        true
    }

    /// Returns the material slot of a triangle, if materials were assigned.
    pub fn triangle_material(&self, index: usize) -> Option<u32> {
        self.materials.as_ref()?.get(index).copied()
    }
}
