//! # LOS Mesh
//!
//! Geometry source for the line-of-sight visibility analysis.
//! Holds world-space triangle meshes and answers ray-cast occlusion queries.
//!
//! ## Architecture
//!
//! ```text
//! STL / OBJ file → import → Mesh ─┬→ Triangle (sampling, in los-analysis)
//!                                  └→ OccluderScene (SpatialIndex + ray casts)
//! ```
//!
//! ## Algorithms
//!
//! - **Ray casting**: Möller–Trumbore ray-triangle intersection
//! - **Acceleration**: Spatial hash grid traversed with a 3D DDA
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec3;
//! use los_mesh::{Mesh, OccluderQuery, OccluderScene};
//!
//! let mut wall = Mesh::new();
//! wall.add_vertex(DVec3::new(-1.0, -1.0, -5.0));
//! wall.add_vertex(DVec3::new(1.0, -1.0, -5.0));
//! wall.add_vertex(DVec3::new(0.0, 1.0, -5.0));
//! wall.add_triangle(0, 1, 2);
//!
//! let mut scene = OccluderScene::new();
//! let wall_id = scene.add_object("wall", wall).unwrap();
//!
//! let hit = scene.cast_ray(DVec3::ZERO, DVec3::NEG_Z, 10.0).unwrap();
//! assert_eq!(hit.object, wall_id);
//! assert!((hit.distance - 5.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod import;
pub mod mesh;
pub mod ray;
pub mod scene;
pub mod spatial_index;
pub mod triangle;

pub use error::{MeshError, MeshResult};
pub use import::{load_mesh, parse_obj, parse_stl};
pub use mesh::Mesh;
pub use ray::{ray_triangle_intersection, ObjectId, OccluderQuery, RayHit};
pub use scene::OccluderScene;
pub use spatial_index::SpatialIndex;
pub use triangle::Triangle;
