//! # LOS Analysis
//!
//! Line-of-sight visibility of a target surface from a fixed observer.
//!
//! ## Architecture
//!
//! ```text
//! Mesh ──► sampler ──► classifier ──► aggregator ──► export
//!             │            │
//!          StdRng    OccluderQuery (los-mesh)
//! ```
//!
//! - [`sampler`]: area-proportional barycentric sampling
//! - [`classifier`]: range, field-of-view and occlusion checks, in that order
//! - [`aggregator`]: per-triangle categories (last result wins), records, summary
//! - [`analysis`]: precondition checks and the sequential or parallel batch
//! - [`export`]: CSV, PLY and JSON writers
//!
//! ## Usage
//!
//! ```rust
//! use config::AnalysisSettings;
//! use glam::DVec3;
//! use los_analysis::{ExecutionMode, Observer, VisibilityAnalysis};
//! use los_mesh::{Mesh, OccluderScene};
//!
//! fn quad(z: f64, half: f64) -> Mesh {
//!     let mut mesh = Mesh::new();
//!     mesh.add_vertex(DVec3::new(-half, -half, z));
//!     mesh.add_vertex(DVec3::new(half, -half, z));
//!     mesh.add_vertex(DVec3::new(half, half, z));
//!     mesh.add_vertex(DVec3::new(-half, half, z));
//!     mesh.add_triangle(0, 1, 2);
//!     mesh.add_triangle(0, 2, 3);
//!     mesh
//! }
//!
//! let mut scene = OccluderScene::new();
//! scene.add_object("Target_Panel", quad(-10.0, 1.0)).unwrap();
//! scene.add_object("Wall", quad(-5.0, 10.0)).unwrap();
//!
//! let observer = Observer::new(DVec3::ZERO, DVec3::NEG_Z).unwrap();
//! let settings = AnalysisSettings::default().with_point_spacing(0.25).unwrap();
//! let report = VisibilityAnalysis::new(observer, settings)
//!     .run_scene(&scene, "Target_Panel", ExecutionMode::Sequential)
//!     .unwrap();
//!
//! assert_eq!(report.summary.blocked, report.summary.total);
//! ```

pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod error;
pub mod export;
pub mod observer;
pub mod sampler;

pub use aggregator::{apply_categories, triangle_categories, VisibilitySummary};
pub use analysis::{AnalysisReport, ExecutionMode, VisibilityAnalysis};
pub use classifier::{AnalysisResult, Category, Classifier, ResultRecord, VisibilityStatus};
pub use error::{AnalysisError, Result};
pub use export::CategoryPalette;
pub use observer::{FovMode, Observer};
pub use sampler::{sample_surface, SamplePoint};
