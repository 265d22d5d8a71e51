//! # Analysis Pipeline
//!
//! Runs the whole batch: precondition checks, seeded sampling,
//! classification and aggregation.
//!
//! ```text
//! Mesh ──► sample (StdRng) ──► classify (sequential | rayon) ──► AnalysisReport
//! ```
//!
//! Parallel classification needs an `OccluderQuery + Sync`; the sequential
//! path accepts any query. Both produce results in the same order.

use std::collections::BTreeMap;

use config::constants::DEFAULT_SEED;
use config::AnalysisSettings;
use log::{debug, info};
use los_mesh::{Mesh, ObjectId, OccluderQuery, OccluderScene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregator::{self, VisibilitySummary};
use crate::classifier::{AnalysisResult, Category, Classifier};
use crate::error::{AnalysisError, Result};
use crate::observer::Observer;
use crate::sampler::{expected_sample_count, sample_surface, SamplePoint};

/// How samples are dispatched to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Rayon work-stealing over samples
    Parallel,
}

/// Output of a complete analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    /// One result per sample, in generation order
    pub results: Vec<AnalysisResult>,
    /// Last-write-wins category per sampled triangle
    pub triangle_categories: BTreeMap<usize, Category>,
    /// Counts per status
    pub summary: VisibilitySummary,
}

impl AnalysisReport {
    /// Aggregates results classified against a mesh with `triangle_count`
    /// triangles.
    pub fn from_results(results: Vec<AnalysisResult>, triangle_count: usize) -> Self {
        Self {
            triangle_categories: aggregator::triangle_categories(&results, triangle_count),
            summary: VisibilitySummary::from_results(&results),
            results,
        }
    }
}

/// A configured visibility analysis.
///
/// # Example
///
/// ```rust
/// use config::AnalysisSettings;
/// use glam::DVec3;
/// use los_analysis::{Observer, VisibilityAnalysis, VisibilityStatus};
/// use los_mesh::{Mesh, OccluderScene};
///
/// let mut panel = Mesh::new();
/// panel.add_vertex(DVec3::new(-1.0, -1.0, -10.0));
/// panel.add_vertex(DVec3::new(1.0, -1.0, -10.0));
/// panel.add_vertex(DVec3::new(0.0, 1.0, -10.0));
/// panel.add_triangle(0, 1, 2);
///
/// let observer = Observer::new(DVec3::ZERO, DVec3::NEG_Z).unwrap();
/// let settings = AnalysisSettings::default().with_point_spacing(0.25).unwrap();
/// let analysis = VisibilityAnalysis::new(observer, settings).with_seed(1);
///
/// let report = analysis.run(&panel, &OccluderScene::new()).unwrap();
/// assert_eq!(report.results.len(), 32);
/// assert!(report.results.iter().all(|r| r.status == VisibilityStatus::Visible));
/// ```
#[derive(Debug, Clone)]
pub struct VisibilityAnalysis {
    observer: Observer,
    settings: AnalysisSettings,
    seed: u64,
    target: Option<ObjectId>,
}

impl VisibilityAnalysis {
    /// Creates an analysis seeded with [`DEFAULT_SEED`].
    pub fn new(observer: Observer, settings: AnalysisSettings) -> Self {
        Self {
            observer,
            settings,
            seed: DEFAULT_SEED,
            target: None,
        }
    }

    /// Sets the seed of the sampling generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Names the target's object id in the occluder query, so rays ignore it.
    pub fn with_target(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }

    /// Viewpoint the samples are classified from.
    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Spacing, range and limits of this run.
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Seed of the sampling generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Checks preconditions and samples the target surface.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::EmptyTarget`] when the mesh has no triangles
    /// - [`AnalysisError::Mesh`] when triangles reference missing vertices
    /// - [`AnalysisError::TooManySamples`] when the spacing would exceed the
    ///   configured sample limit
    pub fn sample(&self, mesh: &Mesh) -> Result<Vec<SamplePoint>> {
        if mesh.is_empty() {
            return Err(AnalysisError::EmptyTarget);
        }
        mesh.validate_indices()?;

        let spacing = self.settings.point_spacing;
        let count = expected_sample_count(mesh, spacing);
        if count > self.settings.max_samples {
            return Err(AnalysisError::TooManySamples {
                count,
                max: self.settings.max_samples,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok(sample_surface(mesh, spacing, &mut rng))
    }

    /// Runs the analysis, classifying samples one after another.
    pub fn run<Q: OccluderQuery + ?Sized>(&self, mesh: &Mesh, query: &Q) -> Result<AnalysisReport> {
        let samples = self.sample(mesh)?;
        let classifier = self.classifier(query);

        let results = samples
            .iter()
            .enumerate()
            .map(|(id, sample)| classifier.classify(id, sample))
            .collect();

        Ok(self.finish(results, mesh))
    }

    /// Runs the analysis, classifying samples on the rayon thread pool.
    pub fn run_parallel<Q: OccluderQuery + Sync + ?Sized>(
        &self,
        mesh: &Mesh,
        query: &Q,
    ) -> Result<AnalysisReport> {
        let samples = self.sample(mesh)?;
        let classifier = self.classifier(query);

        let results = samples
            .par_iter()
            .enumerate()
            .map(|(id, sample)| classifier.classify(id, sample))
            .collect();

        Ok(self.finish(results, mesh))
    }

    /// Runs the analysis in the given mode.
    pub fn run_with_mode<Q: OccluderQuery + Sync + ?Sized>(
        &self,
        mesh: &Mesh,
        query: &Q,
        mode: ExecutionMode,
    ) -> Result<AnalysisReport> {
        match mode {
            ExecutionMode::Sequential => self.run(mesh, query),
            ExecutionMode::Parallel => self.run_parallel(mesh, query),
        }
    }

    /// Runs the analysis on an object registered in `scene`.
    ///
    /// The target mesh is taken from the scene and excluded from its own
    /// occlusion rays.
    pub fn run_scene(
        &self,
        scene: &OccluderScene,
        target_name: &str,
        mode: ExecutionMode,
    ) -> Result<AnalysisReport> {
        let not_found = || AnalysisError::TargetNotFound {
            name: target_name.to_string(),
        };
        let id = scene.object_id(target_name).ok_or_else(not_found)?;
        let mesh = scene.object_mesh(id).ok_or_else(not_found)?;

        debug!("Target '{target_name}' is object {id} in a scene of {} objects", scene.len());
        self.clone().with_target(id).run_with_mode(mesh, scene, mode)
    }

    fn classifier<'a, Q: OccluderQuery + ?Sized>(&'a self, query: &'a Q) -> Classifier<'a, Q> {
        let classifier = Classifier::new(&self.observer, &self.settings, query);
        match self.target {
            Some(target) => classifier.with_target(target),
            None => classifier,
        }
    }

    fn finish(&self, results: Vec<AnalysisResult>, mesh: &Mesh) -> AnalysisReport {
        let report = AnalysisReport::from_results(results, mesh.triangle_count());
        let summary = &report.summary;
        info!(
            "Classified {} samples: {} visible, {} blocked, {} outside FOV, {} out of range ({:.1}% visible)",
            summary.total,
            summary.visible,
            summary.blocked,
            summary.outside_fov,
            summary.outside_range,
            summary.visible_fraction() * 100.0
        );
        report
    }
}
