//! # Visibility Classifier
//!
//! Classifies each sample point against range, field of view and occlusion.
//!
//! ## Precedence
//!
//! ```text
//! distance > max_distance ──► OUTSIDE_RANGE
//!         │
//! angle outside FOV ────────► OUTSIDE_FOV
//!         │
//! ray hits an occluder ─────► BLOCKED
//!         │
//!         ▼
//!      VISIBLE
//! ```
//!
//! The first failing check wins and later checks are never evaluated. The
//! distance is computed once per sample and reused by every check.

use std::fmt;

use config::constants::{
    CATEGORY_MATERIAL_NAMES, COLOR_BLOCKED, COLOR_OUTSIDE, COLOR_VISIBLE, EPSILON,
};
use config::AnalysisSettings;
use glam::DVec3;
use los_mesh::{ObjectId, OccluderQuery};
use serde::{Deserialize, Serialize};

use crate::observer::Observer;
use crate::sampler::SamplePoint;

// =============================================================================
// STATUS AND CATEGORY
// =============================================================================

/// Outcome of classifying one sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityStatus {
    /// In range, in view and unobstructed
    Visible,
    /// In range and in view, but an occluder lies on the line of sight
    Blocked,
    /// In range, but outside the field of view
    OutsideFov,
    /// Farther than the maximum distance
    OutsideRange,
}

impl VisibilityStatus {
    /// Name used in exported records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "VISIBLE",
            Self::Blocked => "BLOCKED",
            Self::OutsideFov => "OUTSIDE_FOV",
            Self::OutsideRange => "OUTSIDE_RANGE",
        }
    }

    /// Reporting bucket for this status.
    pub fn category(&self) -> Category {
        match self {
            Self::Visible => Category::Visible,
            Self::Blocked => Category::Blocked,
            Self::OutsideFov | Self::OutsideRange => Category::Outside,
        }
    }
}

impl fmt::Display for VisibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting bucket; both "outside" statuses collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Visible = 0,
    Blocked = 1,
    Outside = 2,
}

impl Category {
    /// Small-integer index used in records and as a material slot.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Material name assigned to faces of this category.
    pub fn material_name(self) -> &'static str {
        CATEGORY_MATERIAL_NAMES[self as usize]
    }

    /// Default RGBA color of this category.
    pub fn color(self) -> [f32; 4] {
        match self {
            Self::Visible => COLOR_VISIBLE,
            Self::Blocked => COLOR_BLOCKED,
            Self::Outside => COLOR_OUTSIDE,
        }
    }
}

impl From<VisibilityStatus> for Category {
    fn from(status: VisibilityStatus) -> Self {
        status.category()
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Classification of a single sample point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    /// Sequence number in sample generation order
    pub id: usize,
    /// Triangle of the target mesh the sample was drawn from
    pub triangle_index: usize,
    /// Sample position in world space
    pub position: DVec3,
    /// Euclidean distance from the observer
    pub distance: f64,
    /// Classification outcome
    pub status: VisibilityStatus,
}

impl AnalysisResult {
    /// Reporting bucket derived from the status.
    #[inline]
    pub fn category(&self) -> Category {
        self.status.category()
    }

    /// Category as a small integer.
    #[inline]
    pub fn category_index(&self) -> u32 {
        self.category().index()
    }

    /// Flat, serializable form of this result.
    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            id: self.id,
            triangle_index: self.triangle_index,
            x: self.position.x,
            y: self.position.y,
            z: self.position.z,
            distance_m: self.distance,
            status: self.status,
            category_index: self.category_index(),
        }
    }
}

/// Exported row. Field order and names are kept stable for re-import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Sample id in processing order
    pub id: usize,
    /// Target triangle the sample was drawn from
    pub triangle_index: usize,
    /// World-space x
    pub x: f64,
    /// World-space y
    pub y: f64,
    /// World-space z
    pub z: f64,
    /// Observer-to-sample distance in meters
    pub distance_m: f64,
    /// Classification outcome
    pub status: VisibilityStatus,
    /// 0 visible, 1 blocked, 2 outside
    pub category_index: u32,
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Classifies sample points for one observer against one occluder query.
///
/// The classifier holds only shared references, so it is `Sync` whenever
/// the query is.
pub struct Classifier<'a, Q: ?Sized> {
    observer: &'a Observer,
    query: &'a Q,
    max_distance: f64,
    ray_epsilon: f64,
    target: Option<ObjectId>,
}

impl<'a, Q: OccluderQuery + ?Sized> Classifier<'a, Q> {
    /// Creates a classifier using range and ray shortening from `settings`.
    pub fn new(observer: &'a Observer, settings: &AnalysisSettings, query: &'a Q) -> Self {
        Self {
            observer,
            query,
            max_distance: settings.max_distance,
            ray_epsilon: settings.ray_epsilon,
            target: None,
        }
    }

    /// Marks the object id of the target surface inside the query.
    ///
    /// Hits on the target are never counted as obstructions.
    pub fn with_target(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }

    /// Classifies one sample.
    pub fn classify(&self, id: usize, sample: &SamplePoint) -> AnalysisResult {
        let direction = sample.position - self.observer.position();
        let distance = direction.length();

        AnalysisResult {
            id,
            triangle_index: sample.triangle_index,
            position: sample.position,
            distance,
            status: self.status(direction, distance),
        }
    }

    fn status(&self, direction: DVec3, distance: f64) -> VisibilityStatus {
        if distance > self.max_distance {
            return VisibilityStatus::OutsideRange;
        }
        // Sample coincides with the observer
        if distance < EPSILON {
            return VisibilityStatus::Visible;
        }

        let direction = direction / distance;
        if !self.observer.in_field_of_view(direction) {
            return VisibilityStatus::OutsideFov;
        }

        if self.is_occluded(direction, distance) {
            VisibilityStatus::Blocked
        } else {
            VisibilityStatus::Visible
        }
    }

    fn is_occluded(&self, direction: DVec3, distance: f64) -> bool {
        let length = distance - self.ray_epsilon;
        if length <= 0.0 {
            return false;
        }

        let origin = self.observer.position();
        let hit = match self.target {
            Some(target) => self
                .query
                .cast_ray_excluding(origin, direction, length, target),
            None => self.query.cast_ray(origin, direction, length),
        };
        hit.is_some_and(|hit| Some(hit.object) != self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use los_mesh::RayHit;
    use std::cell::Cell;

    /// Query that records every cast and answers with a fixed hit.
    struct CountingQuery {
        casts: Cell<usize>,
        last_length: Cell<f64>,
        hit: Option<RayHit>,
    }

    impl CountingQuery {
        fn new(hit: Option<RayHit>) -> Self {
            Self {
                casts: Cell::new(0),
                last_length: Cell::new(0.0),
                hit,
            }
        }
    }

    impl OccluderQuery for CountingQuery {
        fn cast_ray(&self, _: DVec3, _: DVec3, max_distance: f64) -> Option<RayHit> {
            self.casts.set(self.casts.get() + 1);
            self.last_length.set(max_distance);
            self.hit
        }
    }

    fn wall_hit(object: u32) -> Option<RayHit> {
        Some(RayHit {
            distance: 5.0,
            object: ObjectId(object),
            triangle: 0,
        })
    }

    fn observer() -> Observer {
        Observer::new(DVec3::ZERO, DVec3::NEG_Z)
            .unwrap()
            .with_fov_degrees(110.0, 90.0)
            .unwrap()
    }

    fn sample(x: f64, y: f64, z: f64) -> SamplePoint {
        SamplePoint {
            position: DVec3::new(x, y, z),
            triangle_index: 3,
        }
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(VisibilityStatus::Visible.category().index(), 0);
        assert_eq!(VisibilityStatus::Blocked.category().index(), 1);
        assert_eq!(VisibilityStatus::OutsideFov.category().index(), 2);
        assert_eq!(VisibilityStatus::OutsideRange.category().index(), 2);
        assert_eq!(Category::Outside.material_name(), "FUERA_CAMPO");
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&VisibilityStatus::OutsideFov).unwrap();
        assert_eq!(json, "\"OUTSIDE_FOV\"");
        assert_eq!(VisibilityStatus::OutsideRange.to_string(), "OUTSIDE_RANGE");
    }

    #[test]
    fn test_visible_with_shortened_ray() {
        let observer = observer();
        let query = CountingQuery::new(None);
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query);

        let result = classifier.classify(0, &sample(0.0, 0.0, -10.0));
        assert_eq!(result.status, VisibilityStatus::Visible);
        assert_eq!(result.category_index(), 0);
        assert_relative_eq!(result.distance, 10.0, epsilon = 1e-12);
        assert_eq!(query.casts.get(), 1);
        assert_relative_eq!(query.last_length.get(), 9.99, epsilon = 1e-12);
    }

    #[test]
    fn test_blocked_by_other_object() {
        let observer = observer();
        let query = CountingQuery::new(wall_hit(1));
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query)
            .with_target(ObjectId(0));

        let result = classifier.classify(4, &sample(0.0, 0.0, -10.0));
        assert_eq!(result.status, VisibilityStatus::Blocked);
        assert_eq!(result.category_index(), 1);
        assert_eq!(result.id, 4);
        assert_eq!(result.triangle_index, 3);
    }

    #[test]
    fn test_hit_on_target_is_not_an_obstruction() {
        let observer = observer();
        let query = CountingQuery::new(wall_hit(0));
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query)
            .with_target(ObjectId(0));

        let result = classifier.classify(0, &sample(0.0, 0.0, -10.0));
        assert_eq!(result.status, VisibilityStatus::Visible);
    }

    #[test]
    fn test_out_of_range_skips_later_checks() {
        let observer = observer();
        let query = CountingQuery::new(wall_hit(1));
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query);

        // Also behind the observer: range still wins
        for point in [sample(0.0, 0.0, -60.0), sample(0.0, 0.0, 60.0)] {
            let result = classifier.classify(0, &point);
            assert_eq!(result.status, VisibilityStatus::OutsideRange);
            assert_eq!(result.category_index(), 2);
        }
        assert_eq!(query.casts.get(), 0);
    }

    #[test]
    fn test_outside_fov_never_casts() {
        let observer = observer();
        let query = CountingQuery::new(wall_hit(1));
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query);

        let result = classifier.classify(0, &sample(40.0, 0.0, -5.0));
        assert_eq!(result.status, VisibilityStatus::OutsideFov);
        assert_eq!(result.category_index(), 2);
        assert_eq!(query.casts.get(), 0);
    }

    #[test]
    fn test_range_boundary() {
        let observer = observer();
        let query = CountingQuery::new(None);
        let settings = AnalysisSettings::default().with_max_distance(20.0).unwrap();
        let classifier = Classifier::new(&observer, &settings, &query);

        let beyond = classifier.classify(0, &sample(0.0, 0.0, -(20.0 + 1e-6)));
        let within = classifier.classify(1, &sample(0.0, 0.0, -(20.0 - 1e-6)));
        assert_eq!(beyond.status, VisibilityStatus::OutsideRange);
        assert_eq!(within.status, VisibilityStatus::Visible);
    }

    #[test]
    fn test_coincident_sample_is_visible() {
        let observer = observer();
        let query = CountingQuery::new(wall_hit(1));
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query);

        let result = classifier.classify(0, &sample(0.0, 0.0, 0.0));
        assert_eq!(result.status, VisibilityStatus::Visible);
        assert_eq!(result.distance, 0.0);
        assert_eq!(query.casts.get(), 0);
    }

    #[test]
    fn test_sample_inside_ray_epsilon_is_visible() {
        let observer = observer();
        let query = CountingQuery::new(wall_hit(1));
        let classifier = Classifier::new(&observer, &AnalysisSettings::default(), &query);

        let result = classifier.classify(0, &sample(0.0, 0.0, -0.005));
        assert_eq!(result.status, VisibilityStatus::Visible);
        assert_eq!(query.casts.get(), 0);
    }

    #[test]
    fn test_record_fields() {
        let result = AnalysisResult {
            id: 7,
            triangle_index: 2,
            position: DVec3::new(1.0, 2.0, 3.0),
            distance: 3.5,
            status: VisibilityStatus::Blocked,
        };
        let record = result.to_record();
        assert_eq!(record.id, 7);
        assert_eq!((record.x, record.y, record.z), (1.0, 2.0, 3.0));
        assert_eq!(record.distance_m, 3.5);
        assert_eq!(record.category_index, 1);
    }
}
