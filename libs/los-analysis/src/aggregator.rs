//! # Result Aggregator
//!
//! Turns the ordered result sequence into per-triangle categories and
//! exportable records.
//!
//! ## Per-triangle rule
//!
//! Samples on one triangle may disagree. The category of a triangle is the
//! category of its **last** result in generation order, exactly as if every
//! sample overwrote the triangle's material slot in turn.
//!
//! Results whose triangle index is no longer valid for the mesh are left out
//! of the category map but always kept in the record sequence.

use std::collections::BTreeMap;

use log::{debug, warn};
use los_mesh::Mesh;
use serde::{Deserialize, Serialize};

use crate::classifier::{AnalysisResult, Category, ResultRecord, VisibilityStatus};

/// Category per triangle index, for every triangle with at least one result.
///
/// Indices `>= triangle_count` are skipped with a warning.
pub fn triangle_categories(
    results: &[AnalysisResult],
    triangle_count: usize,
) -> BTreeMap<usize, Category> {
    let mut categories = BTreeMap::new();
    let mut stale = 0usize;

    for result in results {
        if result.triangle_index >= triangle_count {
            stale += 1;
            continue;
        }
        categories.insert(result.triangle_index, result.category());
    }

    if stale > 0 {
        warn!("Skipped {stale} results referencing triangles outside 0..{triangle_count}");
    }
    categories
}

/// Writes each triangle's category index into the mesh's material slots.
///
/// Returns the number of triangles assigned. Triangles without results keep
/// their current slot.
pub fn apply_categories(mesh: &mut Mesh, results: &[AnalysisResult]) -> usize {
    let categories = triangle_categories(results, mesh.triangle_count());
    for (&index, category) in &categories {
        mesh.set_triangle_material(index, category.index());
    }
    debug!("Assigned categories to {} triangles", categories.len());
    categories.len()
}

/// One record per result, in id order.
pub fn records(results: &[AnalysisResult]) -> Vec<ResultRecord> {
    results.iter().map(AnalysisResult::to_record).collect()
}

/// Counts of results per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySummary {
    pub total: usize,
    pub visible: usize,
    pub blocked: usize,
    pub outside_fov: usize,
    pub outside_range: usize,
}

impl VisibilitySummary {
    /// Tallies a result sequence.
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.record(result.status);
        }
        summary
    }

    fn record(&mut self, status: VisibilityStatus) {
        self.total += 1;
        match status {
            VisibilityStatus::Visible => self.visible += 1,
            VisibilityStatus::Blocked => self.blocked += 1,
            VisibilityStatus::OutsideFov => self.outside_fov += 1,
            VisibilityStatus::OutsideRange => self.outside_range += 1,
        }
    }

    /// Number of results in a reporting bucket.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Visible => self.visible,
            Category::Blocked => self.blocked,
            Category::Outside => self.outside_fov + self.outside_range,
        }
    }

    /// Share of visible results, `0.0` when empty.
    pub fn visible_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.visible as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn result(id: usize, triangle_index: usize, status: VisibilityStatus) -> AnalysisResult {
        AnalysisResult {
            id,
            triangle_index,
            position: DVec3::ZERO,
            distance: 1.0,
            status,
        }
    }

    fn two_triangles() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Y);
        mesh.add_vertex(DVec3::ONE);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(1, 3, 2);
        mesh
    }

    #[test]
    fn test_last_result_wins() {
        let results = [
            result(0, 0, VisibilityStatus::Visible),
            result(1, 0, VisibilityStatus::Blocked),
            result(2, 1, VisibilityStatus::Blocked),
            result(3, 1, VisibilityStatus::OutsideFov),
        ];
        let categories = triangle_categories(&results, 2);
        assert_eq!(categories[&0], Category::Blocked);
        assert_eq!(categories[&1], Category::Outside);
    }

    #[test]
    fn test_stale_index_skipped_but_record_kept() {
        let results = [
            result(0, 0, VisibilityStatus::Visible),
            result(1, 5, VisibilityStatus::Blocked),
        ];
        let categories = triangle_categories(&results, 2);
        assert_eq!(categories.len(), 1);
        assert!(!categories.contains_key(&5));

        let records = records(&results);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 1);
        assert_eq!(records[1].triangle_index, 5);
    }

    #[test]
    fn test_apply_categories_sets_material_slots() {
        let mut mesh = two_triangles();
        let results = [
            result(0, 1, VisibilityStatus::OutsideRange),
            result(1, 1, VisibilityStatus::Blocked),
            result(2, 9, VisibilityStatus::Visible),
        ];
        assert_eq!(apply_categories(&mut mesh, &results), 1);
        assert_eq!(mesh.triangle_material(1), Some(1));
        assert_eq!(mesh.triangle_material(0), Some(0));
    }

    #[test]
    fn test_summary_counts() {
        let results = [
            result(0, 0, VisibilityStatus::Visible),
            result(1, 0, VisibilityStatus::Visible),
            result(2, 0, VisibilityStatus::Blocked),
            result(3, 0, VisibilityStatus::OutsideFov),
            result(4, 0, VisibilityStatus::OutsideRange),
        ];
        let summary = VisibilitySummary::from_results(&results);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.count(Category::Visible), 2);
        assert_eq!(summary.count(Category::Outside), 2);
        assert!((summary.visible_fraction() - 0.4).abs() < 1e-12);
        assert_eq!(VisibilitySummary::default().visible_fraction(), 0.0);
    }
}
