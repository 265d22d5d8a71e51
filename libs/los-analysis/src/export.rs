//! # Export
//!
//! Writers for analysis output:
//!
//! - per-sample results table (CSV)
//! - per-triangle categories (CSV)
//! - target mesh with per-face category colors (ASCII PLY)
//! - summary counts (JSON)
//!
//! The `write_*` functions stream into any [`Write`]. The `save_*` helpers
//! render the whole output in memory and only then create the file, so a
//! failure never leaves a partial result file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use config::constants::{COLOR_BLOCKED, COLOR_OUTSIDE, COLOR_VISIBLE};
use log::info;
use los_mesh::Mesh;

use crate::aggregator::VisibilitySummary;
use crate::classifier::{AnalysisResult, Category};
use crate::error::Result;

/// Header row of the results table.
pub const RESULTS_CSV_HEADER: &str = "id,triangle_index,x,y,z,distance_m,status,category_index";

/// Header row of the triangle categories table.
pub const CATEGORIES_CSV_HEADER: &str = "triangle_index,category_index,material";

/// Writes one row per result in id order.
pub fn write_results_csv<W: Write>(mut writer: W, results: &[AnalysisResult]) -> Result<()> {
    writeln!(writer, "{RESULTS_CSV_HEADER}")?;
    for record in results.iter().map(AnalysisResult::to_record) {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            record.id,
            record.triangle_index,
            record.x,
            record.y,
            record.z,
            record.distance_m,
            record.status,
            record.category_index
        )?;
    }
    Ok(())
}

/// Writes one row per sampled triangle, ordered by triangle index.
pub fn write_triangle_categories_csv<W: Write>(
    mut writer: W,
    categories: &BTreeMap<usize, Category>,
) -> Result<()> {
    writeln!(writer, "{CATEGORIES_CSV_HEADER}")?;
    for (index, category) in categories {
        writeln!(
            writer,
            "{index},{},{}",
            category.index(),
            category.material_name()
        )?;
    }
    Ok(())
}

/// RGBA colors used for each category when coloring a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryPalette {
    pub visible: [f32; 4],
    pub blocked: [f32; 4],
    pub outside: [f32; 4],
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self {
            visible: COLOR_VISIBLE,
            blocked: COLOR_BLOCKED,
            outside: COLOR_OUTSIDE,
        }
    }
}

impl CategoryPalette {
    /// RGBA color of a category.
    pub fn color(&self, category: Category) -> [f32; 4] {
        match category {
            Category::Visible => self.visible,
            Category::Blocked => self.blocked,
            Category::Outside => self.outside,
        }
    }

    /// 8-bit RGB of a category, alpha dropped.
    pub fn rgb8(&self, category: Category) -> [u8; 3] {
        let [r, g, b, _] = self.color(category);
        [to_u8(r), to_u8(g), to_u8(b)]
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Writes `mesh` as ASCII PLY with one color per face.
///
/// Faces without a category get the "outside" color.
pub fn write_colored_ply<W: Write>(
    mut writer: W,
    mesh: &Mesh,
    categories: &BTreeMap<usize, Category>,
    palette: &CategoryPalette,
) -> Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment line-of-sight visibility categories")?;
    writeln!(writer, "element vertex {}", mesh.vertex_count())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", mesh.triangle_count())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "end_header")?;

    for v in mesh.vertices() {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for (index, [a, b, c]) in mesh.triangles().iter().enumerate() {
        let category = categories.get(&index).copied().unwrap_or(Category::Outside);
        let [r, g, bl] = palette.rgb8(category);
        writeln!(writer, "3 {a} {b} {c} {r} {g} {bl}")?;
    }
    Ok(())
}

/// Writes the summary as pretty-printed JSON.
pub fn write_summary_json<W: Write>(mut writer: W, summary: &VisibilitySummary) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

// =============================================================================
// FILE HELPERS
// =============================================================================

fn save_rendered(path: &Path, render: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> Result<()> {
    let mut buffer = Vec::new();
    render(&mut buffer)?;
    fs::write(path, &buffer)?;
    info!("Wrote {} ({} bytes)", path.display(), buffer.len());
    Ok(())
}

/// Saves the results table to `path`.
pub fn save_results_csv(path: impl AsRef<Path>, results: &[AnalysisResult]) -> Result<()> {
    save_rendered(path.as_ref(), |buf| write_results_csv(buf, results))
}

/// Saves the triangle categories table to `path`.
pub fn save_triangle_categories_csv(
    path: impl AsRef<Path>,
    categories: &BTreeMap<usize, Category>,
) -> Result<()> {
    save_rendered(path.as_ref(), |buf| {
        write_triangle_categories_csv(buf, categories)
    })
}

/// Saves the colored mesh to `path`.
pub fn save_colored_ply(
    path: impl AsRef<Path>,
    mesh: &Mesh,
    categories: &BTreeMap<usize, Category>,
    palette: &CategoryPalette,
) -> Result<()> {
    save_rendered(path.as_ref(), |buf| {
        write_colored_ply(buf, mesh, categories, palette)
    })
}

/// Saves the summary JSON to `path`.
pub fn save_summary_json(path: impl AsRef<Path>, summary: &VisibilitySummary) -> Result<()> {
    save_rendered(path.as_ref(), |buf| write_summary_json(buf, summary))
}
