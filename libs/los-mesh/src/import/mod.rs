//! # Mesh Import
//!
//! Loads triangulated meshes from STL (binary or ASCII) and Wavefront OBJ
//! files. Polygons with more than three corners are fan-triangulated, so
//! triangle indices follow the file's face order.

mod obj;
mod stl;

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

pub use obj::parse_obj;
pub use stl::parse_stl;

/// Loads a mesh from disk, choosing the parser by file extension.
///
/// # Errors
///
/// - [`MeshError::UnsupportedFormat`] for extensions other than `stl`/`obj`
/// - [`MeshError::Io`] when the file cannot be read
/// - parse and topology errors from the format parser
pub fn load_mesh(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mesh = match extension.as_str() {
        "stl" => parse_stl(&fs::read(path)?)?,
        "obj" => parse_obj(&fs::read_to_string(path)?)?,
        _ => return Err(MeshError::UnsupportedFormat { extension }),
    };

    mesh.validate_indices()?;
    info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let err = load_mesh("scene.blend").unwrap_err();
        match err {
            MeshError::UnsupportedFormat { extension } => assert_eq!(extension, "blend"),
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_mesh("/definitely/not/here/panel.obj").unwrap_err();
        assert!(matches!(err, MeshError::Io(_)));
    }
}
