//! Wavefront OBJ reader.
//!
//! Only geometry is read: `v` positions and `f` faces. Face corners may use
//! the `v`, `v/vt`, `v//vn` or `v/vt/vn` forms; negative indices count back
//! from the most recent vertex. Everything else is ignored.

use config::constants::MAX_TRIANGLES;
use glam::DVec3;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// Parses OBJ source text into a mesh.
pub fn parse_obj(source: &str) -> MeshResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut corners: Vec<u32> = Vec::new();

    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.split('#').next().unwrap_or_default();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(|t| t.parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| MeshError::parse(line_no, format!("bad vertex: {e}")))?;
                if coords.len() != 3 {
                    return Err(MeshError::parse(line_no, "vertex needs 3 coordinates"));
                }
                mesh.add_vertex(DVec3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                corners.clear();
                for token in tokens {
                    corners.push(resolve_index(token, mesh.vertex_count(), line_no)?);
                }
                if corners.len() < 3 {
                    return Err(MeshError::parse(line_no, "face with fewer than 3 corners"));
                }
                for k in 1..corners.len() - 1 {
                    mesh.add_triangle(corners[0], corners[k], corners[k + 1]);
                }
                if mesh.triangle_count() > MAX_TRIANGLES {
                    return Err(MeshError::TooManyTriangles {
                        count: mesh.triangle_count(),
                        max: MAX_TRIANGLES,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Converts a 1-based (or negative, relative) OBJ index to a 0-based one.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> MeshResult<u32> {
    let position = token.split('/').next().unwrap_or_default();
    let raw: i64 = position
        .parse()
        .map_err(|e| MeshError::parse(line_no, format!("bad face index {token:?}: {e}")))?;

    let resolved = match raw {
        0 => None,
        n if n > 0 => Some(n - 1),
        n => Some(vertex_count as i64 + n),
    };

    match resolved {
        Some(i) if (0..vertex_count as i64).contains(&i) => Ok(i as u32),
        _ => Err(MeshError::parse(
            line_no,
            format!("face index {raw} out of range (have {vertex_count} vertices)"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_and_quad() {
        let source = "# panel
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1/1 2/2 3/3 4/4
";
        let mesh = parse_obj(source).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        // one triangle + quad fanned into two
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.triangles()[2], [0, 2, 3]);
    }

    #[test]
    fn test_normals_and_negative_indices() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf -3//1 -2//1 -1//1\n";
        let mesh = parse_obj(source).unwrap();
        assert_eq!(mesh.triangles()[0], [0, 1, 2]);
    }

    #[test]
    fn test_index_out_of_range() {
        let err = parse_obj("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_zero_index_rejected() {
        assert!(parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").is_err());
    }

    #[test]
    fn test_bad_vertex() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 1, .. }));
    }
}
