//! STL reader (binary and ASCII).
//!
//! Binary layout: 80-byte header, little-endian `u32` triangle count, then
//! 50 bytes per triangle (normal, three vertices as `f32` triples, 2-byte
//! attribute). Stored normals are ignored.

use config::constants::MAX_TRIANGLES;
use glam::DVec3;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Parses STL bytes, detecting binary vs ASCII from the size field.
pub fn parse_stl(bytes: &[u8]) -> MeshResult<Mesh> {
    if is_binary(bytes) {
        parse_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| MeshError::parse(0, format!("STL is neither binary nor UTF-8: {e}")))?;
        parse_ascii(text)
    }
}

/// A binary file's size is fully determined by its triangle count; ASCII
/// files that happen to start with "solid" fail this check.
fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = read_u32(bytes, HEADER_LEN) as usize;
    count
        .checked_mul(RECORD_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        == Some(bytes.len())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn read_vec3(bytes: &[u8], offset: usize) -> DVec3 {
    let component = |i: usize| f32::from_bits(read_u32(bytes, offset + i * 4)) as f64;
    DVec3::new(component(0), component(1), component(2))
}

fn parse_binary(bytes: &[u8]) -> MeshResult<Mesh> {
    let count = read_u32(bytes, HEADER_LEN) as usize;
    if count > MAX_TRIANGLES {
        return Err(MeshError::TooManyTriangles {
            count,
            max: MAX_TRIANGLES,
        });
    }

    let mut mesh = Mesh::with_capacity(count * 3, count);
    for i in 0..count {
        // Skip the 12-byte facet normal
        let base = HEADER_LEN + 4 + i * RECORD_LEN + 12;
        let a = mesh.add_vertex(read_vec3(bytes, base));
        let b = mesh.add_vertex(read_vec3(bytes, base + 12));
        let c = mesh.add_vertex(read_vec3(bytes, base + 24));
        mesh.add_triangle(a, b, c);
    }
    Ok(mesh)
}

fn parse_ascii(text: &str) -> MeshResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut facet: Vec<u32> = Vec::with_capacity(3);

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("vertex") => {
                let coords: Vec<f64> = tokens
                    .map(|t| t.parse::<f64>())
                    .collect::<Result<_, _>>()
                    .map_err(|e| MeshError::parse(line_no, format!("bad vertex: {e}")))?;
                if coords.len() != 3 {
                    return Err(MeshError::parse(line_no, "vertex needs 3 coordinates"));
                }
                facet.push(mesh.add_vertex(DVec3::new(coords[0], coords[1], coords[2])));
            }
            Some("endloop") => {
                if facet.len() < 3 {
                    return Err(MeshError::parse(line_no, "facet with fewer than 3 vertices"));
                }
                for k in 1..facet.len() - 1 {
                    mesh.add_triangle(facet[0], facet[k], facet[k + 1]);
                }
                facet.clear();
            }
            _ => {}
        }
    }

    if mesh.triangle_count() > MAX_TRIANGLES {
        return Err(MeshError::TooManyTriangles {
            count: mesh.triangle_count(),
            max: MAX_TRIANGLES,
        });
    }
    Ok(mesh)
}
