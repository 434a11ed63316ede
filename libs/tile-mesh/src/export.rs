//! # STL Export
//!
//! Binary STL encoding of a [`Mesh`]:
//! - 80-byte header (arbitrary text, zero padded)
//! - u32 triangle count (little-endian)
//! - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes

use std::io::Write;
use std::path::Path;

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::STL_HEADER_LEN;

/// Size of one triangle record in bytes.
const TRIANGLE_RECORD_LEN: usize = 50;

/// Encodes a mesh as binary STL.
///
/// # Errors
///
/// [`MeshError::ValidationFailed`] for an empty mesh or out-of-range
/// indices.
///
/// # Example
///
/// ```rust
/// use tile_mesh::export::to_binary_stl;
/// use tile_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let cube = create_cube(DVec3::ONE, false).unwrap();
/// let bytes = to_binary_stl(&cube, "cube").unwrap();
/// assert_eq!(bytes.len(), 84 + 50 * 12);
/// ```
pub fn to_binary_stl(mesh: &Mesh, name: &str) -> Result<Vec<u8>, MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::validation_failed("mesh has no triangles"));
    }
    let vertex_count = mesh.vertex_count();
    if let Some(bad) = mesh
        .triangles()
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(MeshError::validation_failed(format!(
            "index {bad} out of range (vertex count = {vertex_count})"
        )));
    }

    let tri_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(STL_HEADER_LEN + 4 + tri_count * TRIANGLE_RECORD_LEN);

    let header = format!("binary STL: {name}");
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(STL_HEADER_LEN)]);
    buf.resize(STL_HEADER_LEN, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for i in 0..tri_count {
        let normal = mesh.face_normal(i).as_vec3();
        for component in normal.to_array() {
            buf.extend_from_slice(&component.to_le_bytes());
        }
        for vertex in mesh.triangle_positions(i) {
            for component in vertex.as_vec3().to_array() {
                buf.extend_from_slice(&component.to_le_bytes());
            }
        }
        // Attribute byte count (unused)
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Writes a mesh as binary STL to `path`, replacing any existing file.
pub fn write_binary_stl(mesh: &Mesh, path: &Path) -> Result<(), MeshError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let bytes = to_binary_stl(mesh, name)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}
