//! # Cube Primitive
//!
//! Generates the rectangular slab that tiles are carved from.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;

/// Corner indices of each face, counter-clockwise seen from outside.
const FACES: [[u32; 4]; 6] = [
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
    [0, 1, 5, 4], // -Y
    [3, 2, 6, 7], // +Y
    [2, 0, 4, 6], // -X
    [1, 3, 7, 5], // +X
];

/// Creates a rectangular box mesh.
///
/// # Arguments
///
/// * `size` - Dimensions [x, y, z]
/// * `center` - If true, center at origin; if false, corner at origin
///
/// # Returns
///
/// A closed mesh with 8 vertices and 12 outward-facing triangles.
///
/// # Example
///
/// ```rust
/// use tile_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let slab = create_cube(DVec3::new(100.0, 100.0, 5.0), false).unwrap();
/// assert_eq!(slab.vertex_count(), 8);
/// assert_eq!(slab.triangle_count(), 12);
/// ```
pub fn create_cube(size: DVec3, center: bool) -> Result<Mesh, MeshError> {
    if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) || !size.is_finite() {
        return Err(MeshError::degenerate(format!(
            "Box size must be positive: {size:?}"
        )));
    }

    let (min, max) = if center {
        (-size / 2.0, size / 2.0)
    } else {
        (DVec3::ZERO, size)
    };

    let mut mesh = Mesh::with_capacity(8, 12);
    // Corner `i` takes max.x when bit 0 is set, max.y for bit 1, max.z for bit 2
    for i in 0..8u32 {
        mesh.add_vertex(DVec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        ));
    }
    for [a, b, c, d] in FACES {
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
    }

    Ok(mesh)
}
