//! # Linear Extrusion
//!
//! Extrudes a 2D polygon (with holes) along the Z axis into a closed,
//! outward-oriented prism.
//!
//! Both caps are triangulated over the ring vertices, so every edge of
//! the result is shared by exactly two triangles.

use super::Polygon2D;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::triangulate::Triangulator;
use glam::DVec3;

/// Parameters for linear extrusion.
#[derive(Debug, Clone)]
pub struct LinearExtrudeParams {
    /// Extrusion height along Z axis
    pub height: f64,
    /// Center the extrusion around Z=0
    pub center: bool,
    /// Backend used for the two caps
    pub triangulator: Triangulator,
}

impl Default for LinearExtrudeParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            center: false,
            triangulator: Triangulator::Earcut,
        }
    }
}

/// Extrudes a 2D polygon along the Z axis.
///
/// The polygon is normalized first (outer ring counter-clockwise, holes
/// clockwise, repeated vertices removed).
///
/// # Errors
///
/// - [`MeshError::DegenerateGeometry`] for a non-positive height or a
///   polygon without area
/// - [`MeshError::Triangulation`] if the caps cannot be triangulated
///
/// # Example
///
/// ```rust
/// use tile_mesh::ops::extrude::{linear_extrude, LinearExtrudeParams, Polygon2D};
/// use glam::DVec2;
///
/// let square = Polygon2D::square(DVec2::splat(10.0), true);
/// let params = LinearExtrudeParams { height: 3.0, ..Default::default() };
/// let prism = linear_extrude(&square, &params).unwrap();
/// assert!((prism.signed_volume() - 300.0).abs() < 1e-9);
/// ```
pub fn linear_extrude(polygon: &Polygon2D, params: &LinearExtrudeParams) -> Result<Mesh, MeshError> {
    if !(params.height > 0.0) || !params.height.is_finite() {
        return Err(MeshError::degenerate(format!(
            "extrusion height must be positive, got {}",
            params.height
        )));
    }

    let polygon = polygon.normalized();
    if polygon.vertex_count() < 3 || polygon.area() <= config::constants::MIN_AREA {
        return Err(MeshError::degenerate("polygon has no area"));
    }

    let cap = params.triangulator.triangulate(&polygon)?;

    let z_bottom = if params.center { -params.height / 2.0 } else { 0.0 };
    let z_top = z_bottom + params.height;

    let n: usize = polygon.rings().map(<[_]>::len).sum();
    let mut mesh = Mesh::with_capacity(2 * n, 2 * n + 2 * cap.len());

    // Bottom ring vertices [0, n), top ring vertices [n, 2n)
    for z in [z_bottom, z_top] {
        for v in polygon.rings().flatten() {
            mesh.add_vertex(DVec3::new(v.x, v.y, z));
        }
    }

    // Side walls; with CCW outers and CW holes the solid is to the left of
    // every edge, so (b_i, b_j, t_j) faces outward
    let top = n as u32;
    let mut start = 0u32;
    for ring in polygon.rings() {
        let len = ring.len() as u32;
        for k in 0..len {
            let i = start + k;
            let j = start + (k + 1) % len;
            mesh.add_triangle(i, j, top + j);
            mesh.add_triangle(i, top + j, top + i);
        }
        start += len;
    }

    for [a, b, c] in cap {
        let (a, b, c) = (a as u32, b as u32, c as u32);
        mesh.add_triangle(a, c, b);
        mesh.add_triangle(top + a, top + b, top + c);
    }

    Ok(mesh)
}
