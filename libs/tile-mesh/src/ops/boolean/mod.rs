//! # Boolean Operations (CSG)
//!
//! Solid subtraction with two independent engines:
//!
//! - [`BooleanEngine::Bsp`]: BSP trees, after the csg.js algorithm by Evan
//!   Wallace. Difference is `~(~A | B)`:
//!   A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A);
//!   B.invert(); combine; invert.
//! - [`BooleanEngine::Classify`]: split-and-classify with a spatial index
//!   and ray-parity point classification (see [`classify`]).
//!
//! ## Example
//!
//! ```rust
//! use tile_mesh::ops::boolean::BooleanEngine;
//! use tile_mesh::primitives::create_cube;
//! use glam::DVec3;
//!
//! let slab = create_cube(DVec3::new(10.0, 10.0, 5.0), false).unwrap();
//! let mut pocket = create_cube(DVec3::new(2.0, 2.0, 3.0), false).unwrap();
//! pocket.translate(DVec3::new(4.0, 4.0, 2.0));
//!
//! let carved = BooleanEngine::Bsp.subtract(&slab, &[pocket]).unwrap();
//! assert!((carved.signed_volume() - 488.0).abs() < 1e-6);
//! ```

mod bsp;
pub mod classify;
mod plane;
mod polygon;


use crate::error::MeshError;
use crate::Mesh;
use bsp::BspNode;
use config::constants::MAX_TRIANGLES;
use polygon::{mesh_to_polygons, polygons_to_mesh};
use tracing::debug;

/// Available solid subtraction engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanEngine {
    /// BSP-tree CSG
    Bsp,
    /// Split-and-classify
    Classify,
}

impl BooleanEngine {
    /// Short lowercase name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            BooleanEngine::Bsp => "bsp",
            BooleanEngine::Classify => "classify",
        }
    }

    /// Computes `a - b`.
    pub fn difference(&self, a: &Mesh, b: &Mesh) -> Result<Mesh, MeshError> {
        match self {
            BooleanEngine::Bsp => difference(a, b),
            BooleanEngine::Classify => classify::difference(a, b),
        }
    }

    /// Subtracts every cutter from `base`.
    ///
    /// Cutters whose bounding boxes are pairwise disjoint are merged and
    /// subtracted in one pass; overlapping cutters are subtracted one
    /// after another.
    pub fn subtract(&self, base: &Mesh, cutters: &[Mesh]) -> Result<Mesh, MeshError> {
        let groups = group_disjoint(cutters);
        let mut result = base.clone();
        for (pass, group) in groups.iter().enumerate() {
            result = self.difference(&result, group)?;
            debug!(
                engine = self.name(),
                pass,
                triangles = result.triangle_count(),
                "subtracted cutter group"
            );
        }
        Ok(result)
    }
}

impl std::fmt::Display for BooleanEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute difference of two meshes (A - B) with BSP trees.
///
/// ## Parameters
///
/// - `a`: Base mesh
/// - `b`: Mesh to subtract
///
/// ## Returns
///
/// New mesh containing the difference. Output polygons do not share
/// vertices and may meet at T-junctions.
pub fn difference(a: &Mesh, b: &Mesh) -> Result<Mesh, MeshError> {
    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() {
        return Ok(Mesh::new());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut bsp_a = BspNode::new(polys_a);
    let mut bsp_b = BspNode::new(polys_b);

    bsp_a.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();

    let mut result_polys = bsp_a.all_polygons();
    result_polys.extend(bsp_b.all_polygons());

    // Inverting the combined set is a per-polygon flip
    for polygon in &mut result_polys {
        polygon.flip();
    }

    if result_polys.len() > MAX_TRIANGLES {
        return Err(MeshError::TooManyTriangles {
            count: result_polys.len(),
            max: MAX_TRIANGLES,
        });
    }

    Ok(polygons_to_mesh(&result_polys))
}

/// Partitions cutters into merged groups of pairwise disjoint bounding
/// boxes, keeping input order within each group.
fn group_disjoint(cutters: &[Mesh]) -> Vec<Mesh> {
    let mut groups: Vec<(Mesh, Vec<(glam::DVec3, glam::DVec3)>)> = Vec::new();

    for cutter in cutters.iter().filter(|c| !c.is_empty()) {
        let bounds = cutter.bounding_box();
        let slot = groups.iter_mut().find(|(_, boxes)| {
            boxes.iter().all(|&(min, max)| {
                bounds.1.cmplt(min).any() || bounds.0.cmpgt(max).any()
            })
        });
        match slot {
            Some((mesh, boxes)) => {
                mesh.merge(cutter);
                boxes.push(bounds);
            }
            None => groups.push((cutter.clone(), vec![bounds])),
        }
    }

    groups.into_iter().map(|(mesh, _)| mesh).collect()
}
