//! # Polygon Triangulation
//!
//! Triangulates a [`Polygon2D`] with holes into triangles over its own
//! vertices, so caps of an extrusion can share vertices with its walls.
//!
//! Two backends are available, both from `geo`:
//! - **Earcut**: ear clipping (`TriangulateEarcut`)
//! - **Delaunay**: constrained Delaunay triangulation (`TriangulateSpade`)
//!
//! ## Example
//!
//! ```rust
//! use tile_mesh::ops::extrude::Polygon2D;
//! use tile_mesh::ops::triangulate::Triangulator;
//! use glam::DVec2;
//!
//! let square = Polygon2D::square(DVec2::splat(2.0), false);
//! let triangles = Triangulator::Earcut.triangulate(&square).unwrap();
//! assert_eq!(triangles.len(), 2);
//! ```

use std::collections::HashMap;

use crate::error::MeshError;
use crate::ops::extrude::Polygon2D;
use config::constants::MIN_AREA;
use geo::algorithm::triangulate_spade::SpadeTriangulationConfig;
use geo::{TriangulateEarcut, TriangulateSpade, Triangle};
use glam::DVec2;

/// Relative mismatch allowed between the polygon area and the summed
/// triangle area.
const AREA_TOLERANCE: f64 = 1e-6;

/// Available triangulation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Triangulator {
    /// Ear clipping
    Earcut,
    /// Constrained Delaunay triangulation
    Delaunay,
}

impl Triangulator {
    /// Every backend, in preference order.
    pub const ALL: [Triangulator; 2] = [Triangulator::Earcut, Triangulator::Delaunay];

    /// Short lowercase name used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Triangulator::Earcut => "earcut",
            Triangulator::Delaunay => "delaunay",
        }
    }

    /// Triangulates a polygon.
    ///
    /// Returns triangles as indices into the polygon's vertices, numbered
    /// through the outer ring first and then each hole in order. Every
    /// triangle is counter-clockwise.
    ///
    /// # Errors
    ///
    /// [`MeshError::Triangulation`] if the backend fails, introduces
    /// vertices that are not on the polygon, or does not cover its area.
    pub fn triangulate(&self, polygon: &Polygon2D) -> Result<Vec<[usize; 3]>, MeshError> {
        let vertices: Vec<DVec2> = polygon.rings().flatten().copied().collect();
        if polygon.outer.len() < 3 {
            return Err(MeshError::triangulation(format!(
                "outer ring has {} vertices",
                polygon.outer.len()
            )));
        }

        let mut lookup: HashMap<(u64, u64), usize> = HashMap::with_capacity(vertices.len());
        for (index, v) in vertices.iter().enumerate() {
            if lookup.insert(coord_key(v.x, v.y), index).is_some() {
                return Err(MeshError::triangulation(format!(
                    "vertex ({}, {}) appears twice",
                    v.x, v.y
                )));
            }
        }

        let geo_polygon = polygon.to_geo();
        let raw: Vec<Triangle<f64>> = match self {
            Triangulator::Earcut => geo_polygon.earcut_triangles(),
            Triangulator::Delaunay => geo_polygon
                .constrained_triangulation(SpadeTriangulationConfig::default())
                .map_err(|e| MeshError::triangulation(format!("{e:?}")))?,
        };

        let mut triangles = Vec::with_capacity(raw.len());
        let mut covered = 0.0;
        for triangle in raw {
            let mut indices = [0usize; 3];
            for (slot, coord) in indices.iter_mut().zip(triangle.to_array()) {
                *slot = *lookup.get(&coord_key(coord.x, coord.y)).ok_or_else(|| {
                    MeshError::triangulation(format!(
                        "{} introduced vertex ({}, {})",
                        self.name(),
                        coord.x,
                        coord.y
                    ))
                })?;
            }

            let [a, b, c] = indices.map(|i| vertices[i]);
            let doubled = (b - a).perp_dot(c - a);
            if doubled.abs() * 0.5 <= MIN_AREA {
                continue;
            }
            if doubled < 0.0 {
                indices.swap(1, 2);
            }
            covered += doubled.abs() * 0.5;
            triangles.push(indices);
        }

        let expected = polygon.area();
        if triangles.is_empty() || (covered - expected).abs() > AREA_TOLERANCE * expected.max(1.0) {
            return Err(MeshError::triangulation(format!(
                "{} covered area {covered} of {expected}",
                self.name()
            )));
        }

        Ok(triangles)
    }
}

impl std::fmt::Display for Triangulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Triangulator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earcut" => Ok(Triangulator::Earcut),
            "delaunay" | "spade" => Ok(Triangulator::Delaunay),
            other => Err(format!("unknown triangulator '{other}'")),
        }
    }
}

/// Hash key for an exact coordinate; `-0.0` and `0.0` share a key.
fn coord_key(x: f64, y: f64) -> (u64, u64) {
    ((x + 0.0).to_bits(), (y + 0.0).to_bits())
}
