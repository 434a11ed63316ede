//! # Polygon for Boolean Operations
//!
//! Convex planar polygon with splitting support. Fragments produced by a
//! split keep the plane of the polygon they came from.

use super::plane::{Plane, Side};
use crate::mesh::Mesh;
use glam::DVec3;

// =============================================================================
// POLYGON
// =============================================================================

/// A convex polygon with its supporting plane.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in counter-clockwise order seen from the front.
    vertices: Vec<DVec3>,
    /// Plane containing this polygon.
    plane: Plane,
}

/// Outputs of [`Polygon::split`].
#[derive(Debug, Default)]
pub struct SplitResult {
    /// Coplanar, facing the same way as the splitting plane
    pub coplanar_front: Vec<Polygon>,
    /// Coplanar, facing the opposite way
    pub coplanar_back: Vec<Polygon>,
    /// Strictly in front
    pub front: Vec<Polygon>,
    /// Strictly behind
    pub back: Vec<Polygon>,
}

impl Polygon {
    /// Creates a polygon from vertices, computing its plane.
    ///
    /// Returns `None` if the vertices do not span a plane.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        let plane = Plane::from_polygon(&vertices)?;
        Some(Self { vertices, plane })
    }

    /// Creates a polygon whose plane is already known.
    pub fn with_plane(vertices: Vec<DVec3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    /// Polygon vertices.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Vertex average; an interior point of a convex polygon.
    pub fn centroid(&self) -> DVec3 {
        self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
    }

    /// Reverses winding and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flipped();
    }

    /// Classifies this polygon relative to a plane.
    pub fn classify(&self, plane: &Plane) -> Side {
        plane.classify_points(&self.vertices)
    }

    /// Splits the polygon by a plane into the four output lists.
    pub fn split(self, plane: &Plane, out: &mut SplitResult) {
        let sides: Vec<Side> = self
            .vertices
            .iter()
            .map(|&v| plane.classify_point(v))
            .collect();
        let side = sides.iter().fold(Side::Coplanar, |acc, &s| acc.combine(s));

        match side {
            Side::Coplanar => {
                if self.plane.normal().dot(plane.normal()) > 0.0 {
                    out.coplanar_front.push(self);
                } else {
                    out.coplanar_back.push(self);
                }
            }
            Side::Front => out.front.push(self),
            Side::Back => out.back.push(self),
            Side::Spanning => {
                let (front, back) = self.split_spanning(plane, &sides);
                out.front.extend(front);
                out.back.extend(back);
            }
        }
    }

    /// Splits a polygon known to span `plane`, returning the front and back
    /// pieces (either may be missing if it degenerates).
    pub fn split_spanning(&self, plane: &Plane, sides: &[Side]) -> (Option<Polygon>, Option<Polygon>) {
        let n = self.vertices.len();
        let mut front_verts = Vec::with_capacity(n + 1);
        let mut back_verts = Vec::with_capacity(n + 1);

        for i in 0..n {
            let j = (i + 1) % n;
            let (vi, vj) = (self.vertices[i], self.vertices[j]);
            let (si, sj) = (sides[i], sides[j]);

            if si != Side::Back {
                front_verts.push(vi);
            }
            if si != Side::Front {
                back_verts.push(vi);
            }

            if si.combine(sj) == Side::Spanning {
                let di = plane.signed_distance(vi);
                let dj = plane.signed_distance(vj);
                let t = di / (di - dj);
                let cut = vi.lerp(vj, t);
                front_verts.push(cut);
                back_verts.push(cut);
            }
        }

        let build = |verts: Vec<DVec3>| {
            (verts.len() >= 3).then(|| Polygon::with_plane(verts, self.plane))
        };
        (build(front_verts), build(back_verts))
    }
}

/// Converts every triangle of a mesh into a polygon, skipping degenerate
/// ones.
pub fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    (0..mesh.triangle_count())
        .filter_map(|i| {
            let [a, b, c] = mesh.triangle_positions(i);
            let plane = Plane::from_points(a, b, c)?;
            Some(Polygon::with_plane(vec![a, b, c], plane))
        })
        .collect()
}

/// Fan-triangulates convex polygons into a mesh.
pub fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let triangle_count: usize = polygons.iter().map(|p| p.vertices.len() - 2).sum();
    let vertex_count: usize = polygons.iter().map(|p| p.vertices.len()).sum();
    let mut mesh = Mesh::with_capacity(vertex_count, triangle_count);

    for polygon in polygons {
        let base = mesh.vertex_count() as u32;
        for &v in &polygon.vertices {
            mesh.add_vertex(v);
        }
        for i in 1..polygon.vertices.len() as u32 - 1 {
            mesh.add_triangle(base, base + i, base + i + 1);
        }
    }

    mesh.remove_degenerate_triangles();
    mesh
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_polygon_flip() {
        let mut poly = unit_square();
        poly.flip();
        assert_eq!(poly.vertices()[0], DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(poly.plane().normal(), -DVec3::Z);
    }

    #[test]
    fn test_split_spanning_square() {
        let plane = Plane::new(DVec3::X, 0.25);
        let mut out = SplitResult::default();
        unit_square().split(&plane, &mut out);

        assert_eq!(out.front.len(), 1);
        assert_eq!(out.back.len(), 1);
        let back_max_x = out.back[0]
            .vertices()
            .iter()
            .map(|v| v.x)
            .fold(f64::MIN, f64::max);
        assert!((back_max_x - 0.25).abs() < 1e-12);
        // Fragments keep the parent plane
        assert_eq!(out.front[0].plane().normal(), DVec3::Z);
    }

    #[test]
    fn test_split_coplanar_by_direction() {
        let mut out = SplitResult::default();
        unit_square().split(&Plane::new(DVec3::Z, 0.0), &mut out);
        unit_square().split(&Plane::new(-DVec3::Z, 0.0), &mut out);
        assert_eq!(out.coplanar_front.len(), 1);
        assert_eq!(out.coplanar_back.len(), 1);
    }

    #[test]
    fn test_split_touching_vertex_stays_whole() {
        // Plane passes through one edge only
        let mut out = SplitResult::default();
        unit_square().split(&Plane::new(DVec3::X, 0.0), &mut out);
        assert_eq!(out.front.len(), 1);
        assert!(out.back.is_empty());
    }

    #[test]
    fn test_polygons_to_mesh_fans() {
        let mesh = polygons_to_mesh(&[unit_square()]);
        assert_eq!(mesh.triangle_count(), 2);
        assert!((mesh.net_area_vector().z - 1.0).abs() < 1e-12);
    }
}
