//! # Plane for Boolean Operations
//!
//! Plane representation with point classification.

use config::constants::{EPSILON, PLANE_EPSILON};
use glam::DVec3;

// =============================================================================
// SIDE
// =============================================================================

/// Position of a point or polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Within [`PLANE_EPSILON`] of the plane.
    Coplanar,
    /// Positive side.
    Front,
    /// Negative side.
    Back,
    /// Vertices on both sides (polygons only).
    Spanning,
}

impl Side {
    /// Combines two sides the way polygon classification accumulates
    /// vertex classifications.
    pub fn combine(self, other: Side) -> Side {
        match (self, other) {
            (Side::Coplanar, s) | (s, Side::Coplanar) => s,
            (a, b) if a == b => a,
            _ => Side::Spanning,
        }
    }
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Creates a plane from a unit normal and distance from the origin.
    pub fn new(normal: DVec3, w: f64) -> Self {
        Self { normal, w }
    }

    /// Plane through three points, oriented by their counter-clockwise
    /// order. Returns `None` for (nearly) collinear points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let cross = (b - a).cross(c - a);
        if cross.length() < EPSILON {
            return None;
        }
        let normal = cross.normalize();
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Best-fit plane of a planar polygon (Newell's method).
    pub fn from_polygon(vertices: &[DVec3]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let origin = vertices[0];
        let mut normal = DVec3::ZERO;
        let mut centroid = DVec3::ZERO;
        for (i, &v) in vertices.iter().enumerate() {
            let next = vertices[(i + 1) % vertices.len()];
            normal += (v - origin).cross(next - origin);
            centroid += v;
        }
        if normal.length() < EPSILON {
            return None;
        }
        let normal = normal.normalize();
        centroid /= vertices.len() as f64;
        Some(Self {
            normal,
            w: normal.dot(centroid),
        })
    }

    /// Unit normal.
    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Distance from the origin along the normal.
    #[inline]
    pub fn w(&self) -> f64 {
        self.w
    }

    /// The same plane facing the other way.
    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from point to plane (positive in front).
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classifies a point relative to this plane.
    pub fn classify_point(&self, point: DVec3) -> Side {
        let dist = self.signed_distance(point);
        if dist > PLANE_EPSILON {
            Side::Front
        } else if dist < -PLANE_EPSILON {
            Side::Back
        } else {
            Side::Coplanar
        }
    }

    /// Classifies a set of points as a whole.
    pub fn classify_points(&self, points: &[DVec3]) -> Side {
        points
            .iter()
            .fold(Side::Coplanar, |side, &p| side.combine(self.classify_point(p)))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_from_points() {
        let plane = Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap();
        assert_eq!(plane.normal(), DVec3::Z);
        assert_eq!(plane.w(), 0.0);
    }

    #[test]
    fn test_plane_from_collinear_points() {
        assert!(Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn test_newell_matches_three_point_plane() {
        let quad = [
            DVec3::new(0.0, 0.0, 5.0),
            DVec3::new(2.0, 0.0, 5.0),
            DVec3::new(2.0, 2.0, 5.0),
            DVec3::new(0.0, 2.0, 5.0),
        ];
        let plane = Plane::from_polygon(&quad).unwrap();
        assert!((plane.normal() - DVec3::Z).length() < 1e-12);
        assert!((plane.w() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_plane_classify_point() {
        let plane = Plane::new(DVec3::Z, 0.0);

        assert_eq!(plane.classify_point(DVec3::new(0.0, 0.0, 1.0)), Side::Front);
        assert_eq!(plane.classify_point(DVec3::new(0.0, 0.0, -1.0)), Side::Back);
        assert_eq!(plane.classify_point(DVec3::new(1.0, 1.0, 0.0)), Side::Coplanar);
    }

    #[test]
    fn test_classify_points_spanning() {
        let plane = Plane::new(DVec3::Z, 0.0);
        let points = [DVec3::new(0.0, 0.0, 1.0), DVec3::ZERO, DVec3::new(1.0, 0.0, -1.0)];
        assert_eq!(plane.classify_points(&points), Side::Spanning);
        assert_eq!(plane.classify_points(&points[..2]), Side::Front);
    }

    #[test]
    fn test_plane_flip() {
        let flipped = Plane::new(DVec3::Z, 5.0).flipped();
        assert_eq!(flipped.normal(), -DVec3::Z);
        assert_eq!(flipped.w(), -5.0);
    }
}
