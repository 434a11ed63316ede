//! # Extrusion Operations
//!
//! Turns 2D footprints into closed prisms:
//! - **Polygon2D**: outer ring plus holes, convertible to and from `geo`
//! - **linear_extrude**: extrude a polygon along the Z axis

mod linear;

#[cfg(test)]
mod tests;

pub use linear::{linear_extrude, LinearExtrudeParams};

use config::constants::VERTEX_WELD_EPSILON;
use geo::{Coord, LineString};
use glam::DVec2;

/// A 2D polygon for extrusion operations.
///
/// Represents a closed 2D shape that can be extruded into 3D. Rings are
/// stored open (the first vertex is not repeated at the end).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Outer boundary vertices in counter-clockwise order
    pub outer: Vec<DVec2>,
    /// Optional holes (each in clockwise order)
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon2D {
    /// Creates a new polygon from outer boundary vertices.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tile_mesh::ops::extrude::Polygon2D;
    /// use glam::DVec2;
    ///
    /// let triangle = Polygon2D::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(4.0, 0.0),
    ///     DVec2::new(0.0, 3.0),
    /// ]);
    /// assert_eq!(triangle.area(), 6.0);
    /// ```
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Creates an axis-aligned rectangle.
    ///
    /// # Arguments
    ///
    /// * `size` - Width and height
    /// * `center` - If true, center at origin
    pub fn square(size: DVec2, center: bool) -> Self {
        let (x, y) = if center {
            (-size.x / 2.0, -size.y / 2.0)
        } else {
            (0.0, 0.0)
        };

        Self::new(vec![
            DVec2::new(x, y),
            DVec2::new(x + size.x, y),
            DVec2::new(x + size.x, y + size.y),
            DVec2::new(x, y + size.y),
        ])
    }

    /// Creates a regular polygon approximating a circle around `center`.
    pub fn circle(center: DVec2, radius: f64, segments: u32) -> Self {
        let vertices = (0..segments)
            .map(|i| {
                let angle = std::f64::consts::TAU * (i as f64) / (segments as f64);
                center + DVec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::new(vertices)
    }

    /// Returns the number of vertices in the outer boundary.
    pub fn vertex_count(&self) -> usize {
        self.outer.len()
    }

    /// Returns true if the polygon has holes.
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Iterates over the outer ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &[DVec2]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Enclosed area: outer ring minus holes, independent of winding.
    pub fn area(&self) -> f64 {
        let outer = ring_signed_area(&self.outer).abs();
        let holes: f64 = self.holes.iter().map(|h| ring_signed_area(h).abs()).sum();
        outer - holes
    }

    /// Translates the polygon by the given offset.
    pub fn translate(&mut self, offset: DVec2) {
        for vertex in &mut self.outer {
            *vertex += offset;
        }
        for hole in &mut self.holes {
            for vertex in hole {
                *vertex += offset;
            }
        }
    }

    /// Returns a copy ready for extrusion: repeated vertices removed, the
    /// outer ring counter-clockwise and every hole clockwise. Holes that
    /// collapse to fewer than three vertices are dropped.
    pub fn normalized(&self) -> Self {
        let mut outer = dedup_ring(&self.outer);
        if ring_signed_area(&outer) < 0.0 {
            outer.reverse();
        }

        let holes = self
            .holes
            .iter()
            .map(|hole| {
                let mut hole = dedup_ring(hole);
                if ring_signed_area(&hole) > 0.0 {
                    hole.reverse();
                }
                hole
            })
            .filter(|hole| hole.len() >= 3)
            .collect();

        Self { outer, holes }
    }

    /// Converts to a `geo` polygon (rings are closed by `geo`).
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(
            ring_to_line_string(&self.outer),
            self.holes.iter().map(|h| ring_to_line_string(h)).collect(),
        )
    }

    /// Converts from a `geo` polygon, dropping the closing vertex of each ring.
    pub fn from_geo(polygon: &geo::Polygon<f64>) -> Self {
        Self {
            outer: line_string_to_ring(polygon.exterior()),
            holes: polygon.interiors().iter().map(line_string_to_ring).collect(),
        }
    }
}

/// Shoelace area of an open ring (positive when counter-clockwise).
pub fn ring_signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.perp_dot(b)
        })
        .sum();
    twice * 0.5
}

/// Removes consecutive (and wrap-around) vertices closer than the weld grid.
fn dedup_ring(ring: &[DVec2]) -> Vec<DVec2> {
    let mut result: Vec<DVec2> = Vec::with_capacity(ring.len());
    for &v in ring {
        if result
            .last()
            .map_or(true, |last| last.distance(v) > VERTEX_WELD_EPSILON)
        {
            result.push(v);
        }
    }
    while result.len() > 1 {
        let (first, last) = (result[0], result[result.len() - 1]);
        if first.distance(last) > VERTEX_WELD_EPSILON {
            break;
        }
        result.pop();
    }
    result
}

fn ring_to_line_string(ring: &[DVec2]) -> LineString<f64> {
    LineString::new(ring.iter().map(|v| Coord { x: v.x, y: v.y }).collect())
}

fn line_string_to_ring(line: &LineString<f64>) -> Vec<DVec2> {
    let mut ring: Vec<DVec2> = line.coords().map(|c| DVec2::new(c.x, c.y)).collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}
