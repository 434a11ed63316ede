//! # Endpoint Layout
//!
//! Fixed positions of the eight connection points on the top face: the
//! quarter marks of each edge, clockwise from the left quarter mark of the
//! top edge.
//!
//! ```text
//!        0       1
//!   +----*-------*----+  y = s
//!   |                 |
//! 7 *                 * 2
//!   |                 |
//! 6 *                 * 3
//!   |                 |
//!   +----*-------*----+  y = 0
//!        5       4
//! ```

use config::constants::ENDPOINT_COUNT;
use glam::DVec2;

use crate::error::CarveError;

/// Coordinates of every endpoint for one tile size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointLayout {
    tile_size: f64,
    points: [DVec2; ENDPOINT_COUNT],
}

impl EndpointLayout {
    /// Computes the layout for a tile of edge length `tile_size`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use path_tiles::layout::EndpointLayout;
    /// use glam::DVec2;
    ///
    /// let layout = EndpointLayout::new(100.0);
    /// assert_eq!(layout.point(2).unwrap(), DVec2::new(100.0, 75.0));
    /// assert_eq!(layout.center(), DVec2::splat(50.0));
    /// ```
    pub fn new(tile_size: f64) -> Self {
        let s = tile_size;
        let q = s / 4.0;
        Self {
            tile_size,
            points: [
                DVec2::new(q, s),
                DVec2::new(3.0 * q, s),
                DVec2::new(s, 3.0 * q),
                DVec2::new(s, q),
                DVec2::new(3.0 * q, 0.0),
                DVec2::new(q, 0.0),
                DVec2::new(0.0, q),
                DVec2::new(0.0, 3.0 * q),
            ],
        }
    }

    /// Coordinate of endpoint `index`.
    pub fn point(&self, index: usize) -> Result<DVec2, CarveError> {
        self.points.get(index).copied().ok_or_else(|| {
            CarveError::invalid_input(format!(
                "endpoint index {index} out of range 0..{ENDPOINT_COUNT}"
            ))
        })
    }

    /// All endpoints in index order.
    pub fn points(&self) -> &[DVec2; ENDPOINT_COUNT] {
        &self.points
    }

    /// Center of the top face.
    pub fn center(&self) -> DVec2 {
        DVec2::splat(self.tile_size / 2.0)
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_table() {
        let layout = EndpointLayout::new(100.0);
        let expected = [
            (25.0, 100.0),
            (75.0, 100.0),
            (100.0, 75.0),
            (100.0, 25.0),
            (75.0, 0.0),
            (25.0, 0.0),
            (0.0, 25.0),
            (0.0, 75.0),
        ];
        for (index, (x, y)) in expected.into_iter().enumerate() {
            assert_eq!(layout.point(index).unwrap(), DVec2::new(x, y), "endpoint {index}");
        }
    }

    #[test]
    fn test_points_lie_on_boundary() {
        let layout = EndpointLayout::new(40.0);
        for p in layout.points() {
            let on_edge = p.x == 0.0 || p.x == 40.0 || p.y == 0.0 || p.y == 40.0;
            assert!(on_edge, "{p:?}");
        }
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(EndpointLayout::new(100.0).point(8).is_err());
    }
}
