//! # Channel Curves
//!
//! Each pair of endpoints is joined by a quadratic Bezier curve whose
//! control point is the tile center, sampled into a polyline.

use glam::DVec2;

use crate::error::CarveError;
use crate::layout::EndpointLayout;
use crate::matching::Matching;

/// Sampled curve between the two endpoints of one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCurve {
    /// Endpoint indices joined by the curve
    pub pair: (usize, usize),
    /// Samples from the first endpoint to the second
    pub points: Vec<DVec2>,
}

/// Samples `B(t) = (1-t)²·p0 + 2(1-t)t·control + t²·p1` at `samples`
/// evenly spaced parameters, both ends included.
///
/// Fewer than two samples still return both endpoints.
///
/// # Example
///
/// ```rust
/// use path_tiles::curve::quadratic_bezier;
/// use glam::DVec2;
///
/// let points = quadratic_bezier(DVec2::ZERO, DVec2::new(1.0, 2.0), DVec2::new(2.0, 0.0), 3);
/// assert_eq!(points, vec![DVec2::ZERO, DVec2::new(1.0, 1.0), DVec2::new(2.0, 0.0)]);
/// ```
pub fn quadratic_bezier(p0: DVec2, control: DVec2, p1: DVec2, samples: usize) -> Vec<DVec2> {
    let samples = samples.max(2);
    let last = (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let t = i as f64 / last;
            let u = 1.0 - t;
            u * u * p0 + 2.0 * u * t * control + t * t * p1
        })
        .collect()
}

/// Builds one curve per pair of `matching`.
pub fn build_curves(
    matching: &Matching,
    layout: &EndpointLayout,
    samples: usize,
) -> Result<Vec<ChannelCurve>, CarveError> {
    let center = layout.center();
    matching
        .pairs()
        .iter()
        .map(|&(a, b)| {
            let points = quadratic_bezier(layout.point(a)?, center, layout.point(b)?, samples);
            Ok(ChannelCurve { pair: (a, b), points })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoints_are_exact() {
        let p0 = DVec2::new(25.0, 100.0);
        let p1 = DVec2::new(100.0, 25.0);
        let points = quadratic_bezier(p0, DVec2::splat(50.0), p1, 64);
        assert_eq!(points.len(), 64);
        assert_eq!(points[0], p0);
        assert_eq!(points[63], p1);
    }

    #[test]
    fn test_midpoint() {
        // B(0.5) = p0/4 + control/2 + p1/4
        let points = quadratic_bezier(
            DVec2::new(25.0, 100.0),
            DVec2::splat(50.0),
            DVec2::new(75.0, 100.0),
            5,
        );
        assert_relative_eq!(points[2].x, 50.0);
        assert_relative_eq!(points[2].y, 75.0);
    }

    #[test]
    fn test_build_curves_follows_pairs() {
        let layout = EndpointLayout::new(100.0);
        let matching = Matching::new(vec![(0, 5), (1, 4), (2, 7), (3, 6)], 8).unwrap();
        let curves = build_curves(&matching, &layout, 16).unwrap();

        assert_eq!(curves.len(), 4);
        assert_eq!(curves[0].pair, (0, 5));
        // Bends toward the center, never past the left quarter line
        assert!(curves[0].points.iter().all(|p| p.x > 25.0 - 1e-9));
        assert_eq!(curves[2].points[0], layout.point(2).unwrap());
    }
}
