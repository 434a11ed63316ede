//! # Channel Footprints
//!
//! 2D silhouettes of the grooves. A polyline is buffered by the path
//! radius with round caps and joins, computed as the union of one capsule
//! per segment (a rectangle with a half disc on each end). All per-pair
//! buffers are then merged into one footprint, which may have several
//! disjoint parts and holes.
//!
//! Unions use `geo`'s `BooleanOps`, reduced pairwise so that each step
//! joins shapes of similar size.

use std::f64::consts::PI;

use config::constants::{arc_fragments, clamp_arc_segments, MIN_AREA, VERTEX_WELD_EPSILON};
use geo::{Area, BooleanOps, MultiPolygon, Polygon};
use glam::DVec2;
use tile_mesh::Polygon2D;
use tracing::{debug, warn};

use crate::curve::ChannelCurve;
use crate::error::CarveError;

/// Merged channel footprint of one tile.
#[derive(Debug, Clone)]
pub struct ChannelFootprint {
    /// Union of every successfully buffered curve
    pub shape: MultiPolygon<f64>,
    /// Pairs whose buffer failed and were left out
    pub skipped: Vec<(usize, usize)>,
}

impl ChannelFootprint {
    /// True when no channel survived.
    pub fn is_empty(&self) -> bool {
        self.shape.unsigned_area() <= MIN_AREA
    }

    /// Parts of the footprint ready for extrusion, dropping slivers.
    pub fn polygons(&self) -> Vec<Polygon2D> {
        self.shape
            .iter()
            .map(Polygon2D::from_geo)
            .map(|p| p.normalized())
            .filter(|p| p.outer.len() >= 3 && p.area() > MIN_AREA)
            .collect()
    }
}

/// Buffers every curve and merges the results.
///
/// A curve whose buffer fails is logged and skipped; the returned
/// footprint records it.
pub fn build_footprint(curves: &[ChannelCurve], radius: f64, arc_segments: u32) -> ChannelFootprint {
    let mut parts = Vec::with_capacity(curves.len());
    let mut skipped = Vec::new();

    for curve in curves {
        match buffer_polyline(&curve.points, radius, arc_segments) {
            Ok(shape) => parts.push(shape),
            Err(err) => {
                warn!(pair = ?curve.pair, error = %err, "skipping channel footprint");
                skipped.push(curve.pair);
            }
        }
    }

    let shape = union_all(parts);
    debug!(
        parts = shape.0.len(),
        area = shape.unsigned_area(),
        skipped = skipped.len(),
        "merged channel footprint"
    );
    ChannelFootprint { shape, skipped }
}

/// Buffers a polyline by `radius` with round caps and joins.
///
/// Repeated consecutive points are ignored; a polyline that collapses to a
/// single point buffers to a disc.
///
/// # Errors
///
/// [`CarveError::GeometryConstruction`] for an empty polyline, non-finite
/// coordinates, a non-positive radius, or a buffer without area.
///
/// # Example
///
/// ```rust
/// use path_tiles::footprint::buffer_polyline;
/// use geo::Area;
/// use glam::DVec2;
///
/// let shape = buffer_polyline(&[DVec2::ZERO, DVec2::new(10.0, 0.0)], 1.0, 64).unwrap();
/// // 10 x 2 rectangle plus a unit disc
/// assert!((shape.unsigned_area() - (20.0 + std::f64::consts::PI)).abs() < 0.01);
/// ```
pub fn buffer_polyline(
    points: &[DVec2],
    radius: f64,
    arc_segments: u32,
) -> Result<MultiPolygon<f64>, CarveError> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(CarveError::geometry(format!("buffer radius {radius} is not positive")));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(CarveError::geometry("polyline has non-finite coordinates"));
    }

    let mut samples: Vec<DVec2> = Vec::with_capacity(points.len());
    for &p in points {
        if samples.last().map_or(true, |&last| last.distance(p) > VERTEX_WELD_EPSILON) {
            samples.push(p);
        }
    }

    let pieces: Vec<MultiPolygon<f64>> = match samples.as_slice() {
        [] => return Err(CarveError::geometry("polyline has no points")),
        [only] => vec![MultiPolygon::new(vec![disc(*only, radius, arc_segments)])],
        _ => samples
            .windows(2)
            .map(|w| MultiPolygon::new(vec![capsule(w[0], w[1], radius, arc_segments)]))
            .collect(),
    };

    let shape = union_all(pieces);
    if shape.unsigned_area() <= MIN_AREA {
        return Err(CarveError::geometry("buffered polyline has no area"));
    }
    Ok(shape)
}

/// Regular polygon approximating a disc, counter-clockwise.
pub fn disc(center: DVec2, radius: f64, arc_segments: u32) -> Polygon<f64> {
    Polygon2D::circle(center, radius, clamp_arc_segments(arc_segments)).to_geo()
}

/// Stadium around the segment `a`-`b`: the segment swept by a disc of
/// `radius`, counter-clockwise.
pub fn capsule(a: DVec2, b: DVec2, radius: f64, arc_segments: u32) -> Polygon<f64> {
    let axis = b - a;
    if axis.length() <= VERTEX_WELD_EPSILON {
        return disc(a, radius, arc_segments);
    }

    let heading = axis.y.atan2(axis.x);
    let fragments = arc_fragments(arc_segments, PI);
    let mut ring = Vec::with_capacity(2 * (fragments as usize + 1));

    // Half disc around `b` from its right side to its left side, then the
    // half disc around `a` back to the right side
    for (center, start) in [(b, heading - PI / 2.0), (a, heading + PI / 2.0)] {
        for k in 0..=fragments {
            let angle = start + PI * (k as f64) / (fragments as f64);
            ring.push(center + radius * DVec2::new(angle.cos(), angle.sin()));
        }
    }

    Polygon2D::new(ring).to_geo()
}

/// Unions shapes pairwise until one remains.
pub fn union_all(mut parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while parts.len() > 1 {
        parts = parts
            .chunks(2)
            .map(|chunk| match chunk {
                [a, b] => a.union(b),
                _ => chunk[0].clone(),
            })
            .collect();
    }
    parts.pop().unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::build_curves;
    use crate::layout::EndpointLayout;
    use crate::matching::Matching;
    use approx::assert_relative_eq;

    /// Area of a regular n-gon inscribed in a circle of radius `r`.
    fn ngon_area(n: u32, r: f64) -> f64 {
        0.5 * n as f64 * r * r * (std::f64::consts::TAU / n as f64).sin()
    }

    #[test]
    fn test_capsule_area() {
        let shape = capsule(DVec2::ZERO, DVec2::new(10.0, 0.0), 2.0, 32);
        assert_relative_eq!(shape.unsigned_area(), 40.0 + ngon_area(32, 2.0), epsilon = 1e-9);
        assert!(shape.signed_area() > 0.0);
    }

    #[test]
    fn test_single_point_becomes_disc() {
        let points = [DVec2::new(3.0, 4.0); 5];
        let shape = buffer_polyline(&points, 1.5, 24).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert_relative_eq!(shape.unsigned_area(), ngon_area(24, 1.5), epsilon = 1e-6);
    }

    #[test]
    fn test_bent_polyline_is_one_part() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
        ];
        let shape = buffer_polyline(&points, 1.0, 32).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert!(shape.0[0].interiors().is_empty());
        // Two 10 x 2 strips overlapping in a quarter-round corner
        assert!(shape.unsigned_area() > 40.0 && shape.unsigned_area() < 40.0 + PI);
    }

    #[test]
    fn test_invalid_buffers() {
        assert!(buffer_polyline(&[], 1.0, 32).is_err());
        assert!(buffer_polyline(&[DVec2::ZERO, DVec2::X], 0.0, 32).is_err());
        assert!(buffer_polyline(&[DVec2::ZERO, DVec2::new(f64::NAN, 0.0)], 1.0, 32).is_err());
    }

    #[test]
    fn test_overlapping_curves_merge() {
        let layout = EndpointLayout::new(100.0);
        // Both diagonals cross at the center
        let matching = Matching::new(vec![(0, 4), (1, 5), (2, 6), (3, 7)], 8).unwrap();
        let curves = build_curves(&matching, &layout, 16).unwrap();

        let footprint = build_footprint(&curves, 2.0, 16);
        assert!(footprint.skipped.is_empty());
        assert_eq!(footprint.shape.0.len(), 1);

        let separate: f64 = curves
            .iter()
            .map(|c| buffer_polyline(&c.points, 2.0, 16).unwrap().unsigned_area())
            .sum();
        assert!(footprint.shape.unsigned_area() < separate);
        assert_eq!(footprint.polygons().len(), 1);
    }

    #[test]
    fn test_disjoint_curves_stay_separate() {
        let layout = EndpointLayout::new(100.0);
        // Each pair hugs one corner
        let matching = Matching::new(vec![(0, 7), (1, 2), (3, 4), (5, 6)], 8).unwrap();
        let curves = build_curves(&matching, &layout, 16).unwrap();

        let footprint = build_footprint(&curves, 2.0, 16);
        assert_eq!(footprint.shape.0.len(), 4);
        assert!(!footprint.is_empty());
    }

    #[test]
    fn test_empty_union() {
        let footprint = ChannelFootprint {
            shape: union_all(Vec::new()),
            skipped: vec![(0, 1)],
        };
        assert!(footprint.is_empty());
        assert!(footprint.polygons().is_empty());
    }
}
