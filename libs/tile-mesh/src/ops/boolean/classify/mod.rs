//! # Split-and-Classify Difference
//!
//! Boolean subtraction without a BSP tree:
//!
//! 1. **Spatial indexing**: grid index over the triangles of both solids
//! 2. **Splitting**: each triangle is cut by the planes of the triangles of
//!    the other solid that cross it, so no fragment straddles the other
//!    surface
//! 3. **Classification**: each fragment is tested with a probe point
//!    offset from its centroid along its normal and ray parity
//! 4. **Selection**: A fragments whose material side lies outside B are
//!    kept; B fragments with A material on both sides are kept, flipped
//!
//! Probing the side of a fragment instead of the fragment itself makes
//! coplanar faces resolve consistently: a cutter flush with the top face
//! opens the top, and a cutter flush with a side face opens the side.

mod spatial_index;

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::{CLASSIFY_PROBE_OFFSET, EPSILON, MAX_TRIANGLES, PLANE_EPSILON};
use glam::DVec3;
use tracing::trace;

use super::plane::{Plane, Side};
use super::polygon::{polygons_to_mesh, Polygon};

pub use spatial_index::SpatialIndex;

/// Skewed ray directions for parity tests; majority vote over three rays
/// hides the occasional ray that grazes an edge.
const RAY_DIRECTIONS: [DVec3; 3] = [
    DVec3::new(0.947_813, 0.296_382, 0.117_505),
    DVec3::new(-0.198_227, 0.938_414, 0.282_946),
    DVec3::new(0.331_042, -0.134_149, 0.934_032),
];

/// Whether a point lies inside a closed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Inside the solid
    Inside,
    /// Outside the solid
    Outside,
}

/// A closed mesh prepared for fragment splitting and point queries.
struct IndexedSolid<'a> {
    mesh: &'a Mesh,
    index: SpatialIndex,
    planes: Vec<Option<Plane>>,
}

impl<'a> IndexedSolid<'a> {
    fn new(mesh: &'a Mesh) -> Self {
        let planes = (0..mesh.triangle_count())
            .map(|i| {
                let [a, b, c] = mesh.triangle_positions(i);
                Plane::from_points(a, b, c)
            })
            .collect();
        Self {
            mesh,
            index: SpatialIndex::from_mesh(mesh),
            planes,
        }
    }

    /// Ray-parity containment with a majority vote over skewed rays.
    fn containment(&self, point: DVec3) -> Containment {
        if !self.index.contains_point(point, EPSILON) {
            return Containment::Outside;
        }

        let inside_votes = RAY_DIRECTIONS
            .iter()
            .filter(|&&dir| self.ray_crossings(point, dir.normalize()) % 2 == 1)
            .count();

        if inside_votes * 2 > RAY_DIRECTIONS.len() {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }

    fn ray_crossings(&self, origin: DVec3, direction: DVec3) -> usize {
        self.index
            .query_ray(origin, direction)
            .into_iter()
            .filter(|&i| {
                let [v0, v1, v2] = self.mesh.triangle_positions(i);
                ray_triangle_intersection(origin, direction, v0, v1, v2)
                    .is_some_and(|t| t > EPSILON)
            })
            .count()
    }

    /// Splits triangle `index` of `other` by every plane of this solid that
    /// crosses it.
    fn split_triangle(&self, other: &Mesh, index: usize) -> Vec<Polygon> {
        let corners = other.triangle_positions(index);
        let Some(own_plane) = Plane::from_points(corners[0], corners[1], corners[2]) else {
            return Vec::new();
        };

        let margin = DVec3::splat(PLANE_EPSILON);
        let min = corners[0].min(corners[1]).min(corners[2]) - margin;
        let max = corners[0].max(corners[1]).max(corners[2]) + margin;

        let mut fragments = vec![Polygon::with_plane(corners.to_vec(), own_plane)];
        for candidate in self.index.query_box(min, max) {
            let Some(cutting) = self.planes[candidate] else {
                continue;
            };
            let cutter = self.mesh.triangle_positions(candidate);
            let [c0, c1, c2] = cutter;
            if !boxes_overlap(min, max, c0.min(c1).min(c2), c0.max(c1).max(c2)) {
                continue;
            }
            let Some((p, q)) = plane_section(&own_plane, &cutter) else {
                continue;
            };

            fragments = fragments
                .into_iter()
                .flat_map(|fragment| {
                    let sides: Vec<Side> = fragment
                        .vertices()
                        .iter()
                        .map(|&v| cutting.classify_point(v))
                        .collect();
                    let spanning = sides
                        .iter()
                        .fold(Side::Coplanar, |acc, &s| acc.combine(s))
                        == Side::Spanning;
                    if spanning && segment_meets_polygon(p, q, &fragment) {
                        let (front, back) = fragment.split_spanning(&cutting, &sides);
                        front.into_iter().chain(back).collect::<Vec<_>>()
                    } else {
                        vec![fragment]
                    }
                })
                .collect();
        }

        fragments
    }
}

/// Computes `a - b` for closed, outward-oriented meshes.
///
/// # Errors
///
/// [`MeshError::TooManyTriangles`] if splitting produces more fragments
/// than the kernel allows.
///
/// # Example
///
/// ```rust
/// use tile_mesh::ops::boolean::classify::difference;
/// use tile_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let block = create_cube(DVec3::splat(2.0), true).unwrap();
/// let corner = create_cube(DVec3::ONE, false).unwrap();
/// let carved = difference(&block, &corner).unwrap();
/// assert!((carved.signed_volume() - 7.0).abs() < 1e-6);
/// ```
pub fn difference(a: &Mesh, b: &Mesh) -> Result<Mesh, MeshError> {
    if a.is_empty() {
        return Ok(Mesh::new());
    }
    if b.is_empty() || !bounding_boxes_overlap(a, b) {
        return Ok(a.clone());
    }

    let solid_a = IndexedSolid::new(a);
    let solid_b = IndexedSolid::new(b);

    let mut kept: Vec<Polygon> = Vec::new();

    // A fragments whose material side is outside B
    for i in 0..a.triangle_count() {
        for fragment in solid_b.split_triangle(a, i) {
            let probe = fragment.centroid() - fragment.plane().normal() * CLASSIFY_PROBE_OFFSET;
            if solid_b.containment(probe) == Containment::Outside {
                kept.push(fragment);
            }
        }
        check_fragment_budget(kept.len())?;
    }

    // B fragments with A material on both sides, facing into the cavity
    for i in 0..b.triangle_count() {
        for mut fragment in solid_a.split_triangle(b, i) {
            let offset = fragment.plane().normal() * CLASSIFY_PROBE_OFFSET;
            let centroid = fragment.centroid();
            if solid_a.containment(centroid + offset) == Containment::Inside
                && solid_a.containment(centroid - offset) == Containment::Inside
            {
                fragment.flip();
                kept.push(fragment);
            }
        }
        check_fragment_budget(kept.len())?;
    }

    trace!(fragments = kept.len(), "classified difference fragments");
    Ok(polygons_to_mesh(&kept))
}

/// Section of a triangle by a plane: the segment where the triangle meets
/// it. `None` if the triangle lies strictly on one side or in the plane.
fn plane_section(plane: &Plane, triangle: &[DVec3; 3]) -> Option<(DVec3, DVec3)> {
    let distances = triangle.map(|v| plane.signed_distance(v));
    let sides = triangle.map(|v| plane.classify_point(v));
    if sides.iter().all(|&s| s == Side::Coplanar)
        || sides.iter().all(|&s| s == Side::Front)
        || sides.iter().all(|&s| s == Side::Back)
    {
        return None;
    }

    let mut points: Vec<DVec3> = Vec::with_capacity(3);
    for i in 0..3 {
        let j = (i + 1) % 3;
        if sides[i] == Side::Coplanar {
            points.push(triangle[i]);
        }
        if sides[i].combine(sides[j]) == Side::Spanning {
            let t = distances[i] / (distances[i] - distances[j]);
            points.push(triangle[i].lerp(triangle[j], t));
        }
    }

    let first = *points.first()?;
    let last = points
        .iter()
        .copied()
        .max_by(|a, b| a.distance_squared(first).total_cmp(&b.distance_squared(first)))?;
    Some((first, last))
}

/// Whether segment `p`-`q`, lying in the plane of a convex polygon, meets
/// the polygon (boundary contact included).
fn segment_meets_polygon(p: DVec3, q: DVec3, polygon: &Polygon) -> bool {
    let normal = polygon.plane().normal();
    let vertices = polygon.vertices();
    let direction = q - p;
    let (mut t_min, mut t_max) = (0.0_f64, 1.0_f64);

    for (i, &v) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        let Some(inward) = normal.cross(next - v).try_normalize() else {
            continue;
        };
        let start = inward.dot(p - v) + PLANE_EPSILON;
        let rate = inward.dot(direction);
        if rate.abs() < EPSILON {
            if start < 0.0 {
                return false;
            }
            continue;
        }
        let t = -start / rate;
        if rate > 0.0 {
            t_min = t_min.max(t);
        } else {
            t_max = t_max.min(t);
        }
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Classifies a point against a closed mesh.
pub fn classify_point(point: DVec3, mesh: &Mesh) -> Containment {
    IndexedSolid::new(mesh).containment(point)
}

fn check_fragment_budget(count: usize) -> Result<(), MeshError> {
    if count > MAX_TRIANGLES {
        return Err(MeshError::TooManyTriangles {
            count,
            max: MAX_TRIANGLES,
        });
    }
    Ok(())
}

/// Checks if two mesh bounding boxes overlap.
fn bounding_boxes_overlap(a: &Mesh, b: &Mesh) -> bool {
    let (min_a, max_a) = a.bounding_box();
    let (min_b, max_b) = b.bounding_box();
    boxes_overlap(min_a, max_a, min_b, max_b)
}

fn boxes_overlap(min_a: DVec3, max_a: DVec3, min_b: DVec3, max_b: DVec3) -> bool {
    min_a.cmple(max_b).all() && max_a.cmpge(min_b).all()
}

/// Möller–Trumbore ray-triangle intersection algorithm.
///
/// Returns the distance along the ray if there's an intersection, None otherwise.
fn ray_triangle_intersection(
    ray_origin: DVec3,
    ray_dir: DVec3,
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(f * edge2.dot(q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;
    use crate::validate::check_watertight;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_triangle_intersection_hit() {
        let origin = DVec3::new(0.5, 0.5, -1.0);
        let v0 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let v2 = DVec3::new(0.5, 1.0, 0.0);

        let t = ray_triangle_intersection(origin, DVec3::Z, v0, v1, v2).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_triangle_intersection_miss() {
        let origin = DVec3::new(2.0, 2.0, -1.0);
        let v0 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let v2 = DVec3::new(0.5, 1.0, 0.0);

        assert!(ray_triangle_intersection(origin, DVec3::Z, v0, v1, v2).is_none());
    }

    #[test]
    fn test_classify_point() {
        let cube = create_cube(DVec3::splat(2.0), true).unwrap();
        assert_eq!(classify_point(DVec3::ZERO, &cube), Containment::Inside);
        assert_eq!(classify_point(DVec3::new(0.9, -0.9, 0.9), &cube), Containment::Inside);
        assert_eq!(classify_point(DVec3::new(1.5, 0.0, 0.0), &cube), Containment::Outside);
        assert_eq!(classify_point(DVec3::new(50.0, 0.0, 0.0), &cube), Containment::Outside);
    }

    #[test]
    fn test_difference_non_overlapping() {
        let a = create_cube(DVec3::ONE, false).unwrap();
        let mut b = create_cube(DVec3::ONE, false).unwrap();
        b.translate(DVec3::new(10.0, 0.0, 0.0));

        let result = difference(&a, &b).unwrap();
        assert_eq!(result.triangle_count(), 12);
    }

    #[test]
    fn test_difference_pocket_through_top() {
        // Slab with a block sunk into it, flush with the top face
        let slab = create_cube(DVec3::new(10.0, 10.0, 5.0), false).unwrap();
        let mut pocket = create_cube(DVec3::new(2.0, 2.0, 3.0), false).unwrap();
        pocket.translate(DVec3::new(4.0, 4.0, 2.0));

        let result = difference(&slab, &pocket).unwrap();
        check_watertight(&result).unwrap();
        assert_relative_eq!(result.signed_volume(), 500.0 - 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_notch_through_side() {
        // Block flush with the top and the -X side face
        let slab = create_cube(DVec3::new(10.0, 10.0, 5.0), false).unwrap();
        let mut notch = create_cube(DVec3::new(3.0, 2.0, 3.0), false).unwrap();
        notch.translate(DVec3::new(0.0, 4.0, 2.0));

        let result = difference(&slab, &notch).unwrap();
        check_watertight(&result).unwrap();
        assert_relative_eq!(result.signed_volume(), 500.0 - 18.0, epsilon = 1e-6);
    }
}
