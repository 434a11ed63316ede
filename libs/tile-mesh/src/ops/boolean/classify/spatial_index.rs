//! # Spatial Index for Triangle Queries
//!
//! A uniform grid over the mesh bounds. Each cell lists the triangles
//! whose bounding boxes touch it, so box and ray queries only look at
//! nearby triangles.
//!
//! Rays are clipped to the grid bounds and then walked cell by cell
//! (Amanatides-Woo traversal).

use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::DVec3;

/// Cells are sized so that a cell spans about this many average
/// triangle extents.
const CELL_SIZE_FACTOR: f64 = 2.0;

/// Lower bound on the cell size.
const MIN_CELL_SIZE: f64 = 0.1;

/// Upper bound on the cells along one axis.
const MAX_CELLS_PER_AXIS: usize = 128;

/// Uniform grid of triangle indices.
///
/// # Example
///
/// ```rust
/// use tile_mesh::ops::boolean::classify::SpatialIndex;
/// use tile_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let cube = create_cube(DVec3::ONE, false).unwrap();
/// let index = SpatialIndex::from_mesh(&cube);
/// assert_eq!(index.query_box(DVec3::ZERO, DVec3::ONE).len(), 12);
/// ```
#[derive(Debug)]
pub struct SpatialIndex {
    min: DVec3,
    max: DVec3,
    cell_size: f64,
    dims: [usize; 3],
    /// Triangle indices per cell, x varying fastest
    cells: Vec<Vec<usize>>,
    triangle_count: usize,
}

impl SpatialIndex {
    /// Builds the grid for `mesh`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let (min, max) = mesh.bounding_box();
        let triangle_count = mesh.triangle_count();

        let size = max - min;
        let average_extent = (size.x + size.y + size.z) / 3.0;
        let cell_size = (average_extent / (triangle_count.max(1) as f64).cbrt() * CELL_SIZE_FACTOR)
            .max(MIN_CELL_SIZE)
            .max(size.max_element() / MAX_CELLS_PER_AXIS as f64);

        let dims = [0, 1, 2].map(|k| ((size[k] / cell_size).floor() as usize + 1).min(MAX_CELLS_PER_AXIS));

        let mut index = Self {
            min,
            max,
            cell_size,
            dims,
            cells: vec![Vec::new(); dims[0] * dims[1] * dims[2]],
            triangle_count,
        };

        for i in 0..triangle_count {
            let [a, b, c] = mesh.triangle_positions(i);
            let lo = index.cell_of(a.min(b).min(c));
            let hi = index.cell_of(a.max(b).max(c));
            index.for_each_cell(lo, hi, |cell| cell.push(i));
        }

        index
    }

    /// Bounding box of the indexed mesh.
    pub fn bounds(&self) -> (DVec3, DVec3) {
        (self.min, self.max)
    }

    /// True if `point` lies inside the mesh bounds grown by `margin`.
    pub fn contains_point(&self, point: DVec3, margin: f64) -> bool {
        point.cmpge(self.min - DVec3::splat(margin)).all()
            && point.cmple(self.max + DVec3::splat(margin)).all()
    }

    /// Triangles listed in any cell that overlaps the box.
    pub fn query_box(&self, min: DVec3, max: DVec3) -> Vec<usize> {
        if max.cmplt(self.min).any() || min.cmpgt(self.max).any() {
            return Vec::new();
        }
        let mut seen = vec![false; self.triangle_count];
        let mut result = Vec::new();
        let (lo, hi) = (self.cell_of(min), self.cell_of(max));
        for z in lo[2]..=hi[2] {
            for y in lo[1]..=hi[1] {
                for x in lo[0]..=hi[0] {
                    collect_unique(&self.cells[self.flat([x, y, z])], &mut seen, &mut result);
                }
            }
        }
        result
    }

    /// Triangles listed in the cells crossed by the ray
    /// `origin + t * direction`, `t >= 0`.
    pub fn query_ray(&self, origin: DVec3, direction: DVec3) -> Vec<usize> {
        let mut result = Vec::new();
        let Some((t_enter, t_exit)) = self.clip_ray(origin, direction) else {
            return result;
        };
        let mut seen = vec![false; self.triangle_count];

        let start = origin + direction * t_enter;
        let mut cell = self.cell_of(start).map(|c| c as isize);
        let mut step = [0isize; 3];
        let mut t_next = [f64::INFINITY; 3];
        let mut t_delta = [f64::INFINITY; 3];

        for k in 0..3 {
            if direction[k].abs() <= EPSILON {
                continue;
            }
            step[k] = if direction[k] > 0.0 { 1 } else { -1 };
            let boundary_cell = cell[k] + if step[k] > 0 { 1 } else { 0 };
            let boundary = self.min[k] + boundary_cell as f64 * self.cell_size;
            t_next[k] = (boundary - origin[k]) / direction[k];
            t_delta[k] = self.cell_size / direction[k].abs();
        }

        loop {
            let current = cell.map(|c| c as usize);
            collect_unique(&self.cells[self.flat(current)], &mut seen, &mut result);

            let axis = if t_next[0] <= t_next[1] && t_next[0] <= t_next[2] {
                0
            } else if t_next[1] <= t_next[2] {
                1
            } else {
                2
            };
            if t_next[axis] > t_exit {
                break;
            }
            cell[axis] += step[axis];
            if cell[axis] < 0 || cell[axis] >= self.dims[axis] as isize {
                break;
            }
            t_next[axis] += t_delta[axis];
        }

        result
    }

    /// Number of cells holding at least one triangle.
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Parameter range over which the ray is inside the (slightly grown)
    /// bounds, starting no earlier than `t = 0`.
    fn clip_ray(&self, origin: DVec3, direction: DVec3) -> Option<(f64, f64)> {
        let margin = DVec3::splat(EPSILON);
        let (lo, hi) = (self.min - margin, self.max + margin);
        let mut t_enter = 0.0f64;
        let mut t_exit = f64::INFINITY;

        for k in 0..3 {
            if direction[k].abs() <= EPSILON {
                if origin[k] < lo[k] || origin[k] > hi[k] {
                    return None;
                }
                continue;
            }
            let t0 = (lo[k] - origin[k]) / direction[k];
            let t1 = (hi[k] - origin[k]) / direction[k];
            t_enter = t_enter.max(t0.min(t1));
            t_exit = t_exit.min(t0.max(t1));
        }

        (t_enter <= t_exit).then_some((t_enter, t_exit))
    }

    /// Cell containing `point`, clamped to the grid.
    fn cell_of(&self, point: DVec3) -> [usize; 3] {
        [0, 1, 2].map(|k| {
            let c = ((point[k] - self.min[k]) / self.cell_size).floor();
            if c.is_nan() || c < 0.0 {
                0
            } else {
                (c as usize).min(self.dims[k] - 1)
            }
        })
    }

    fn flat(&self, [x, y, z]: [usize; 3]) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    fn for_each_cell(&mut self, lo: [usize; 3], hi: [usize; 3], mut f: impl FnMut(&mut Vec<usize>)) {
        for z in lo[2]..=hi[2] {
            for y in lo[1]..=hi[1] {
                for x in lo[0]..=hi[0] {
                    let i = self.flat([x, y, z]);
                    f(&mut self.cells[i]);
                }
            }
        }
    }
}

fn collect_unique(triangles: &[usize], seen: &mut [bool], out: &mut Vec<usize>) {
    for &t in triangles {
        if !seen[t] {
            seen[t] = true;
            out.push(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;

    /// Bottom and top faces of a unit cube.
    fn two_faces() -> Mesh {
        let mut mesh = Mesh::new();
        for z in [0.0, 1.0] {
            mesh.add_vertex(DVec3::new(0.0, 0.0, z));
            mesh.add_vertex(DVec3::new(1.0, 0.0, z));
            mesh.add_vertex(DVec3::new(1.0, 1.0, z));
            mesh.add_vertex(DVec3::new(0.0, 1.0, z));
        }
        mesh.add_triangle(0, 2, 1);
        mesh.add_triangle(0, 3, 2);
        mesh.add_triangle(4, 5, 6);
        mesh.add_triangle(4, 6, 7);
        mesh
    }

    #[test]
    fn test_index_creation() {
        let index = SpatialIndex::from_mesh(&two_faces());
        assert!(index.cell_count() > 0);
        assert!(index.cell_size() > 0.0);
        assert_eq!(index.bounds(), (DVec3::ZERO, DVec3::ONE));
    }

    #[test]
    fn test_query_box() {
        let index = SpatialIndex::from_mesh(&two_faces());
        assert_eq!(index.query_box(DVec3::ZERO, DVec3::ONE).len(), 4);
        assert!(index.query_box(DVec3::splat(5.0), DVec3::splat(6.0)).is_empty());
    }

    #[test]
    fn test_query_ray_from_inside() {
        let index = SpatialIndex::from_mesh(&two_faces());
        let candidates = index.query_ray(DVec3::splat(0.5), DVec3::Z);
        assert!(candidates.contains(&2) || candidates.contains(&3));
    }

    #[test]
    fn test_query_ray_from_outside() {
        let index = SpatialIndex::from_mesh(&two_faces());
        let candidates = index.query_ray(DVec3::new(0.5, 0.5, -3.0), DVec3::Z);
        assert_eq!(candidates.len(), 4);
    }

    #[test]
    fn test_query_ray_miss() {
        let index = SpatialIndex::from_mesh(&two_faces());
        assert!(index.query_ray(DVec3::new(100.0, 100.0, -1.0), DVec3::Z).is_empty());
        // Pointing away from the bounds
        assert!(index.query_ray(DVec3::new(0.5, 0.5, -1.0), -DVec3::Z).is_empty());
    }

    #[test]
    fn test_fine_grid_walks_every_cell() {
        // Wide, thin slab: many cells along x, one along z
        let mut slab = create_cube(DVec3::new(100.0, 100.0, 1.0), false).unwrap();
        for i in 1..40 {
            let mut cube = create_cube(DVec3::splat(0.5), false).unwrap();
            cube.translate(DVec3::new(i as f64 * 2.5, 50.0, 0.25));
            slab.merge(&cube);
        }
        let index = SpatialIndex::from_mesh(&slab);
        let candidates = index.query_ray(DVec3::new(0.0, 50.25, 0.5), DVec3::X);
        // Every small cube lies on the ray
        for cube in 0..39 {
            let first = 12 + cube * 12;
            assert!(
                (first..first + 12).any(|t| candidates.contains(&t)),
                "cube {cube} missed"
            );
        }
    }
}
