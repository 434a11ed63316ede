//! # Mesh Validation
//!
//! Checks applied around boolean carving:
//!
//! - [`check_cutter`]: strict pre-flight for cutting solids (closed,
//!   consistently oriented, positive volume)
//! - [`check_carved`]: acceptance test for an engine result (non-empty,
//!   watertight, volume strictly between zero and the base volume)
//!
//! Boolean results contain T-junctions: a vertex of one face lies on an
//! edge of its neighbour. [`check_closed_oriented`] requires shared
//! vertices and rejects them, so results go through [`check_watertight`],
//! which splits edges at such vertices before pairing them.

use std::collections::HashMap;

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::{CLOSURE_TOLERANCE, JUNCTION_EPSILON, MIN_VOLUME, VERTEX_WELD_EPSILON};
use glam::DVec3;

type WeldKey = (i64, i64, i64);

fn weld_key(v: DVec3) -> WeldKey {
    (
        (v.x / VERTEX_WELD_EPSILON).round() as i64,
        (v.y / VERTEX_WELD_EPSILON).round() as i64,
        (v.z / VERTEX_WELD_EPSILON).round() as i64,
    )
}

/// Vertices merged by [`weld_key`].
struct Welded {
    /// Welded id of each mesh vertex
    ids: Vec<u32>,
    /// Position of each welded id (first vertex seen)
    positions: Vec<DVec3>,
}

impl Welded {
    fn new(mesh: &Mesh) -> Self {
        let mut lookup: HashMap<WeldKey, u32> = HashMap::with_capacity(mesh.vertex_count());
        let mut positions = Vec::new();
        let ids = mesh
            .vertices()
            .iter()
            .map(|&v| {
                *lookup.entry(weld_key(v)).or_insert_with(|| {
                    positions.push(v);
                    positions.len() as u32 - 1
                })
            })
            .collect();
        Self { ids, positions }
    }

    fn corners(&self, tri: [u32; 3]) -> [u32; 3] {
        tri.map(|i| self.ids[i as usize])
    }
}

/// Checks that every edge is shared by exactly two triangles that traverse
/// it in opposite directions, after welding coincident vertices.
///
/// # Example
///
/// ```rust
/// use tile_mesh::primitives::create_cube;
/// use tile_mesh::validate::check_closed_oriented;
/// use glam::DVec3;
///
/// let cube = create_cube(DVec3::ONE, false).unwrap();
/// assert!(check_closed_oriented(&cube).is_ok());
/// ```
pub fn check_closed_oriented(mesh: &Mesh) -> Result<(), MeshError> {
    let welded = Welded::new(mesh);

    let mut directed: HashMap<(u32, u32), u32> = HashMap::with_capacity(mesh.triangle_count() * 3);
    for tri in mesh.triangles() {
        let corners = welded.corners(*tri);
        if corners[0] == corners[1] || corners[1] == corners[2] || corners[0] == corners[2] {
            return Err(MeshError::invalid_topology("triangle collapses after welding"));
        }
        for k in 0..3 {
            *directed.entry((corners[k], corners[(k + 1) % 3])).or_insert(0) += 1;
        }
    }

    for (&(a, b), &count) in &directed {
        if count > 1 {
            return Err(MeshError::invalid_topology(format!(
                "edge {a}->{b} used {count} times in one direction"
            )));
        }
        if !directed.contains_key(&(b, a)) {
            return Err(MeshError::invalid_topology(format!(
                "edge {a}->{b} has no opposite half"
            )));
        }
    }

    Ok(())
}

/// Checks that the surface is closed and consistently oriented, allowing
/// T-junctions.
///
/// Every stretch of every edge must be traversed as often in one
/// direction as in the other. An edge with another vertex lying on it is
/// split at that vertex first, so one long edge can be matched by several
/// shorter ones running the other way.
///
/// # Example
///
/// ```rust
/// use tile_mesh::primitives::create_cube;
/// use tile_mesh::validate::check_watertight;
/// use tile_mesh::Mesh;
/// use glam::DVec3;
///
/// let cube = create_cube(DVec3::ONE, false).unwrap();
/// assert!(check_watertight(&cube).is_ok());
///
/// // Keep only the four side faces: an open tube
/// let mut tube = Mesh::new();
/// for v in cube.vertices() {
///     tube.add_vertex(*v);
/// }
/// for i in 0..cube.triangle_count() {
///     if cube.face_normal(i).z.abs() < 0.5 {
///         let [a, b, c] = cube.triangle(i);
///         tube.add_triangle(a, b, c);
///     }
/// }
/// assert!(check_watertight(&tube).is_err());
/// ```
pub fn check_watertight(mesh: &Mesh) -> Result<(), MeshError> {
    let welded = Welded::new(mesh);

    let mut net = EdgeBalance::with_capacity(mesh.triangle_count() * 3);
    for tri in mesh.triangles() {
        let corners = welded.corners(*tri);
        for k in 0..3 {
            net.traverse(corners[k], corners[(k + 1) % 3], 1);
        }
    }
    let open = net.unbalanced();
    if open.is_empty() {
        return Ok(());
    }

    let junctions = JunctionLookup::new(
        open.iter().flat_map(|&(a, b, _)| [a, b]),
        &welded.positions,
    );
    let mut residual = EdgeBalance::with_capacity(open.len() * 2);
    for &(a, b, count) in &open {
        let mut previous = a;
        for next in junctions.on_segment(a, b).into_iter().chain([b]) {
            residual.traverse(previous, next, count);
            previous = next;
        }
    }

    match residual.unbalanced().first() {
        None => Ok(()),
        Some(&(a, b, count)) => Err(MeshError::invalid_topology(format!(
            "edge {} -> {} is traversed {} more times one way than the other",
            welded.positions[a as usize],
            welded.positions[b as usize],
            count.abs()
        ))),
    }
}

/// Net number of traversals per undirected edge, counted from the lower
/// welded id to the higher one.
struct EdgeBalance(HashMap<(u32, u32), i64>);

impl EdgeBalance {
    fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    fn traverse(&mut self, from: u32, to: u32, count: i64) {
        match from.cmp(&to) {
            std::cmp::Ordering::Less => *self.0.entry((from, to)).or_insert(0) += count,
            std::cmp::Ordering::Greater => *self.0.entry((to, from)).or_insert(0) -= count,
            // Collapsed by welding
            std::cmp::Ordering::Equal => {}
        }
    }

    /// Edges with a non-zero balance as `(low, high, count)`, sorted.
    fn unbalanced(&self) -> Vec<(u32, u32, i64)> {
        let mut open: Vec<_> = self
            .0
            .iter()
            .filter(|&(_, &count)| count != 0)
            .map(|(&(a, b), &count)| (a, b, count))
            .collect();
        open.sort_unstable();
        open
    }
}

/// Finds welded vertices lying on the interior of a segment.
struct JunctionLookup<'a> {
    positions: &'a [DVec3],
    /// Candidate ids sorted along x, y and z
    by_axis: [Vec<u32>; 3],
}

impl<'a> JunctionLookup<'a> {
    fn new(candidates: impl Iterator<Item = u32>, positions: &'a [DVec3]) -> Self {
        let mut ids: Vec<u32> = candidates.collect();
        ids.sort_unstable();
        ids.dedup();
        let by_axis = [0, 1, 2].map(|k| {
            let mut sorted = ids.clone();
            sorted.sort_by(|&x, &y| positions[x as usize][k].total_cmp(&positions[y as usize][k]));
            sorted
        });
        Self { positions, by_axis }
    }

    /// Candidates within [`JUNCTION_EPSILON`] of the open segment `a`-`b`,
    /// ordered from `a` to `b`.
    fn on_segment(&self, a: u32, b: u32) -> Vec<u32> {
        let (p, q) = (self.positions[a as usize], self.positions[b as usize]);

        // Scan the axis whose slab around the segment holds fewest candidates
        let slab = |k: usize| {
            let (lo, hi) = (p[k].min(q[k]) - JUNCTION_EPSILON, p[k].max(q[k]) + JUNCTION_EPSILON);
            let sorted = &self.by_axis[k];
            let start = sorted.partition_point(|&i| self.positions[i as usize][k] < lo);
            let end = sorted.partition_point(|&i| self.positions[i as usize][k] <= hi);
            &sorted[start..end.max(start)]
        };
        let mut candidates = slab(0);
        for k in 1..3 {
            let other = slab(k);
            if other.len() < candidates.len() {
                candidates = other;
            }
        }

        let direction = q - p;
        let length_squared = direction.length_squared();
        let mut hits: Vec<(f64, u32)> = candidates
            .iter()
            .filter(|&&i| i != a && i != b)
            .filter_map(|&i| {
                let point = self.positions[i as usize];
                let t = (point - p).dot(direction) / length_squared;
                let inside = t > 0.0 && t < 1.0;
                (inside && point.distance(p + direction * t) <= JUNCTION_EPSILON).then_some((t, i))
            })
            .collect();
        hits.sort_by(|x, y| x.0.total_cmp(&y.0));
        hits.into_iter().map(|(_, i)| i).collect()
    }
}

/// Checks that the surface encloses a region: the net oriented area must
/// vanish relative to the total area.
pub fn check_closure(mesh: &Mesh) -> Result<(), MeshError> {
    let total = mesh.surface_area();
    let net = mesh.net_area_vector().length();
    if net > CLOSURE_TOLERANCE * total.max(1.0) {
        return Err(MeshError::invalid_topology(format!(
            "surface is open: net area {net:.3e} of total {total:.3e}"
        )));
    }
    Ok(())
}

/// Pre-flight check for a cutting solid. Returns its volume.
///
/// # Errors
///
/// - [`MeshError::DegenerateGeometry`] for an empty mesh or a volume that
///   is not strictly positive
/// - [`MeshError::InvalidTopology`] for open or inconsistently wound meshes
pub fn check_cutter(mesh: &Mesh) -> Result<f64, MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::degenerate("cutter has no faces"));
    }
    if !mesh.validate() {
        return Err(MeshError::degenerate("cutter has invalid triangle indices"));
    }
    check_closed_oriented(mesh)?;

    let volume = mesh.signed_volume();
    if !(volume > MIN_VOLUME) {
        return Err(MeshError::degenerate(format!(
            "cutter volume {volume} is not positive"
        )));
    }
    Ok(volume)
}

/// Acceptance test for the result of subtracting cutters from a base solid
/// of volume `base_volume`. Returns the result volume.
pub fn check_carved(mesh: &Mesh, base_volume: f64) -> Result<f64, MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::validation_failed("result is empty"));
    }
    check_watertight(mesh)
        .and_then(|()| check_closure(mesh))
        .map_err(|e| MeshError::validation_failed(e.to_string()))?;

    let volume = mesh.signed_volume();
    if !(volume > MIN_VOLUME) {
        return Err(MeshError::validation_failed(format!(
            "result volume {volume} is not positive"
        )));
    }
    if !(volume < base_volume - MIN_VOLUME) {
        return Err(MeshError::validation_failed(format!(
            "result volume {volume} is not below base volume {base_volume}"
        )));
    }
    Ok(volume)
}
