//! # Mesh Data Structure
//!
//! Core mesh representation: f64 vertex positions and indexed triangles
//! wound counter-clockwise when seen from outside the solid.

use config::constants::MIN_AREA;
use glam::DVec3;

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64. Conversion to f32 only happens
/// when a mesh is written to STL.
///
/// # Example
///
/// ```rust
/// use tile_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut floor = Mesh::new();
/// let a = floor.add_vertex(DVec3::ZERO);
/// let b = floor.add_vertex(DVec3::X);
/// let c = floor.add_vertex(DVec3::Y);
/// floor.add_triangle(a, b, c);
/// assert_eq!(floor.face_normal(0), DVec3::Z);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for the given counts.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Returns the three corner positions of a triangle.
    #[inline]
    pub fn triangle_positions(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[index];
        [self.vertex(a), self.vertex(b), self.vertex(c)]
    }

    /// Unit normal of a triangle, or zero for a degenerate one.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        self.area_vector(self.triangles[index]).normalize_or_zero()
    }

    /// Half the cross product of two edges: normal direction, area length.
    fn area_vector(&self, [a, b, c]: [u32; 3]) -> DVec3 {
        let v0 = self.vertices[a as usize];
        (self.vertices[b as usize] - v0).cross(self.vertices[c as usize] - v0) * 0.5
    }

    /// Axis-aligned bounds as `(min, max)`.
    ///
    /// An empty mesh has a zero-size box at the origin.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        rest.iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)))
    }

    /// Translates the mesh by a vector.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tile_mesh::primitives::create_cube;
    /// use glam::DVec3;
    ///
    /// let mut mesh = create_cube(DVec3::ONE, false).unwrap();
    /// mesh.translate(DVec3::new(0.0, 0.0, 4.0));
    /// assert_eq!(mesh.bounding_box().0.z, 4.0);
    /// ```
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles
            .extend(other.triangles.iter().map(|tri| tri.map(|i| i + offset)));
    }

    /// Reverses the winding of every triangle, turning the mesh inside out.
    pub fn flip(&mut self) {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
    }

    /// Signed enclosed volume (positive for outward-facing triangles).
    ///
    /// Only meaningful for closed meshes; see [`Mesh::net_area_vector`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use tile_mesh::primitives::create_cube;
    /// use glam::DVec3;
    ///
    /// let cube = create_cube(DVec3::new(2.0, 3.0, 4.0), false).unwrap();
    /// assert!((cube.signed_volume() - 24.0).abs() < 1e-9);
    /// ```
    pub fn signed_volume(&self) -> f64 {
        let Some(&origin) = self.vertices.first() else {
            return 0.0;
        };

        let sum: f64 = (0..self.triangles.len())
            .map(|i| {
                let [v0, v1, v2] = self.triangle_positions(i);
                (v0 - origin).dot((v1 - origin).cross(v2 - origin))
            })
            .sum();

        sum / 6.0
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(|&t| self.area_vector(t).length()).sum()
    }

    /// Sum of the oriented area vectors of all triangles.
    ///
    /// Zero for any closed surface, including ones whose edges meet at
    /// T-junctions.
    pub fn net_area_vector(&self) -> DVec3 {
        self.triangles.iter().map(|&t| self.area_vector(t)).sum()
    }

    /// Drops triangles with repeated indices or (near) zero area.
    pub fn remove_degenerate_triangles(&mut self) {
        let triangles = std::mem::take(&mut self.triangles);
        self.triangles = triangles
            .into_iter()
            .filter(|&t| !self.is_degenerate(t))
            .collect();
    }

    fn is_degenerate(&self, [a, b, c]: [u32; 3]) -> bool {
        a == b || b == c || a == c || self.area_vector([a, b, c]).length() <= MIN_AREA
    }

    /// True if every index is in range and no triangle repeats a vertex.
    ///
    /// Zero-area slivers pass: caps of a closed extrusion may contain them.
    pub fn validate(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.triangles
            .iter()
            .all(|&[a, b, c]| a < count && b < count && c < count && a != b && b != c && a != c)
    }
}
