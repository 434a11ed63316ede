//! # Primitives
//!
//! Mesh generation for solid primitives. Tiles only need the slab.

pub mod cube;

pub use cube::create_cube;
