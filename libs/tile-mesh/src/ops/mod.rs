//! # Mesh Operations
//!
//! Extrusion, triangulation and boolean subtraction.

pub mod boolean;
pub mod extrude;
pub mod triangulate;

pub use boolean::BooleanEngine;
pub use extrude::{linear_extrude, LinearExtrudeParams, Polygon2D};
pub use triangulate::Triangulator;
