//! # Tile Mesh
//!
//! Triangle mesh kernel for carved tiles.
//!
//! ## Architecture
//!
//! ```text
//! Polygon2D ──linear_extrude──▶ Mesh (cutters)
//! create_cube ────────────────▶ Mesh (slab)
//! BooleanEngine::subtract(slab, cutters) ──▶ Mesh ──▶ STL
//! ```
//!
//! ## Algorithms
//!
//! All algorithms are pure Rust:
//! - **Boolean Operations**: BSP trees (csg.js algorithm) and
//!   split-and-classify with ray parity
//! - **Triangulation**: Ear clipping or constrained Delaunay (`geo`)
//! - **Validation**: edge pairing after vertex welding, net oriented area
//!
//! ## Usage
//!
//! ```rust
//! use tile_mesh::{linear_extrude, BooleanEngine, LinearExtrudeParams, Polygon2D};
//! use tile_mesh::primitives::create_cube;
//! use glam::{DVec2, DVec3};
//!
//! let slab = create_cube(DVec3::new(20.0, 20.0, 5.0), false).unwrap();
//! let mut groove = linear_extrude(
//!     &Polygon2D::circle(DVec2::new(10.0, 10.0), 3.0, 24),
//!     &LinearExtrudeParams { height: 2.0, ..Default::default() },
//! )
//! .unwrap();
//! groove.translate(DVec3::new(0.0, 0.0, 3.0));
//!
//! let carved = BooleanEngine::Bsp.subtract(&slab, &[groove]).unwrap();
//! assert!(carved.signed_volume() < 2000.0);
//! ```

pub mod error;
pub mod export;
pub mod mesh;
pub mod ops;
pub mod primitives;
pub mod validate;

pub use error::MeshError;
pub use mesh::Mesh;
pub use ops::{linear_extrude, BooleanEngine, LinearExtrudeParams, Polygon2D, Triangulator};
