//! # Config Crate
//!
//! Centralized configuration constants for the Path Tiles pipeline.
//! All magic numbers and tunable defaults are defined here so the mesh
//! kernel, the tile library and the command-line tool agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{approx_zero, DEFAULT_TILE_SIZE, ENDPOINT_COUNT};
//!
//! let quarter = DEFAULT_TILE_SIZE / 4.0;
//! assert!(approx_zero(quarter - 25.0));
//! assert_eq!(ENDPOINT_COUNT, 8);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
