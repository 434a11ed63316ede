//! # Path Tiles
//!
//! Generates carved tiles for a connector puzzle. Each square tile has
//! eight connection points on its edges; a perfect matching pairs them
//! into four connections, and each connection becomes a curved groove in
//! the tile's top face.
//!
//! ## Modules
//!
//! - [`matching`]: enumeration of perfect matchings
//! - [`params`], [`layout`]: tile dimensions and endpoint positions
//! - [`curve`], [`footprint`], [`cutter`], [`marker`]: channel and marker
//!   geometry
//! - [`engine`], [`carve`]: the carve pipeline with ranked solid engines
//! - [`batch`]: parallel carving of many tiles
//!
//! ## Usage
//!
//! ```rust,no_run
//! use path_tiles::{carve_batch, enumerate_matchings, EngineConfig, TileParams};
//!
//! let engines = EngineConfig::probe().unwrap();
//! let matchings = enumerate_matchings(8).unwrap();
//! for outcome in carve_batch(&matchings[..4], &TileParams::default(), &engines) {
//!     println!("{} {}", outcome.file_name(), outcome.result.is_ok());
//! }
//! ```

pub mod batch;
pub mod carve;
pub mod curve;
pub mod cutter;
pub mod engine;
pub mod error;
pub mod footprint;
pub mod layout;
pub mod marker;
pub mod matching;
pub mod params;

pub use batch::{carve_batch, TileOutcome};
pub use carve::{carve_tile, CarveDiagnostics, CarveStage, Solid};
pub use engine::{EngineConfig, SolidEngine};
pub use error::{CarveError, EngineFailure, ErrorKind};
pub use matching::{enumerate_matchings, generate_matchings, matching_count, Matching};
pub use params::{EmptyChannelPolicy, TileParams};
