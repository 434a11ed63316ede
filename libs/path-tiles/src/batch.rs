//! # Batch Carving
//!
//! Carves many tiles in parallel. Tiles share only the immutable
//! parameters and engine configuration, and each tile's outcome is
//! reported on its own: one failure never stops the others.

use rayon::prelude::*;
use tracing::info;

use crate::carve::{carve_tile, Solid};
use crate::engine::EngineConfig;
use crate::error::CarveError;
use crate::matching::Matching;
use crate::params::TileParams;

/// Result of carving one tile of a batch.
#[derive(Debug)]
pub struct TileOutcome {
    /// 1-based position in the batch
    pub number: usize,
    pub matching: Matching,
    pub result: Result<Solid, CarveError>,
}

impl TileOutcome {
    /// File name the tile is exported under, e.g. `tile_007.stl`.
    pub fn file_name(&self) -> String {
        tile_file_name(self.number)
    }
}

/// File name for the tile numbered `number` (1-based, three digits).
///
/// # Example
///
/// ```rust
/// use path_tiles::batch::tile_file_name;
///
/// assert_eq!(tile_file_name(7), "tile_007.stl");
/// assert_eq!(tile_file_name(105), "tile_105.stl");
/// ```
pub fn tile_file_name(number: usize) -> String {
    format!("tile_{number:03}.stl")
}

/// Carves every matching in parallel. Outcomes keep the input order.
pub fn carve_batch(
    matchings: &[Matching],
    params: &TileParams,
    engines: &EngineConfig,
) -> Vec<TileOutcome> {
    let outcomes: Vec<TileOutcome> = matchings
        .par_iter()
        .enumerate()
        .map(|(i, matching)| TileOutcome {
            number: i + 1,
            matching: matching.clone(),
            result: carve_tile(matching.pairs(), params, engines),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(tiles = outcomes.len(), failed, "carved batch");
    outcomes
}
