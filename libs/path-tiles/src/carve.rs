//! # Tile Carving
//!
//! Turns one matching into a carved solid:
//!
//! ```text
//! layout ─▶ curves ─▶ merged footprint ─▶ channel cutter ─┐
//!                                         endpoint markers ┴─▶ slab - cutters ─▶ Solid
//! ```
//!
//! The pipeline moves through [`CarveStage`]s strictly forward. Solid
//! engines are tried in priority order and each result must pass
//! [`check_carved`] before it is accepted; the slab is never returned
//! partially carved.

use std::fmt;

use config::constants::ENDPOINT_COUNT;
use glam::DVec3;
use tile_mesh::primitives::create_cube;
use tile_mesh::validate::check_carved;
use tile_mesh::Mesh;
use tracing::{debug, info, instrument, warn};

use crate::curve::build_curves;
use crate::cutter::build_channel_cutter;
use crate::engine::EngineConfig;
use crate::error::{CarveError, EngineFailure};
use crate::footprint::build_footprint;
use crate::layout::EndpointLayout;
use crate::marker::build_markers;
use crate::matching::Matching;
use crate::params::{EmptyChannelPolicy, TileParams};

// =============================================================================
// STAGES
// =============================================================================

/// Position of a solid engine in the ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRank {
    Primary,
    Fallback,
}

/// Progress of one carve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarveStage {
    Start,
    LayoutComputed,
    CurvesBuilt,
    FootprintsMerged,
    VolumesExtruded,
    MarkersValidated,
    CarveAttempted(EngineRank),
    Done,
    Failed,
}

impl CarveStage {
    fn ordinal(self) -> u8 {
        match self {
            CarveStage::Start => 0,
            CarveStage::LayoutComputed => 1,
            CarveStage::CurvesBuilt => 2,
            CarveStage::FootprintsMerged => 3,
            CarveStage::VolumesExtruded => 4,
            CarveStage::MarkersValidated => 5,
            CarveStage::CarveAttempted(EngineRank::Primary) => 6,
            CarveStage::CarveAttempted(EngineRank::Fallback) => 7,
            CarveStage::Done => 8,
            CarveStage::Failed => 9,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CarveStage::Done | CarveStage::Failed)
    }

    /// True if the pipeline may move from `self` to `next`.
    ///
    /// Stages advance one at a time; any fallback attempt may follow any
    /// attempt, `Done` follows an attempt, and `Failed` can end any stage
    /// that is not already terminal.
    pub fn can_advance_to(self, next: CarveStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            CarveStage::Failed => true,
            CarveStage::Done | CarveStage::CarveAttempted(EngineRank::Fallback) => {
                matches!(self, CarveStage::CarveAttempted(_))
            }
            _ => next.ordinal() == self.ordinal() + 1,
        }
    }
}

impl fmt::Display for CarveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarveStage::CarveAttempted(rank) => write!(f, "CarveAttempted({rank:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Records the stages a carve passes through.
#[derive(Debug, Clone)]
pub struct StageTracker {
    history: Vec<CarveStage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            history: vec![CarveStage::Start],
        }
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> CarveStage {
        self.history.last().copied().unwrap_or(CarveStage::Start)
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// [`CarveError::GeometryConstruction`] for a backward or skipping move.
    pub fn advance(&mut self, next: CarveStage) -> Result<(), CarveError> {
        let current = self.current();
        if !current.can_advance_to(next) {
            return Err(CarveError::geometry(format!(
                "carve stage cannot move from {current} to {next}"
            )));
        }
        debug!(from = %current, to = %next, "carve stage");
        self.history.push(next);
        Ok(())
    }

    /// Every stage visited so far, starting with [`CarveStage::Start`].
    pub fn history(&self) -> &[CarveStage] {
        &self.history
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// What happened along the way to a finished tile.
#[derive(Debug, Clone, Default)]
pub struct CarveDiagnostics {
    /// Pairs whose channel footprint could not be built
    pub skipped_pairs: Vec<(usize, usize)>,
    /// Channel footprint parts dropped by cutter validation
    pub dropped_cutters: usize,
    /// False when only the markers were carved
    pub channels_present: bool,
    /// Engines that failed before the accepted one
    pub failed_attempts: Vec<EngineFailure>,
    /// Stages visited, in order
    pub stages: Vec<CarveStage>,
}

/// A carved tile.
#[derive(Debug, Clone)]
pub struct Solid {
    pub mesh: Mesh,
    /// Enclosed volume of `mesh`
    pub volume: f64,
    /// Name of the engine whose result was accepted
    pub engine: String,
    pub diagnostics: CarveDiagnostics,
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Carves the channels of `pairs` and the eight endpoint markers out of a
/// tile slab.
///
/// # Errors
///
/// - [`CarveError::InvalidInput`] for invalid parameters, a wrong pair
///   count, or repeated or out-of-range indices; reported before any
///   geometry is built
/// - [`CarveError::GeometryConstruction`] if a marker fails, or if no
///   channel survives and the policy is [`EmptyChannelPolicy::Reject`]
/// - [`CarveError::BooleanCarve`] if every solid engine fails, with one
///   entry per engine
///
/// # Example
///
/// ```rust,no_run
/// use path_tiles::{carve_tile, EngineConfig, TileParams};
///
/// let engines = EngineConfig::probe().unwrap();
/// let solid = carve_tile(&[(0, 1), (2, 3), (4, 5), (6, 7)], &TileParams::default(), &engines)
///     .unwrap();
/// assert!(solid.volume > 0.0 && solid.volume < 50_000.0);
/// ```
#[instrument(skip(params, engines))]
pub fn carve_tile(
    pairs: &[(usize, usize)],
    params: &TileParams,
    engines: &EngineConfig,
) -> Result<Solid, CarveError> {
    let mut tracker = StageTracker::new();
    let result = run_pipeline(pairs, params, engines, &mut tracker);
    match &result {
        Ok(solid) => info!(
            engine = %solid.engine,
            volume = solid.volume,
            triangles = solid.mesh.triangle_count(),
            "carved tile"
        ),
        Err(err) => {
            if !tracker.current().is_terminal() {
                // Failed is reachable from every non-terminal stage
                let _ = tracker.advance(CarveStage::Failed);
            }
            warn!(stage = %tracker.current(), kind = %err.kind(), error = %err, "tile carve failed");
        }
    }
    result
}

fn run_pipeline(
    pairs: &[(usize, usize)],
    params: &TileParams,
    engines: &EngineConfig,
    tracker: &mut StageTracker,
) -> Result<Solid, CarveError> {
    params.validate()?;
    let matching = Matching::new(pairs.to_vec(), ENDPOINT_COUNT)?;
    let triangulator = engines.triangulator();
    let mut diagnostics = CarveDiagnostics::default();

    let layout = EndpointLayout::new(params.tile_size);
    tracker.advance(CarveStage::LayoutComputed)?;

    let curves = build_curves(&matching, &layout, params.curve_samples)?;
    tracker.advance(CarveStage::CurvesBuilt)?;

    let footprint = build_footprint(&curves, params.path_radius, params.arc_segments);
    diagnostics.skipped_pairs = footprint.skipped.clone();
    tracker.advance(CarveStage::FootprintsMerged)?;

    let channel = build_channel_cutter(&footprint, params, triangulator);
    diagnostics.dropped_cutters = channel.dropped;
    diagnostics.channels_present = !channel.is_empty();
    if channel.is_empty() {
        match params.empty_channel_policy {
            EmptyChannelPolicy::AllowMarkersOnly => {
                warn!("no channel geometry survived, carving markers only");
            }
            EmptyChannelPolicy::Reject => {
                return Err(CarveError::geometry("no channel geometry survived"));
            }
        }
    }
    tracker.advance(CarveStage::VolumesExtruded)?;

    let mut cutters = Vec::with_capacity(ENDPOINT_COUNT + 1);
    if !channel.is_empty() {
        cutters.push(channel.mesh);
    }
    let mut marker_errors = Vec::new();
    for (index, marker) in build_markers(&layout, params, triangulator).into_iter().enumerate() {
        match marker {
            Ok(mesh) => cutters.push(mesh),
            Err(err) => marker_errors.push(format!("marker {index}: {err}")),
        }
    }
    if !marker_errors.is_empty() {
        return Err(CarveError::geometry(format!(
            "{} of {ENDPOINT_COUNT} markers are invalid ({})",
            marker_errors.len(),
            marker_errors.join("; ")
        )));
    }
    tracker.advance(CarveStage::MarkersValidated)?;

    let slab = create_cube(
        DVec3::new(params.tile_size, params.tile_size, params.tile_thickness),
        false,
    )?;
    let slab_volume = params.slab_volume();

    let mut failures = Vec::new();
    for (rank, engine) in engines.engines().iter().enumerate() {
        let rank = if rank == 0 {
            EngineRank::Primary
        } else {
            EngineRank::Fallback
        };
        tracker.advance(CarveStage::CarveAttempted(rank))?;

        let attempt = engine
            .subtract(&slab, &cutters)
            .and_then(|mesh| check_carved(&mesh, slab_volume).map(|volume| (mesh, volume)));

        match attempt {
            Ok((mesh, volume)) => {
                tracker.advance(CarveStage::Done)?;
                diagnostics.failed_attempts = failures;
                diagnostics.stages = tracker.history().to_vec();
                return Ok(Solid {
                    mesh,
                    volume,
                    engine: engine.name().to_string(),
                    diagnostics,
                });
            }
            Err(err) => {
                warn!(engine = engine.name(), error = %err, "solid engine failed");
                failures.push(EngineFailure::new(engine.name(), err.to_string()));
            }
        }
    }

    Err(CarveError::BooleanCarve { attempts: failures })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_move_forward_only() {
        let mut tracker = StageTracker::new();
        tracker.advance(CarveStage::LayoutComputed).unwrap();
        tracker.advance(CarveStage::CurvesBuilt).unwrap();
        assert!(tracker.advance(CarveStage::LayoutComputed).is_err());
        assert!(tracker.advance(CarveStage::VolumesExtruded).is_err());
        assert_eq!(tracker.current(), CarveStage::CurvesBuilt);
    }

    #[test]
    fn test_attempt_sequence() {
        let mut tracker = StageTracker::new();
        for stage in [
            CarveStage::LayoutComputed,
            CarveStage::CurvesBuilt,
            CarveStage::FootprintsMerged,
            CarveStage::VolumesExtruded,
            CarveStage::MarkersValidated,
        ] {
            tracker.advance(stage).unwrap();
        }
        assert!(tracker.advance(CarveStage::Done).is_err());
        assert!(tracker.advance(CarveStage::CarveAttempted(EngineRank::Fallback)).is_err());

        tracker.advance(CarveStage::CarveAttempted(EngineRank::Primary)).unwrap();
        tracker.advance(CarveStage::CarveAttempted(EngineRank::Fallback)).unwrap();
        tracker.advance(CarveStage::CarveAttempted(EngineRank::Fallback)).unwrap();
        assert!(tracker.advance(CarveStage::CarveAttempted(EngineRank::Primary)).is_err());
        tracker.advance(CarveStage::Done).unwrap();

        assert!(tracker.advance(CarveStage::Failed).is_err());
        assert_eq!(tracker.history().len(), 10);
    }

    #[test]
    fn test_failed_from_any_open_stage() {
        let mut tracker = StageTracker::new();
        tracker.advance(CarveStage::LayoutComputed).unwrap();
        tracker.advance(CarveStage::Failed).unwrap();
        assert!(tracker.current().is_terminal());
        assert!(tracker.advance(CarveStage::CurvesBuilt).is_err());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(CarveStage::CurvesBuilt.to_string(), "CurvesBuilt");
        assert_eq!(
            CarveStage::CarveAttempted(EngineRank::Fallback).to_string(),
            "CarveAttempted(Fallback)"
        );
    }
}
