//! # Tile Parameters
//!
//! Dimensions and resolutions for one tile. Every field has a default, so
//! a JSON file only needs the values it overrides:
//!
//! ```rust
//! use path_tiles::params::TileParams;
//!
//! let params = TileParams::from_json_str(r#"{ "path_radius": 3.5 }"#).unwrap();
//! assert_eq!(params.path_radius, 3.5);
//! assert_eq!(params.tile_size, 100.0);
//! ```

use std::path::Path;

use config::constants::{
    DEFAULT_ARC_SEGMENTS, DEFAULT_CHANNEL_DEPTH, DEFAULT_CURVE_SAMPLES,
    DEFAULT_ENDPOINT_DOT_RADIUS, DEFAULT_PATH_RADIUS, DEFAULT_TILE_SIZE, DEFAULT_TILE_THICKNESS,
    MAX_ARC_SEGMENTS, MIN_ARC_SEGMENTS,
};
use serde::{Deserialize, Serialize};

use crate::error::CarveError;

/// What to do when no channel geometry survives construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyChannelPolicy {
    /// Carve the endpoint markers only.
    #[default]
    AllowMarkersOnly,
    /// Fail the tile with a geometry construction error.
    Reject,
}

/// Parameters for carving one tile. Lengths share one unit (millimetres
/// in practice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileParams {
    /// Edge length of the square tile
    pub tile_size: f64,
    /// Height of the slab
    pub tile_thickness: f64,
    /// Depth of grooves and marker pockets below the top face
    pub channel_depth: f64,
    /// Half-width of a channel
    pub path_radius: f64,
    /// Radius of the pocket marking each endpoint
    pub endpoint_dot_radius: f64,
    /// Samples taken along each channel curve, both ends included
    pub curve_samples: usize,
    /// Segments per full circle for round caps, joins and markers
    pub arc_segments: u32,
    /// Handling of a tile whose channels all failed
    pub empty_channel_policy: EmptyChannelPolicy,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            tile_thickness: DEFAULT_TILE_THICKNESS,
            channel_depth: DEFAULT_CHANNEL_DEPTH,
            path_radius: DEFAULT_PATH_RADIUS,
            endpoint_dot_radius: DEFAULT_ENDPOINT_DOT_RADIUS,
            curve_samples: DEFAULT_CURVE_SAMPLES,
            arc_segments: DEFAULT_ARC_SEGMENTS,
            empty_channel_policy: EmptyChannelPolicy::default(),
        }
    }
}

impl TileParams {
    /// Parses parameters from JSON, filling missing fields with defaults,
    /// and validates them.
    pub fn from_json_str(json: &str) -> Result<Self, CarveError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| CarveError::invalid_input(format!("tile parameters: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Reads parameters from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CarveError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CarveError::invalid_input(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that every dimension is positive and finite, the resolutions
    /// are usable, and the grooves do not cut through the slab.
    ///
    /// # Errors
    ///
    /// [`CarveError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CarveError> {
        let lengths = [
            ("tile_size", self.tile_size),
            ("tile_thickness", self.tile_thickness),
            ("channel_depth", self.channel_depth),
            ("path_radius", self.path_radius),
            ("endpoint_dot_radius", self.endpoint_dot_radius),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(CarveError::invalid_input(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        if self.curve_samples < 2 {
            return Err(CarveError::invalid_input(format!(
                "curve_samples must be at least 2, got {}",
                self.curve_samples
            )));
        }
        if !(MIN_ARC_SEGMENTS..=MAX_ARC_SEGMENTS).contains(&self.arc_segments) {
            return Err(CarveError::invalid_input(format!(
                "arc_segments must be in {MIN_ARC_SEGMENTS}..={MAX_ARC_SEGMENTS}, got {}",
                self.arc_segments
            )));
        }
        if self.channel_depth >= self.tile_thickness {
            return Err(CarveError::invalid_input(format!(
                "channel_depth {} must be below tile_thickness {}",
                self.channel_depth, self.tile_thickness
            )));
        }
        Ok(())
    }

    /// Volume of the uncarved slab.
    pub fn slab_volume(&self) -> f64 {
        self.tile_size * self.tile_size * self.tile_thickness
    }

    /// Height of the bottom of every cutter.
    pub fn cut_floor(&self) -> f64 {
        self.tile_thickness - self.channel_depth
    }
}
