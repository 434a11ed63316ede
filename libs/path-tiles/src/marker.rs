//! # Endpoint Markers
//!
//! One round pocket per endpoint, independent of the matching. Endpoints
//! sit on the tile edge, so each disc is clipped to the tile square and
//! the pocket ends up as a half disc.

use config::constants::MIN_AREA;
use geo::{Area, BooleanOps};
use glam::DVec2;
use tile_mesh::{Mesh, Polygon2D, Triangulator};
use tracing::debug;

use crate::cutter::extrude_flush;
use crate::error::CarveError;
use crate::footprint::disc;
use crate::layout::EndpointLayout;
use crate::params::TileParams;

/// Footprint of the marker centered at `center`: a disc clipped to the
/// square `[0, tile_size]²`.
///
/// # Errors
///
/// [`CarveError::GeometryConstruction`] if nothing of the disc lies on the
/// tile.
pub fn marker_footprint(
    center: DVec2,
    radius: f64,
    tile_size: f64,
    arc_segments: u32,
) -> Result<Polygon2D, CarveError> {
    let tile = Polygon2D::square(DVec2::splat(tile_size), false).to_geo();
    let clipped = disc(center, radius, arc_segments).intersection(&tile);

    clipped
        .iter()
        .filter(|p| p.unsigned_area() > MIN_AREA)
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .map(|p| Polygon2D::from_geo(p).normalized())
        .ok_or_else(|| {
            CarveError::geometry(format!(
                "marker at ({}, {}) does not overlap the tile",
                center.x, center.y
            ))
        })
}

/// Builds the cutter for endpoint `index`.
pub fn build_marker(
    index: usize,
    layout: &EndpointLayout,
    params: &TileParams,
    triangulator: Triangulator,
) -> Result<Mesh, CarveError> {
    let footprint = marker_footprint(
        layout.point(index)?,
        params.endpoint_dot_radius,
        params.tile_size,
        params.arc_segments,
    )?;
    extrude_flush(&footprint, params, triangulator)
        .map_err(|e| CarveError::geometry(format!("marker {index}: {e}")))
}

/// Attempts every endpoint marker, in index order.
pub fn build_markers(
    layout: &EndpointLayout,
    params: &TileParams,
    triangulator: Triangulator,
) -> Vec<Result<Mesh, CarveError>> {
    let markers: Vec<_> = (0..layout.points().len())
        .map(|index| build_marker(index, layout, params, triangulator))
        .collect();
    debug!(
        attempted = markers.len(),
        valid = markers.iter().filter(|m| m.is_ok()).count(),
        "built endpoint markers"
    );
    markers
}
