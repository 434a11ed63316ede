//! # Cutting Volumes
//!
//! Footprints become cutters by extruding them `channel_depth` high and
//! lifting them so their top face is flush with the tile top. Every cutter
//! is checked before it reaches a boolean engine.

use glam::DVec3;
use tile_mesh::validate::check_cutter;
use tile_mesh::{linear_extrude, LinearExtrudeParams, Mesh, Polygon2D, Triangulator};
use tracing::{debug, warn};

use crate::error::CarveError;
use crate::footprint::ChannelFootprint;
use crate::params::TileParams;

/// Extrudes one footprint polygon into a flush cutter and validates it.
///
/// # Errors
///
/// [`CarveError::GeometryConstruction`] if extrusion fails or the result is
/// not a closed, outward-facing solid of positive volume.
///
/// # Example
///
/// ```rust
/// use path_tiles::cutter::extrude_flush;
/// use path_tiles::params::TileParams;
/// use tile_mesh::{Polygon2D, Triangulator};
/// use glam::DVec2;
///
/// let square = Polygon2D::square(DVec2::splat(4.0), false);
/// let cutter = extrude_flush(&square, &TileParams::default(), Triangulator::Earcut).unwrap();
/// assert_eq!(cutter.bounding_box().1.z, 5.0);
/// assert!((cutter.signed_volume() - 48.0).abs() < 1e-9);
/// ```
pub fn extrude_flush(
    polygon: &Polygon2D,
    params: &TileParams,
    triangulator: Triangulator,
) -> Result<Mesh, CarveError> {
    let extrude = LinearExtrudeParams {
        height: params.channel_depth,
        center: false,
        triangulator,
    };
    let mut mesh = linear_extrude(polygon, &extrude)?;
    mesh.translate(DVec3::new(0.0, 0.0, params.cut_floor()));
    check_cutter(&mesh)?;
    Ok(mesh)
}

/// Channel cutting mesh of one tile.
#[derive(Debug, Clone, Default)]
pub struct ChannelCutter {
    /// Concatenated extrusions of every valid footprint part
    pub mesh: Mesh,
    /// Footprint parts that failed extrusion or validation
    pub dropped: usize,
}

impl ChannelCutter {
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// Extrudes every part of the merged footprint and concatenates the valid
/// ones. Parts are disjoint, so no solid union is needed.
///
/// Invalid parts are logged and dropped.
pub fn build_channel_cutter(
    footprint: &ChannelFootprint,
    params: &TileParams,
    triangulator: Triangulator,
) -> ChannelCutter {
    let mut cutter = ChannelCutter::default();

    for (part, polygon) in footprint.polygons().iter().enumerate() {
        match extrude_flush(polygon, params, triangulator) {
            Ok(mesh) => cutter.mesh.merge(&mesh),
            Err(err) => {
                warn!(part, error = %err, "dropping invalid channel cutter");
                cutter.dropped += 1;
            }
        }
    }

    debug!(
        triangles = cutter.mesh.triangle_count(),
        dropped = cutter.dropped,
        "built channel cutter"
    );
    cutter
}
