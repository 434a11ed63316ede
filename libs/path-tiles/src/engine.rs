//! # Engine Configuration
//!
//! The carve pipeline depends on two pluggable pieces:
//!
//! - a triangulation backend for extrusion caps, chosen once at start-up
//!   by [`EngineConfig::probe`]
//! - a ranked list of [`SolidEngine`]s; the first is the primary, the rest
//!   are fallbacks tried in order
//!
//! The configuration is immutable and shared by reference between tiles.

use std::fmt;

use glam::DVec2;
use tile_mesh::{BooleanEngine, Mesh, MeshError, Polygon2D, Triangulator};
use tracing::{info, warn};

use crate::error::CarveError;

/// Subtracts a set of solids from a base solid.
pub trait SolidEngine: Send + Sync {
    /// Name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Computes `base - (cutters[0] ∪ cutters[1] ∪ ...)`.
    fn subtract(&self, base: &Mesh, cutters: &[Mesh]) -> Result<Mesh, MeshError>;
}

impl SolidEngine for BooleanEngine {
    fn name(&self) -> &str {
        BooleanEngine::name(self)
    }

    fn subtract(&self, base: &Mesh, cutters: &[Mesh]) -> Result<Mesh, MeshError> {
        BooleanEngine::subtract(self, base, cutters)
    }
}

/// Triangulation backend plus ranked solid engines.
pub struct EngineConfig {
    triangulator: Triangulator,
    engines: Vec<Box<dyn SolidEngine>>,
}

impl EngineConfig {
    /// Creates a configuration from explicit parts.
    pub fn new(triangulator: Triangulator, engines: Vec<Box<dyn SolidEngine>>) -> Self {
        Self {
            triangulator,
            engines,
        }
    }

    /// Probes the triangulation backends in preference order and keeps the
    /// first that handles a reference polygon with a hole. Solid engines
    /// are the BSP engine followed by the split-and-classify engine.
    ///
    /// # Errors
    ///
    /// [`CarveError::GeometryConstruction`] if no backend works.
    ///
    /// # Example
    ///
    /// ```rust
    /// use path_tiles::engine::EngineConfig;
    ///
    /// let config = EngineConfig::probe().unwrap();
    /// assert_eq!(config.engine_names(), vec!["bsp", "classify"]);
    /// ```
    pub fn probe() -> Result<Self, CarveError> {
        Self::probe_from(&Triangulator::ALL)
    }

    /// Like [`EngineConfig::probe`], trying `preferred` first.
    pub fn probe_preferring(preferred: Triangulator) -> Result<Self, CarveError> {
        let mut order = vec![preferred];
        order.extend(Triangulator::ALL.into_iter().filter(|&t| t != preferred));
        Self::probe_from(&order)
    }

    fn probe_from(candidates: &[Triangulator]) -> Result<Self, CarveError> {
        let reference = reference_polygon();
        for &triangulator in candidates {
            match triangulator.triangulate(&reference) {
                Ok(_) => {
                    info!(triangulator = triangulator.name(), "selected triangulation backend");
                    return Ok(Self::new(triangulator, default_engines()));
                }
                Err(err) => {
                    warn!(triangulator = triangulator.name(), error = %err, "triangulation backend unavailable");
                }
            }
        }
        Err(CarveError::geometry("no triangulation backend is usable"))
    }

    /// Replaces the solid engines, keeping the triangulator.
    pub fn with_engines(mut self, engines: Vec<Box<dyn SolidEngine>>) -> Self {
        self.engines = engines;
        self
    }

    pub fn triangulator(&self) -> Triangulator {
        self.triangulator
    }

    /// Solid engines in priority order.
    pub fn engines(&self) -> &[Box<dyn SolidEngine>] {
        &self.engines
    }

    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("triangulator", &self.triangulator)
            .field("engines", &self.engine_names())
            .finish()
    }
}

fn default_engines() -> Vec<Box<dyn SolidEngine>> {
    vec![Box::new(BooleanEngine::Bsp), Box::new(BooleanEngine::Classify)]
}

/// 10 x 10 square with a 4 x 4 hole.
fn reference_polygon() -> Polygon2D {
    let outer = Polygon2D::square(DVec2::splat(10.0), false).outer;
    let mut hole = Polygon2D::square(DVec2::splat(4.0), false).outer;
    for vertex in &mut hole {
        *vertex += DVec2::splat(3.0);
    }
    Polygon2D::with_holes(outer, vec![hole]).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_prefers_earcut() {
        let config = EngineConfig::probe().unwrap();
        assert_eq!(config.triangulator(), Triangulator::Earcut);
        assert_eq!(config.engines().len(), 2);
    }

    #[test]
    fn test_probe_preferring() {
        let config = EngineConfig::probe_preferring(Triangulator::Delaunay).unwrap();
        assert_eq!(config.triangulator(), Triangulator::Delaunay);
        assert_eq!(config.engine_names(), vec!["bsp", "classify"]);
    }

    #[test]
    fn test_reference_polygon_triangulates() {
        let reference = reference_polygon();
        assert_eq!(reference.area(), 84.0);
        for triangulator in Triangulator::ALL {
            // 8 vertices, one hole: n + 2h - 2 triangles
            assert_eq!(triangulator.triangulate(&reference).unwrap().len(), 8);
        }
    }

    #[test]
    fn test_debug_lists_engine_names() {
        let config = EngineConfig::new(Triangulator::Earcut, vec![Box::new(BooleanEngine::Classify)]);
        let debug = format!("{config:?}");
        assert!(debug.contains("Earcut"));
        assert!(debug.contains("classify"));
    }
}
