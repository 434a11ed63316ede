//! # Carve Errors
//!
//! Error types for matching enumeration and tile carving.

use std::fmt;

use thiserror::Error;
use tile_mesh::MeshError;

/// One solid engine's failed attempt at carving a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineFailure {
    /// Engine name as reported by the engine
    pub engine: String,
    /// Error or rejection message
    pub reason: String,
}

impl EngineFailure {
    /// Creates a failure record.
    pub fn new(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.engine, self.reason)
    }
}

/// Errors that can occur while enumerating matchings or carving a tile.
#[derive(Debug, Clone, Error)]
pub enum CarveError {
    /// Malformed matching or parameter, detected before any geometry work.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A curve, footprint, extrusion or marker produced no valid shape.
    #[error("Geometry construction failed: {0}")]
    GeometryConstruction(String),

    /// Every solid engine failed; no partial result is returned.
    #[error("Boolean carve failed: {}", format_attempts(.attempts))]
    BooleanCarve { attempts: Vec<EngineFailure> },
}

impl CarveError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a geometry construction error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::GeometryConstruction(message.into())
    }

    /// Category of the error, for per-tile reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::GeometryConstruction(_) => ErrorKind::GeometryConstruction,
            Self::BooleanCarve { .. } => ErrorKind::BooleanCarve,
        }
    }
}

/// Mesh kernel errors surface as geometry construction failures.
impl From<MeshError> for CarveError {
    fn from(err: MeshError) -> Self {
        Self::GeometryConstruction(err.to_string())
    }
}

fn format_attempts(attempts: &[EngineFailure]) -> String {
    if attempts.is_empty() {
        return "no engine configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error category without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    GeometryConstruction,
    BooleanCarve,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::GeometryConstruction => "GeometryConstruction",
            ErrorKind::BooleanCarve => "BooleanCarve",
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CarveError::invalid_input("index 9 out of range");
        assert!(err.to_string().contains("Invalid input"));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_boolean_carve_lists_attempts() {
        let err = CarveError::BooleanCarve {
            attempts: vec![
                EngineFailure::new("bsp", "result is empty"),
                EngineFailure::new("classify", "surface is open"),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("bsp: result is empty"));
        assert!(message.contains("classify: surface is open"));
        assert_eq!(err.kind().to_string(), "BooleanCarve");
    }

    #[test]
    fn test_mesh_error_conversion() {
        let err: CarveError = MeshError::degenerate("zero area").into();
        assert_eq!(err.kind(), ErrorKind::GeometryConstruction);
        assert!(err.to_string().contains("zero area"));
    }
}
