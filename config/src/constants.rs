//! # Configuration Constants
//!
//! Centralized constants for the Path Tiles pipeline. Tile defaults,
//! tessellation parameters, and precision values are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Tile defaults**: Default tile dimensions and sampling resolution
//! - **Tessellation**: Arc segment limits
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for classifying points against splitting planes.
///
/// Boolean engines treat any point closer than this to a plane as lying
/// on it. Larger than [`EPSILON`] so that vertices produced by earlier
/// splits snap back onto their plane.
///
/// # Example
///
/// ```rust
/// use config::constants::{EPSILON, PLANE_EPSILON};
///
/// assert!(PLANE_EPSILON > EPSILON);
/// ```
pub const PLANE_EPSILON: f64 = 1e-5;

/// Grid size used to weld nearly-identical vertices.
///
/// Topology checks quantize positions to this grid before comparing
/// edges, so vertices emitted twice by a boolean engine count as one.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_WELD_EPSILON;
///
/// let key = (12.3456789_f64 / VERTEX_WELD_EPSILON).round() as i64;
/// assert_eq!(key, 12_345_679);
/// ```
pub const VERTEX_WELD_EPSILON: f64 = 1e-6;

/// Relative tolerance for surface closure.
///
/// A closed surface has a vanishing net oriented area. The net area vector
/// is compared against the total surface area times this factor.
///
/// # Example
///
/// ```rust
/// use config::constants::CLOSURE_TOLERANCE;
///
/// let total_area = 40_000.0;
/// let net_area = 1e-4;
/// assert!(net_area < total_area * CLOSURE_TOLERANCE);
/// ```
pub const CLOSURE_TOLERANCE: f64 = 1e-6;

/// Distance used to probe either side of a face when classifying it
/// against another solid.
///
/// # Example
///
/// ```rust
/// use config::constants::{CLASSIFY_PROBE_OFFSET, PLANE_EPSILON};
///
/// assert!(CLASSIFY_PROBE_OFFSET > PLANE_EPSILON);
/// ```
pub const CLASSIFY_PROBE_OFFSET: f64 = 1e-4;

/// Distance within which a vertex counts as lying on an edge.
///
/// Boolean results leave vertices on the edges of neighbouring faces
/// (T-junctions); watertightness checks split edges at such vertices.
///
/// # Example
///
/// ```rust
/// use config::constants::{JUNCTION_EPSILON, VERTEX_WELD_EPSILON};
///
/// assert!(JUNCTION_EPSILON >= VERTEX_WELD_EPSILON);
/// ```
pub const JUNCTION_EPSILON: f64 = 1e-5;

/// Minimum area for a 2D footprint or triangle to count as non-degenerate.
pub const MIN_AREA: f64 = 1e-9;

/// Minimum volume for a cutting solid to count as non-degenerate.
pub const MIN_VOLUME: f64 = 1e-9;

// =============================================================================
// TILE DEFAULTS
// =============================================================================

/// Number of boundary connection points on every tile.
///
/// # Example
///
/// ```rust
/// use config::constants::ENDPOINT_COUNT;
///
/// assert_eq!(ENDPOINT_COUNT % 2, 0);
/// ```
pub const ENDPOINT_COUNT: usize = 8;

/// Default tile edge length.
pub const DEFAULT_TILE_SIZE: f64 = 100.0;

/// Default tile thickness.
pub const DEFAULT_TILE_THICKNESS: f64 = 5.0;

/// Default depth of the carved grooves, measured down from the top face.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_CHANNEL_DEPTH, DEFAULT_TILE_THICKNESS};
///
/// assert!(DEFAULT_CHANNEL_DEPTH < DEFAULT_TILE_THICKNESS);
/// ```
pub const DEFAULT_CHANNEL_DEPTH: f64 = 3.0;

/// Default channel half-width.
pub const DEFAULT_PATH_RADIUS: f64 = 2.0;

/// Default radius of the circular pocket marking each endpoint.
pub const DEFAULT_ENDPOINT_DOT_RADIUS: f64 = 6.0;

/// Default number of samples taken along each channel curve.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_CURVE_SAMPLES;
///
/// let step = 1.0 / (DEFAULT_CURVE_SAMPLES - 1) as f64;
/// assert!(step < 0.02);
/// ```
pub const DEFAULT_CURVE_SAMPLES: usize = 64;

/// Default number of tiles exported by the command-line tool.
pub const DEFAULT_SAMPLE_SIZE: usize = 36;

// =============================================================================
// TESSELLATION CONSTANTS
// =============================================================================

/// Default number of segments used for a full circle (marker pockets,
/// round caps and round joins).
pub const DEFAULT_ARC_SEGMENTS: u32 = 32;

/// Minimum number of segments for a full circle.
pub const MIN_ARC_SEGMENTS: u32 = 3;

/// Maximum number of segments for a full circle.
///
/// Safety limit to prevent excessive tessellation.
pub const MAX_ARC_SEGMENTS: u32 = 1000;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Bytes of stack reserved when recursion grows through `stacker`.
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` allocates a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Largest point count accepted by the matching enumerator.
///
/// (N-1)!! grows quickly: 20 points already give 654,729,075 matchings.
///
/// # Example
///
/// ```rust
/// use config::constants::{ENDPOINT_COUNT, MAX_MATCHING_POINTS};
///
/// assert!(ENDPOINT_COUNT <= MAX_MATCHING_POINTS);
/// ```
pub const MAX_MATCHING_POINTS: usize = 16;

/// Maximum number of triangles in a single mesh.
///
/// Boolean engines abort instead of exhausting memory past this bound.
pub const MAX_TRIANGLES: usize = 10_000_000;

/// Length of the binary STL header in bytes.
pub const STL_HEADER_LEN: usize = 80;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Clamps a full-circle segment count into the supported range.
///
/// # Example
///
/// ```rust
/// use config::constants::{clamp_arc_segments, MAX_ARC_SEGMENTS, MIN_ARC_SEGMENTS};
///
/// assert_eq!(clamp_arc_segments(1), MIN_ARC_SEGMENTS);
/// assert_eq!(clamp_arc_segments(64), 64);
/// assert_eq!(clamp_arc_segments(100_000), MAX_ARC_SEGMENTS);
/// ```
#[inline]
pub fn clamp_arc_segments(segments: u32) -> u32 {
    segments.clamp(MIN_ARC_SEGMENTS, MAX_ARC_SEGMENTS)
}

/// Number of segments used for an arc of `sweep` radians when a full
/// circle uses `segments_per_circle` segments. Always at least one.
///
/// # Example
///
/// ```rust
/// use config::constants::arc_fragments;
///
/// // Half circle at 32 segments per turn
/// assert_eq!(arc_fragments(32, std::f64::consts::PI), 16);
/// assert_eq!(arc_fragments(32, 0.0), 1);
/// ```
pub fn arc_fragments(segments_per_circle: u32, sweep: f64) -> u32 {
    let per_circle = clamp_arc_segments(segments_per_circle) as f64;
    // Tolerance keeps exact fractions of a turn from rounding up.
    let fragments = (per_circle * sweep.abs() / std::f64::consts::TAU - 1e-9).ceil();
    if fragments.is_finite() && fragments >= 1.0 {
        fragments as u32
    } else {
        1
    }
}

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
