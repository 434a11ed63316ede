//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_plane_epsilon_larger_than_epsilon() {
    assert!(
        PLANE_EPSILON >= EPSILON,
        "PLANE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_probe_offset_clears_plane_epsilon() {
    // A probe point must not be classified as lying on its own face
    assert!(CLASSIFY_PROBE_OFFSET > PLANE_EPSILON);
}

#[test]
fn test_junction_epsilon_between_weld_and_probe() {
    assert!(JUNCTION_EPSILON >= VERTEX_WELD_EPSILON);
    assert!(JUNCTION_EPSILON < CLASSIFY_PROBE_OFFSET);
}

#[test]
fn test_weld_epsilon_below_probe_offset() {
    assert!(VERTEX_WELD_EPSILON < CLASSIFY_PROBE_OFFSET);
}

// =============================================================================
// TILE DEFAULT TESTS
// =============================================================================

#[test]
fn test_default_groove_does_not_cut_through() {
    assert!(DEFAULT_CHANNEL_DEPTH < DEFAULT_TILE_THICKNESS);
}

#[test]
fn test_default_markers_do_not_overlap_neighbours() {
    // Neighbouring endpoints on one edge are half a tile apart
    assert!(DEFAULT_TILE_SIZE >= 4.0 * DEFAULT_ENDPOINT_DOT_RADIUS);
}

#[test]
fn test_default_curve_samples_form_a_polyline() {
    assert!(DEFAULT_CURVE_SAMPLES >= 2);
}

#[test]
fn test_endpoint_count_is_even() {
    assert_eq!(ENDPOINT_COUNT % 2, 0);
    assert!(ENDPOINT_COUNT <= MAX_MATCHING_POINTS);
}

// =============================================================================
// ARC SEGMENT TESTS
// =============================================================================

#[test]
fn test_min_arc_segments_at_least_three() {
    // A circle needs at least 3 points to form a polygon
    assert!(MIN_ARC_SEGMENTS >= 3);
}

#[test]
fn test_default_arc_segments_in_range() {
    assert_eq!(clamp_arc_segments(DEFAULT_ARC_SEGMENTS), DEFAULT_ARC_SEGMENTS);
}

#[test]
fn test_arc_fragments_quarter_turn() {
    let fragments = arc_fragments(32, std::f64::consts::FRAC_PI_2);
    assert_eq!(fragments, 8);
}

#[test]
fn test_arc_fragments_rounds_up() {
    // 0.3 of a turn at 10 segments per turn is exactly 3
    assert_eq!(arc_fragments(10, 0.3 * std::f64::consts::TAU), 3);
    // Slightly more needs a fourth segment
    assert_eq!(arc_fragments(10, 0.31 * std::f64::consts::TAU), 4);
}

#[test]
fn test_arc_fragments_clamps_segment_count() {
    // Segment counts below the minimum are raised first
    assert_eq!(arc_fragments(1, std::f64::consts::TAU), MIN_ARC_SEGMENTS);
}

#[test]
fn test_arc_fragments_handles_non_finite_sweep() {
    assert_eq!(arc_fragments(32, f64::NAN), 1);
}

// =============================================================================
// APPROX_EQUAL TESTS
// =============================================================================

#[test]
fn test_approx_equal_within_epsilon() {
    let small_diff = EPSILON / 2.0;
    assert!(approx_equal(1.0, 1.0 + small_diff));
    assert!(approx_equal(1.0, 1.0 - small_diff));
}

#[test]
fn test_approx_equal_outside_epsilon() {
    let large_diff = EPSILON * 2.0;
    assert!(!approx_equal(1.0, 1.0 + large_diff));
    assert!(!approx_equal(1.0, 1.0 - large_diff));
}

#[test]
fn test_approx_zero_exact_zero() {
    assert!(approx_zero(0.0));
    assert!(!approx_zero(0.1));
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_max_triangles_reasonable() {
    assert!(MAX_TRIANGLES >= 1_000_000);
}

#[test]
fn test_stacker_red_zone_fits_stack() {
    assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
}
