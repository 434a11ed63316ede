//! # Extrusion Tests

use super::*;
use crate::ops::triangulate::Triangulator;
use crate::validate::{check_closed_oriented, check_cutter};
use approx::assert_relative_eq;

fn ring_with_hole() -> Polygon2D {
    Polygon2D::with_holes(
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(10.0, 0.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(0.0, 10.0),
        ],
        vec![vec![
            DVec2::new(4.0, 4.0),
            DVec2::new(6.0, 4.0),
            DVec2::new(6.0, 6.0),
            DVec2::new(4.0, 6.0),
        ]],
    )
}

// =============================================================================
// POLYGON2D TESTS
// =============================================================================

#[test]
fn test_normalized_orients_rings() {
    let polygon = ring_with_hole().normalized();
    assert!(ring_signed_area(&polygon.outer) > 0.0);
    assert!(ring_signed_area(&polygon.holes[0]) < 0.0);
}

#[test]
fn test_normalized_drops_repeated_vertices() {
    let polygon = Polygon2D::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(0.0, 0.0),
    ])
    .normalized();
    assert_eq!(polygon.vertex_count(), 3);
}

#[test]
fn test_area_subtracts_holes() {
    assert_relative_eq!(ring_with_hole().area(), 96.0, epsilon = 1e-12);
}

#[test]
fn test_geo_conversion_keeps_rings_open() {
    let polygon = ring_with_hole();
    let back = Polygon2D::from_geo(&polygon.to_geo());
    assert_eq!(back.outer.len(), 4);
    assert_eq!(back.holes.len(), 1);
    assert_eq!(back.holes[0].len(), 4);
}

#[test]
fn test_circle_translates() {
    let mut circle = Polygon2D::circle(DVec2::ZERO, 5.0, 32);
    circle.translate(DVec2::new(10.0, 0.0));
    assert!(circle.outer.iter().all(|v| v.x >= 5.0 - 1e-9));
}

// =============================================================================
// LINEAR EXTRUDE TESTS
// =============================================================================

#[test]
fn test_linear_extrude_square() {
    let square = Polygon2D::square(DVec2::splat(10.0), false);
    let params = LinearExtrudeParams {
        height: 20.0,
        ..Default::default()
    };
    let mesh = linear_extrude(&square, &params).unwrap();

    // 4 bottom + 4 top
    assert_eq!(mesh.vertex_count(), 8);
    // 8 wall + 2 bottom + 2 top
    assert_eq!(mesh.triangle_count(), 12);
    assert_relative_eq!(mesh.signed_volume(), 2000.0, epsilon = 1e-9);
}

#[test]
fn test_linear_extrude_centered() {
    let square = Polygon2D::square(DVec2::splat(10.0), true);
    let params = LinearExtrudeParams {
        height: 20.0,
        center: true,
        ..Default::default()
    };
    let mesh = linear_extrude(&square, &params).unwrap();

    let (min, max) = mesh.bounding_box();
    assert_relative_eq!(min.z, -10.0);
    assert_relative_eq!(max.z, 10.0);
}

#[test]
fn test_clockwise_input_still_faces_outward() {
    let mut square = Polygon2D::square(DVec2::splat(2.0), false);
    square.outer.reverse();
    let mesh = linear_extrude(&square, &LinearExtrudeParams::default()).unwrap();
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_extrusion_with_hole_is_closed() {
    for triangulator in Triangulator::ALL {
        let params = LinearExtrudeParams {
            height: 3.0,
            center: false,
            triangulator,
        };
        let mesh = linear_extrude(&ring_with_hole(), &params).unwrap();
        check_closed_oriented(&mesh).unwrap();
        assert_relative_eq!(check_cutter(&mesh).unwrap(), 288.0, epsilon = 1e-9);
    }
}

#[test]
fn test_circle_prism_is_valid_cutter() {
    let circle = Polygon2D::circle(DVec2::new(25.0, 100.0), 6.0, 32);
    let mesh = linear_extrude(&circle, &LinearExtrudeParams::default()).unwrap();
    assert!(check_cutter(&mesh).unwrap() > 0.0);
}

#[test]
fn test_linear_extrude_rejects_zero_height() {
    let square = Polygon2D::square(DVec2::splat(1.0), false);
    let params = LinearExtrudeParams {
        height: 0.0,
        ..Default::default()
    };
    assert!(linear_extrude(&square, &params).is_err());
}

#[test]
fn test_linear_extrude_rejects_flat_polygon() {
    let line = Polygon2D::new(vec![DVec2::ZERO, DVec2::X, DVec2::new(2.0, 0.0)]);
    assert!(linear_extrude(&line, &LinearExtrudeParams::default()).is_err());
}
