use camkit_editor::geometry::buffer::{buffer, JoinStyle};
use camkit_editor::{Geometry, Point, Polygon};
use std::f64::consts::PI;

fn unit_square() -> Geometry {
    Geometry::Polygon(Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ]))
}

#[test]
fn test_round_buffer_area() {
    let grown = buffer(&[unit_square()], 0.5, JoinStyle::Round, 128).unwrap();
    let expected = 1.0 + 4.0 * 0.5 + PI * 0.25;
    assert!((grown.area() - expected).abs() < 0.01);
}

#[test]
fn test_inward_buffer_keeps_sharp_corners() {
    let shrunk = buffer(&[unit_square()], -0.25, JoinStyle::Round, 64).unwrap();
    assert!((shrunk.area() - 0.25).abs() < 1e-6);
}

#[test]
fn test_inward_buffer_past_center_is_empty() {
    let gone = buffer(&[unit_square()], -0.6, JoinStyle::Round, 64).unwrap();
    assert!(gone.is_empty());
}

#[test]
fn test_line_buffer_covers_the_line() {
    let line = Geometry::LineString(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
    let swept = buffer(&[line], 0.1, JoinStyle::Round, 64).unwrap();
    assert!(swept.is_polygonal());
    assert!((swept.area() - (2.0 * 0.2 + PI * 0.01)).abs() < 0.01);
}
