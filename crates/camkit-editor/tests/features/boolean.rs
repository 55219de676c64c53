use camkit_editor::geometry::boolean;
use camkit_editor::{Geometry, Point, Polygon};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    Geometry::Polygon(Polygon::new(vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]))
}

#[test]
fn test_union_of_overlapping_squares() {
    let merged = boolean::union(&[rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.0, 1.5, 1.0)]).unwrap();
    assert!((merged.area() - 1.5).abs() < 1e-6);
    assert_eq!(merged.polygons().len(), 1);
}

#[test]
fn test_intersection_of_overlapping_squares() {
    let common =
        boolean::intersection(&[rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.5, 1.5, 1.5)]).unwrap();
    assert!((common.area() - 0.25).abs() < 1e-6);
}

#[test]
fn test_difference_leaves_a_hole() {
    let cut = boolean::difference(&rect(0.0, 0.0, 4.0, 4.0), &rect(1.0, 1.0, 2.0, 2.0)).unwrap();
    assert!((cut.area() - 15.0).abs() < 1e-6);
    assert_eq!(cut.interiors().len(), 1);
}

#[test]
fn test_cut_path_splits_line() {
    let line = Geometry::LineString(vec![Point::new(-1.0, 0.5), Point::new(3.0, 0.5)]);
    let pieces = boolean::cut_path(&line, &[rect(0.0, 0.0, 1.0, 1.0)]).unwrap();
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].paths().len(), 2);
    for p in pieces[0].points() {
        assert!(p.x <= 1e-9 || p.x >= 1.0 - 1e-9);
    }
}
