use camkit_editor::{Geometry, Point, Shape, ShapeStore, SnapEngine, SnapOptions};
use proptest::prelude::*;

fn close(a: Point, b: Point) -> bool {
    a.distance_to(&b) < 1e-9
}

#[test]
fn test_grid_snap() {
    let engine = SnapEngine::new(SnapOptions::default());
    let store = ShapeStore::new();
    assert!(close(engine.snap(0.17, 0.04, &store), Point::new(0.2, 0.0)));
}

#[test]
fn test_unlinked_grid_uses_own_y_spacing() {
    let engine = SnapEngine::new(SnapOptions {
        grid_x: 1.0,
        grid_y: 0.25,
        link_grid: false,
        ..Default::default()
    });
    let store = ShapeStore::new();
    assert!(close(engine.snap(1.4, 0.3, &store), Point::new(1.0, 0.25)));
}

#[test]
fn test_feature_beats_farther_grid_point() {
    let mut store = ShapeStore::new();
    store.insert(Shape::new(Geometry::LineString(vec![
        Point::new(1.0, 1.0),
        Point::new(3.0, 3.0),
    ])));
    let engine = SnapEngine::new(SnapOptions {
        grid_x: 0.3,
        grid_y: 0.3,
        snap_max: 0.05,
        corner_snap: true,
        ..Default::default()
    });
    assert!(close(engine.snap(1.02, 1.01, &store), Point::new(1.0, 1.0)));
}

#[test]
fn test_feature_outside_snap_distance_is_ignored() {
    let mut store = ShapeStore::new();
    store.insert(Shape::new(Geometry::LineString(vec![
        Point::new(1.0, 1.0),
        Point::new(3.0, 3.0),
    ])));
    let engine = SnapEngine::new(SnapOptions {
        grid_snap: false,
        corner_snap: true,
        snap_max: 0.05,
        ..Default::default()
    });
    assert!(close(engine.snap(1.2, 1.0, &store), Point::new(1.2, 1.0)));
}

proptest! {
    #[test]
    fn prop_grid_snap_is_idempotent(x in -100.0f64..100.0, y in -100.0f64..100.0) {
        let engine = SnapEngine::new(SnapOptions {
            grid_x: 0.5,
            ..Default::default()
        });
        let store = ShapeStore::new();
        let once = engine.snap(x, y, &store);
        let twice = engine.snap(once.x, once.y, &store);
        prop_assert!(close(once, twice));
    }
}
