use camkit_editor::{Geometry, Point, Shape, ShapeId, ShapeStore, StoreError};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn dot(x: f64, y: f64) -> Geometry {
    Geometry::LineString(vec![Point::new(x, y), Point::new(x + 0.5, y)])
}

#[test]
fn test_nearest_on_empty_store() {
    let store = ShapeStore::new();
    assert_eq!(store.nearest(Point::new(0.0, 0.0)).unwrap_err(), StoreError::Empty);
}

#[test]
fn test_nearest_returns_closest_shape() {
    let mut store = ShapeStore::new();
    let far = store.insert(Shape::new(dot(10.0, 10.0)));
    let near = store.insert(Shape::new(dot(1.0, 1.0)));
    let (_, shape) = store.nearest(Point::new(0.0, 0.0)).unwrap();
    assert_eq!(shape.id, near);

    store.remove(near);
    let (_, shape) = store.nearest(Point::new(0.0, 0.0)).unwrap();
    assert_eq!(shape.id, far);
}

#[test]
fn test_nearest_is_stable_between_queries() {
    let mut store = ShapeStore::new();
    store.insert(Shape::new(dot(-1.0, 0.0)));
    store.insert(Shape::new(dot(0.5, 0.0)));
    let first = store.nearest(Point::new(0.0, 0.0)).unwrap().1.id;
    for _ in 0..5 {
        assert_eq!(store.nearest(Point::new(0.0, 0.0)).unwrap().1.id, first);
    }
}

#[test]
fn test_candidates_inside_polygon() {
    let mut store = ShapeStore::new();
    let square = Geometry::Polygon(camkit_editor::Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 4.0),
        Point::new(0.0, 4.0),
    ]));
    let big = store.insert(Shape::new(square));
    let line = store.insert(Shape::new(dot(2.0, 2.0)));
    assert_eq!(store.candidates_at(Point::new(2.2, 2.0), 0.05), vec![big, line]);
    assert!(store.candidates_at(Point::new(9.0, 9.0), 0.05).is_empty());
}

#[test]
fn test_simplified_keys() {
    let mut store = ShapeStore::with_tolerance(0.1);
    let line = Geometry::LineString(vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.001),
        Point::new(2.0, 0.0),
    ]);
    store.insert(Shape::new(line));
    let (p, _) = store.nearest(Point::new(1.0, 0.0)).unwrap();
    assert_ne!(p, Point::new(1.0, 0.001));
}

proptest! {
    #[test]
    fn prop_all_objects_matches_inserted_minus_removed(
        coords in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..40),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
    ) {
        let mut store = ShapeStore::new();
        let mut expected: BTreeSet<ShapeId> = coords
            .iter()
            .map(|(x, y)| store.insert(Shape::new(dot(*x, *y))))
            .collect();
        let ids: Vec<ShapeId> = expected.iter().copied().collect();
        for index in removals {
            let id = *index.get(&ids);
            let removed = store.remove(id).is_some();
            prop_assert_eq!(removed, expected.remove(&id));
        }
        let actual: Vec<ShapeId> = store.all_objects().map(|s| s.id).collect();
        prop_assert_eq!(actual.len(), expected.len());
        prop_assert_eq!(actual.into_iter().collect::<BTreeSet<_>>(), expected);
    }
}
