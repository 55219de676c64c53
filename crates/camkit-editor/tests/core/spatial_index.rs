use camkit_editor::spatial_index::{Bounds, SpatialIndex};
use camkit_editor::Point;

#[test]
fn test_bounds_creation() {
    let bounds = Bounds::new(10.0, 0.0, 0.0, 10.0);
    assert_eq!(bounds.min_x, 0.0);
    assert_eq!(bounds.max_x, 10.0);
    assert_eq!(bounds.width(), 10.0);
    assert_eq!(bounds.center(), (5.0, 5.0));
}

#[test]
fn test_bounds_intersection() {
    let b1 = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b2 = Bounds::new(5.0, 5.0, 15.0, 15.0);
    let b3 = Bounds::new(20.0, 20.0, 30.0, 30.0);

    assert!(b1.intersects(&b2));
    assert!(b2.intersects(&b1));
    assert!(!b1.intersects(&b3));
}

#[test]
fn test_nearest_distance() {
    let mut index = SpatialIndex::default();
    index.insert(1u32, Point::new(0.0, 0.0));
    let (p, key) = index.nearest(Point::new(3.0, 4.0)).unwrap();
    assert_eq!(key, 1);
    assert_eq!(p.distance_to(&Point::new(3.0, 4.0)), 5.0);
}

#[test]
fn test_nearest_picks_closest_of_many() {
    let mut index = SpatialIndex::new(Bounds::new(-100.0, -100.0, 100.0, 100.0), 8, 4);
    for i in 0..50u32 {
        index.insert(i, Point::new(i as f64, (i % 7) as f64));
    }
    let (_, key) = index.nearest(Point::new(20.2, 6.1)).unwrap();
    assert_eq!(key, 20);
    assert_eq!(index.len(), 50);
    assert!(index.stats().total_nodes > 1);
}

#[test]
fn test_remove_and_within() {
    let mut index = SpatialIndex::default();
    index.insert("a", Point::new(0.0, 0.0));
    index.insert("b", Point::new(1.0, 0.0));
    index.insert("c", Point::new(5.0, 0.0));
    assert_eq!(index.within(Point::new(0.5, 0.0), 1.0).len(), 2);
    assert!(index.remove(&"b", Point::new(1.0, 0.0)));
    assert!(!index.remove(&"b", Point::new(1.0, 0.0)));
    assert_eq!(index.within(Point::new(0.5, 0.0), 1.0).len(), 1);
}

#[test]
fn test_empty_index_has_no_nearest() {
    let index: SpatialIndex<u32> = SpatialIndex::default();
    assert!(index.is_empty());
    assert!(index.nearest(Point::new(1.0, 1.0)).is_none());
}
