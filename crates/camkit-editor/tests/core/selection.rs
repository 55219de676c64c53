use camkit_editor::{Geometry, Point, SelectionManager, Shape, ShapeId, ShapeStore};

#[test]
fn test_selection_never_holds_duplicates() {
    let (a, b) = (ShapeId::next(), ShapeId::next());
    let mut selection = SelectionManager::new();
    selection.replace([a, b, a]);
    assert_eq!(selection.selected(), &[b, a]);
}

#[test]
fn test_cycling_through_stacked_shapes() {
    let ids: Vec<ShapeId> = (0..3).map(|_| ShapeId::next()).collect();
    let mut selection = SelectionManager::new();
    let picked: Vec<ShapeId> = (0..4)
        .filter_map(|_| selection.select_candidate(&ids, false))
        .collect();
    assert_eq!(picked, vec![ids[0], ids[1], ids[2], ids[0]]);
    assert_eq!(selection.cycle_index(), 0);
}

#[test]
fn test_new_stack_restarts_cycle() {
    let (a, b, c) = (ShapeId::next(), ShapeId::next(), ShapeId::next());
    let mut selection = SelectionManager::new();
    selection.select_candidate(&[a, b], false);
    selection.select_candidate(&[a, b], false);
    assert_eq!(selection.select_candidate(&[c, a], false), Some(c));
}

#[test]
fn test_retain_existing_drops_removed_shapes() {
    let mut store = ShapeStore::new();
    let line = |x: f64| Geometry::LineString(vec![Point::new(x, 0.0), Point::new(x, 1.0)]);
    let a = store.insert(Shape::new(line(0.0)));
    let b = store.insert(Shape::new(line(1.0)));
    let mut selection = SelectionManager::new();
    selection.replace([a, b]);
    store.remove(a);
    selection.retain_existing(&store);
    assert_eq!(selection.selected(), &[b]);
}
