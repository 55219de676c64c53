use camkit_core::{JobId, MessageLevel, TaskEvent, TaskOutcome};
use camkit_editor::geometry::buffer::JoinStyle;
use camkit_editor::geometry::paint::{PaintMethod, PaintParams};
use camkit_editor::tools::{BufferKind, BufferParams};
use camkit_editor::{
    EditorConfig, GeometryEditor, GeometryObject, Geometry, Key, Modifiers, Point, Polygon,
    ToolKind,
};

use super::common::{collaborators, rect, Fakes};

fn editor() -> (GeometryEditor, Fakes) {
    let (collaborators, fakes) = collaborators();
    (GeometryEditor::new(EditorConfig::default(), collaborators), fakes)
}

fn loaded(geometry: Vec<Geometry>) -> (GeometryEditor, Fakes) {
    let (mut editor, fakes) = editor();
    editor.load(&GeometryObject {
        name: "board".to_string(),
        geometry,
    });
    (editor, fakes)
}

fn select_everything(editor: &mut GeometryEditor) {
    editor.select_area(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
}

#[test]
fn test_new_editor_starts_with_select_tool() {
    let (editor, fakes) = editor();
    assert_eq!(editor.active_tool(), Some(ToolKind::Select));
    assert!(fakes.renderer.0.lock().frames() >= 1);
    assert!(fakes.log.is_empty());
}

#[test]
fn test_draw_rectangle() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('r'));
    assert_eq!(editor.active_tool(), Some(ToolKind::Rectangle));
    editor.click(0.0, 0.0);
    editor.pointer_move(0.5, 0.5);
    assert_eq!(editor.utility().len(), 1);
    editor.click(1.0, 2.0);

    assert_eq!(editor.state().store().len(), 1);
    assert_eq!(editor.active_tool(), Some(ToolKind::Select));
    assert!(editor.utility().is_empty());
    assert!(fakes.has("Click on 1st corner ..."));
    assert!(fakes.has("Done."));

    let renderer = fakes.renderer.0.lock();
    assert_eq!(renderer.frame().len(), 1);
    assert_eq!(renderer.count_with_color("#FF0000"), 1);
}

#[test]
fn test_click_snaps_to_grid() {
    let (mut editor, _fakes) = editor();
    editor.on_key(Key::Char('o'));
    editor.click(0.02, -0.03);
    editor.click(1.04, 0.01);
    let shape = editor.state().store().all_objects().next().cloned().unwrap();
    let bounds = shape.geometry.bounds().unwrap();
    assert!((bounds.center().0).abs() < 1e-9);
    assert!((bounds.width() - 2.0).abs() < 1e-6);
}

#[test]
fn test_polygon_without_points_keeps_tool() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('n'));
    editor.on_key(Key::Enter);
    assert!(editor.state().store().is_empty());
    assert_eq!(editor.active_tool(), Some(ToolKind::Polygon));

    editor.on_key(Key::Escape);
    assert_eq!(editor.active_tool(), Some(ToolKind::Select));
    assert!(fakes.has_at(MessageLevel::Warning, "Cancelled."));
}

#[test]
fn test_polygon_finished_with_enter() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('n'));
    for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (5.0, 5.0)] {
        editor.click(x, y);
    }
    editor.on_key(Key::Backspace);
    assert!(fakes.has("3 point(s) left."));
    editor.on_key(Key::Enter);
    let store = editor.state().store();
    assert_eq!(store.len(), 1);
    let area: f64 = store.all_objects().map(|s| s.geometry.area()).sum();
    assert!((area - 2.0).abs() < 1e-9);
}

#[test]
fn test_click_selects_and_modifier_toggles() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0), rect(3.0, 0.0, 4.0, 1.0)]);
    editor.click_release(0.5, 0.5);
    assert_eq!(editor.state().selection().len(), 1);

    editor.set_modifiers(Modifiers {
        control: true,
        shift: false,
    });
    editor.click_release(3.5, 0.5);
    assert_eq!(editor.state().selection().len(), 2);

    let renderer = fakes.renderer.0.lock();
    assert_eq!(renderer.count_with_color("#0000FF"), 2);
}

#[test]
fn test_area_selection_direction() {
    let (mut editor, _fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.5, 3.0, 3.0)]);
    editor.select_area(Point::new(-1.0, -1.0), Point::new(2.0, 2.0));
    assert_eq!(editor.state().selection().len(), 1);
    editor.select_area(Point::new(2.0, 2.0), Point::new(-1.0, -1.0));
    assert_eq!(editor.state().selection().len(), 2);
}

#[test]
fn test_union_replaces_selection() {
    let (mut editor, _fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.0, 1.5, 1.0)]);
    select_everything(&mut editor);
    editor.union();
    let store = editor.state().store();
    assert_eq!(store.len(), 1);
    let merged = &store.all_objects().next().unwrap().geometry;
    assert!((merged.area() - 1.5).abs() < 1e-6);
    assert!(editor.state().selection().is_empty());
}

#[test]
fn test_subtract_needs_two_shapes() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0)]);
    select_everything(&mut editor);
    editor.subtract();
    assert!(fakes.has("Nothing selected for subtraction."));
    assert_eq!(editor.state().store().len(), 1);
}

#[test]
fn test_cut_path_keeps_cutters() {
    let (mut editor, _fakes) = editor();
    editor
        .state_mut()
        .insert(Geometry::LineString(vec![Point::new(-1.0, 0.5), Point::new(3.0, 0.5)]));
    editor.state_mut().insert(rect(0.0, 0.0, 1.0, 1.0));
    let ids = editor.state().store().ids();
    editor.click_release(-0.5, 0.5);
    editor.set_modifiers(Modifiers {
        control: true,
        shift: false,
    });
    editor.click_release(0.5, 0.9);
    assert_eq!(editor.state().selection().selected(), ids.as_slice());

    editor.on_key(Key::Char('x'));
    let store = editor.state().store();
    assert_eq!(store.len(), 2);
    assert!(store.contains(ids[1]));
}

#[test]
fn test_negative_buffer_rejected() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0)]);
    select_everything(&mut editor);
    editor.buffer(BufferParams {
        distance: -0.1,
        join: JoinStyle::Round,
        kind: BufferKind::Full,
    });
    assert_eq!(editor.state().store().len(), 1);
    assert!(editor.state().selection().is_empty());
    assert!(fakes.texts().iter().any(|t| t.starts_with("Negative buffer value")));
}

#[test]
fn test_interior_buffer_through_tool() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 2.0, 2.0)]);
    select_everything(&mut editor);
    editor.parameters_mut().buffer = BufferParams {
        distance: 0.5,
        join: JoinStyle::Square,
        kind: BufferKind::Interior,
    };
    editor.on_key(Key::Char('b'));
    editor.on_key(Key::Enter);

    assert!(fakes.has("Interior buffer geometry created."));
    let store = editor.state().store();
    assert_eq!(store.len(), 1);
    let ring = &store.all_objects().next().unwrap().geometry;
    assert!(matches!(ring, Geometry::LinearRing(_)));
    let bounds = ring.bounds().unwrap();
    assert!((bounds.width() - 1.0).abs() < 1e-6);
}

#[test]
fn test_move_from_cursor() {
    let (mut editor, _fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0)]);
    select_everything(&mut editor);
    editor.pointer_move(0.0, 0.0);
    editor.on_key(Key::Char('m'));
    editor.click(2.0, 1.0);

    let store = editor.state().store();
    assert_eq!(store.len(), 1);
    let bounds = store.all_objects().next().unwrap().geometry.bounds().unwrap();
    assert!((bounds.min_x - 2.0).abs() < 1e-9 && (bounds.min_y - 1.0).abs() < 1e-9);
    assert!(editor.state().selection().is_empty());
}

#[test]
fn test_copy_keeps_original() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0)]);
    select_everything(&mut editor);
    editor.pointer_move(0.0, 0.0);
    editor.on_key(Key::Char('c'));
    assert!(fakes.has("Click on target point."));
    editor.click(0.0, 3.0);
    assert_eq!(editor.state().store().len(), 2);
}

#[test]
fn test_snap_toggles() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('g'));
    editor.on_key(Key::Char('k'));
    assert!(fakes.has("Grid snap: OFF"));
    assert!(fakes.has("Corner snap: ON"));
    assert!(!editor.state().snap_engine().options.grid_snap);
}

#[test]
fn test_text_placed_at_click() {
    let (mut editor, _fakes) = editor();
    editor.parameters_mut().text.text = "ab".to_string();
    editor.on_key(Key::Char('t'));
    assert_eq!(editor.active_tool(), Some(ToolKind::Text));
    editor.click(5.0, 5.0);
    let store = editor.state().store();
    assert_eq!(store.len(), 1);
    let bounds = store.all_objects().next().unwrap().geometry.bounds().unwrap();
    assert!((bounds.min_x - 5.0).abs() < 1e-9 && (bounds.min_y - 5.0).abs() < 1e-9);
}

#[test]
fn test_text_without_content_falls_back_to_select() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('t'));
    assert_eq!(editor.active_tool(), Some(ToolKind::Select));
    assert!(!fakes.log.is_empty());
}

#[test]
fn test_load_splits_polygon_rings() {
    let square = |s: f64| {
        vec![
            Point::new(-s, -s),
            Point::new(s, -s),
            Point::new(s, s),
            Point::new(-s, s),
        ]
    };
    let (editor, _fakes) = loaded(vec![Geometry::Polygon(Polygon::with_interiors(
        square(2.0),
        vec![square(1.0)],
    ))]);
    assert_eq!(editor.state().store().len(), 2);
    assert_eq!(editor.state().name(), "board");
}

#[test]
fn test_finalize_submits_and_reports() {
    let (mut editor, mut fakes) = loaded(vec![rect(0.0, 0.0, 1.0, 1.0)]);
    let id = editor.finalize().unwrap();
    assert_eq!(editor.pending_job(), Some(id));
    assert_eq!(editor.active_tool(), None);

    let request = fakes.requests.try_recv().unwrap();
    assert_eq!(request.id, id);
    assert_eq!(request.name, "geometry_edit_finished");
    let object: GeometryObject = serde_json::from_value(request.params).unwrap();
    assert_eq!(object.name, "board");
    assert_eq!(object.geometry.len(), 1);

    editor.on_task_event(&TaskEvent {
        id: JobId::new(),
        name: request.name.clone(),
        outcome: TaskOutcome::Completed {
            output: "other".to_string(),
        },
    });
    assert_eq!(editor.pending_job(), Some(id));

    editor.on_task_event(&TaskEvent {
        id,
        name: request.name,
        outcome: TaskOutcome::Completed {
            output: "board".to_string(),
        },
    });
    assert_eq!(editor.pending_job(), None);
    assert!(fakes.has_at(MessageLevel::Success, "Geometry editing finished."));
    assert!(fakes.has("Output: board"));
}

#[test]
fn test_paint_keeps_regions_and_fills_each() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 2.0, 2.0), rect(3.0, 0.0, 5.0, 2.0)]);
    let regions = editor.state().store().ids();
    select_everything(&mut editor);
    editor.paint(PaintParams {
        tool_diameter: 0.1,
        overlap: 0.15,
        method: PaintMethod::Standard,
        ..Default::default()
    });

    assert!(fakes.has_at(MessageLevel::Success, "Paint done."));
    let store = editor.state().store();
    assert!(regions.iter().all(|id| store.contains(*id)));
    let passes: Vec<_> = store
        .all_objects()
        .filter(|shape| !regions.contains(&shape.id))
        .filter_map(|shape| shape.geometry.bounds())
        .collect();
    assert!(passes.iter().any(|b| b.max_x <= 2.0 + 1e-6));
    assert!(passes.iter().any(|b| b.min_x >= 3.0 - 1e-6));
    assert!(passes.iter().all(|b| b.max_x <= 2.0 + 1e-6 || b.min_x >= 3.0 - 1e-6));
}

#[test]
fn test_paint_overlap_error_leaves_store() {
    let (mut editor, fakes) = loaded(vec![rect(0.0, 0.0, 2.0, 2.0), rect(3.0, 0.0, 5.0, 2.0)]);
    let before = editor.state().to_object();
    select_everything(&mut editor);
    assert_eq!(editor.state().selection().len(), 2);
    editor.paint(PaintParams {
        tool_diameter: 0.5,
        overlap: 0.15,
        ..Default::default()
    });

    assert!(fakes.has_at(
        MessageLevel::Error,
        "Could not do Paint. Overlap value has to be less than Tool Dia value."
    ));
    assert_eq!(editor.state().to_object(), before);
    assert!(editor.state().selection().is_empty());
}
