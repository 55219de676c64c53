use camkit_core::{DiameterKey, MessageLevel, TaskEvent, TaskOutcome, Units};
use camkit_editor::{DrillEditor, DrillObject, DrillPoint, EditorConfig, Key, Point, ToolKind};
use std::collections::BTreeMap;

use super::common::{collaborators, Fakes};

fn holes() -> DrillObject {
    DrillObject {
        name: "holes".to_string(),
        units: Units::Metric,
        tools: BTreeMap::from([(1, 0.8), (2, 1.0)]),
        drills: vec![
            DrillPoint {
                point: Point::new(0.0, 0.0),
                tool: 1,
            },
            DrillPoint {
                point: Point::new(2.0, 0.0),
                tool: 1,
            },
            DrillPoint {
                point: Point::new(4.0, 0.0),
                tool: 2,
            },
        ],
    }
}

fn editor() -> (DrillEditor, Fakes) {
    let (collaborators, fakes) = collaborators();
    let mut editor = DrillEditor::new(EditorConfig::default(), collaborators);
    editor.load(&holes());
    (editor, fakes)
}

fn key(d: f64) -> DiameterKey {
    DiameterKey::new(d, Units::Metric)
}

#[test]
fn test_load_builds_tool_table() {
    let (editor, _fakes) = editor();
    let table = editor.state().tool_table();
    assert_eq!(table.len(), 2);
    assert_eq!((table[0].tool, table[0].diameter, table[0].drills), (1, key(0.8), 2));
    assert_eq!((table[1].tool, table[1].diameter, table[1].drills), (2, key(1.0), 1));
    assert!(!editor.state().is_modified());
    let object = editor.state().to_object();
    assert_eq!(object.name, "holes");
    assert_eq!(object.tools, holes().tools);
    for (drill, original) in object.drills.iter().zip(holes().drills) {
        assert_eq!(drill.tool, original.tool);
        assert!(drill.point.distance_to(&original.point) < 1e-9);
    }
}

#[test]
fn test_unknown_tool_reference_skipped() {
    let (collaborators, _fakes) = collaborators();
    let mut editor = DrillEditor::new(EditorConfig::default(), collaborators);
    let mut object = holes();
    object.drills.push(DrillPoint {
        point: Point::new(9.0, 9.0),
        tool: 7,
    });
    editor.load(&object);
    assert_eq!(editor.state().drill_count(), 3);
}

#[test]
fn test_add_drill_requires_tool() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('d'));
    assert_eq!(editor.active_tool(), Some(ToolKind::Select));
    assert!(fakes.has("To add a drill first select a tool"));
}

#[test]
fn test_add_drill_with_new_tool() {
    let (mut editor, fakes) = editor();
    editor.add_tool(0.5);
    assert!(fakes.has("Added new tool with dia: 0.50 mm"));
    editor.on_key(Key::Char('d'));
    assert_eq!(editor.active_tool(), Some(ToolKind::AddDrill));
    editor.click(3.0, 3.0);
    assert!(fakes.has("Done. Drill added."));
    assert_eq!(editor.state().bucket(key(0.5)).map(|b| b.len()), Some(1));

    let object = editor.state().to_object();
    assert_eq!(object.name, "holes_edit");
    assert_eq!(object.tools.get(&1), Some(&0.5));
    assert!(object
        .drills
        .iter()
        .any(|d| d.tool == 1 && d.point.distance_to(&Point::new(3.0, 3.0)) < 1e-9));
}

#[test]
fn test_duplicate_tool_rejected() {
    let (mut editor, fakes) = editor();
    editor.add_tool(0.8);
    assert!(fakes
        .texts()
        .iter()
        .any(|t| t.starts_with("Tool already in the original or actual tool list")));
    assert_eq!(editor.state().diameters().len(), 2);
}

#[test]
fn test_resize_moves_drills_and_drops_empty_tool() {
    let (mut editor, fakes) = editor();
    editor.select_tool_row(key(0.8));
    assert_eq!(editor.state().selection().len(), 2);

    editor.on_key(Key::Char('r'));
    assert_eq!(editor.active_tool(), Some(ToolKind::ResizeDrill));
    editor.parameters_mut().resize_diameter = Some(1.0);
    editor.on_key(Key::Enter);

    assert!(fakes.has("Done. Drill Resize completed."));
    assert_eq!(editor.state().diameters(), vec![key(1.0)]);
    assert_eq!(editor.state().bucket(key(1.0)).map(|b| b.len()), Some(3));

    for shape in editor.state().bucket(key(1.0)).unwrap().all_objects() {
        let strokes = shape.geometry.paths();
        assert_eq!(strokes.len(), 2);
        for stroke in &strokes {
            assert!((stroke[0].distance_to(&stroke[1]) - 1.0).abs() < 1e-9);
        }
        let horizontal = &strokes[0];
        let vertical = &strokes[1];
        let mid = Point::new(
            (horizontal[0].x + horizontal[1].x) / 2.0,
            (horizontal[0].y + horizontal[1].y) / 2.0,
        );
        assert!(mid.distance_to(&Point::new(
            (vertical[0].x + vertical[1].x) / 2.0,
            (vertical[0].y + vertical[1].y) / 2.0,
        )) < 1e-9);
        assert!(mid.y.abs() < 1e-9);
    }

    let object = editor.state().to_object();
    assert_eq!(object.tools, BTreeMap::from([(1, 1.0)]));
    let mut xs: Vec<f64> = object.drills.iter().map(|d| d.point.x).collect();
    xs.sort_by(f64::total_cmp);
    for (x, expected) in xs.iter().zip([0.0, 2.0, 4.0]) {
        assert!((x - expected).abs() < 1e-9);
    }
}

#[test]
fn test_resize_without_diameter_aborts() {
    let (mut editor, fakes) = editor();
    editor.click_release(0.0, 0.0);
    editor.on_key(Key::Char('r'));
    editor.on_key(Key::Enter);
    assert!(fakes.has("Resize drill(s) failed. Please enter a diameter for resize."));
    assert_eq!(editor.state().drill_count(), 3);
    assert!(editor.state().selection().is_empty());
}

#[test]
fn test_click_selects_drill_and_its_tool() {
    let (mut editor, _fakes) = editor();
    editor.click_release(4.0, 0.0);
    assert_eq!(editor.state().selection().len(), 1);
    assert_eq!(editor.state().active(), Some(key(1.0)));
}

#[test]
fn test_copy_and_move_need_selection() {
    let (mut editor, fakes) = editor();
    editor.on_key(Key::Char('c'));
    editor.on_key(Key::Char('m'));
    assert!(fakes.has_at(MessageLevel::Warning, "Cancelled. Nothing selected to copy."));
    assert!(fakes.has_at(MessageLevel::Warning, "Cancelled. Nothing selected to move."));
    assert_eq!(editor.active_tool(), Some(ToolKind::Select));
}

#[test]
fn test_move_selected_drill() {
    let (mut editor, fakes) = editor();
    editor.click_release(4.0, 0.0);
    editor.pointer_move(4.0, 0.0);
    editor.on_key(Key::Char('m'));
    assert_eq!(editor.active_tool(), Some(ToolKind::Move));
    editor.click(4.0, 3.0);

    assert!(fakes.has("Done. Drill(s) Move completed."));
    assert!(editor.state().selection().is_empty());
    let object = editor.state().to_object();
    let moved = object.drills.iter().find(|d| d.tool == 2).unwrap();
    assert!(moved.point.distance_to(&Point::new(4.0, 3.0)) < 1e-9);
}

#[test]
fn test_delete_selected_prunes_tool() {
    let (mut editor, fakes) = editor();
    editor.click_release(4.0, 0.0);
    editor.on_key(Key::Delete);
    assert!(fakes.has("Done. Drill(s) deleted."));
    assert_eq!(editor.state().diameters(), vec![key(0.8)]);
}

#[test]
fn test_delete_tools_reports_each() {
    let (mut editor, fakes) = editor();
    editor.delete_tools(&[key(0.8), key(1.0)]);
    assert!(fakes.has("Deleted tool with dia: 0.80 mm"));
    assert!(fakes.has("Deleted tool with dia: 1.00 mm"));
    assert_eq!(editor.state().drill_count(), 0);

    editor.delete_tools(&[]);
    assert!(fakes.has("Select a tool in Tool Table"));
}

#[test]
fn test_edit_tool_diameter_merges_buckets() {
    let (mut editor, fakes) = editor();
    editor.edit_tool_diameter(key(0.8), 1.0);
    assert!(fakes.has("Tool was edited in Tool Table."));
    assert_eq!(editor.state().diameters(), vec![key(1.0)]);
    assert_eq!(editor.state().drill_count(), 3);
}

#[test]
fn test_linear_array() {
    let (mut editor, fakes) = editor();
    editor.select_tool_row(key(1.0));
    editor.parameters_mut().drill_array.size = 4;
    editor.parameters_mut().drill_array.pitch = 1.0;
    editor.on_key(Key::Char('a'));
    assert_eq!(editor.active_tool(), Some(ToolKind::AddDrillArray));
    editor.click(0.0, 5.0);
    assert!(fakes.has("Done. Drill Array added."));
    assert_eq!(editor.state().bucket(key(1.0)).map(|b| b.len()), Some(5));
}

#[test]
fn test_finalize_failure_reported() {
    let (mut editor, mut fakes) = editor();
    let id = editor.finalize().unwrap();
    let request = fakes.requests.try_recv().unwrap();
    assert_eq!(request.name, "excellon_edit_finished");

    editor.on_task_event(&TaskEvent {
        id,
        name: request.name,
        outcome: TaskOutcome::Failed {
            reason: "disk full".to_string(),
        },
    });
    assert!(fakes.has_at(MessageLevel::Error, "disk full"));
    assert_eq!(editor.pending_job(), None);
}

fn invalid_diameter(fakes: &Fakes, name: &str) -> bool {
    let prefix = format!("Invalid value for {}", name);
    fakes.texts().iter().any(|t| t.starts_with(&prefix))
}

#[test]
fn test_tool_below_precision_rejected() {
    let (mut editor, fakes) = editor();
    editor.add_tool(0.004);
    assert!(invalid_diameter(&fakes, "tool diameter"));
    assert!(!fakes.has("Added new tool with dia: 0.00 mm"));
    assert_eq!(editor.state().diameters(), vec![key(0.8), key(1.0)]);
    assert!(!editor.state().is_modified());
}

#[test]
fn test_edit_to_zero_diameter_rejected() {
    let (mut editor, fakes) = editor();
    editor.edit_tool_diameter(key(0.8), 0.004);
    assert!(invalid_diameter(&fakes, "tool diameter"));
    assert_eq!(editor.state().to_object().tools, holes().tools);
}

#[test]
fn test_resize_to_zero_diameter_rejected() {
    let (mut editor, fakes) = editor();
    editor.select_tool_row(key(0.8));
    editor.on_key(Key::Char('r'));
    editor.parameters_mut().resize_diameter = Some(0.004);
    editor.on_key(Key::Enter);
    assert!(invalid_diameter(&fakes, "resize diameter"));
    assert_eq!(editor.state().diameters(), vec![key(0.8), key(1.0)]);
    assert_eq!(editor.state().drill_count(), 3);

    editor.select_tool_row(key(0.8));
    let result = editor.state_mut().resize_selected(0.004);
    assert!(result.is_err());
    assert_eq!(editor.state().to_object().tools, holes().tools);
}

#[test]
fn test_load_skips_zero_diameter_tool() {
    let (collaborators, _fakes) = collaborators();
    let mut editor = DrillEditor::new(EditorConfig::default(), collaborators);
    let mut object = holes();
    object.tools.insert(3, 0.001);
    object.drills.push(DrillPoint {
        point: Point::new(7.0, 7.0),
        tool: 3,
    });
    editor.load(&object);
    assert_eq!(editor.state().diameters(), vec![key(0.8), key(1.0)]);
    assert_eq!(editor.state().drill_count(), 3);
    assert!(editor
        .state()
        .to_object()
        .tools
        .values()
        .all(|d| *d > 0.0));
}
