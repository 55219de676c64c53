//! Click selection for the geometry and drill editors.

use super::{EditorView, Status, Tool, ToolKind, ToolOutput};
use crate::geometry::{Geometry, Point};

/// Selects the shape under the cursor on release.
///
/// Repeated releases over the same stack of shapes cycle through it; the
/// session keeps the cycle position.
#[derive(Debug, Default)]
pub struct SelectTool {
    output: Option<ToolOutput>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn start_message(&self) -> &str {
        "Click on a shape to select it."
    }

    fn click(&mut self, _view: &dyn EditorView, _point: Point) -> Option<Status> {
        None
    }

    fn click_release(&mut self, view: &dyn EditorView, point: Point) -> Option<Status> {
        let mut candidates = view.candidates_at(point);
        if candidates.is_empty() {
            candidates.extend(view.nearest_shape(point).map(|(id, _)| id));
        }
        let toggle = view
            .config()
            .drawing
            .multi_select
            .is_held(view.modifiers());
        self.output = Some(ToolOutput::Select { candidates, toggle });
        None
    }

    fn preview(&self, _view: &dyn EditorView, _cursor: Point) -> Vec<Geometry> {
        Vec::new()
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

/// Window around a drill marker in which a click selects it.
///
/// `x0`/`y0` is the start of the marker's horizontal stroke and `delta` its
/// length (the drill diameter).
pub fn drill_pick_window(marker: &Geometry) -> Option<(Point, Point)> {
    let Geometry::MultiLineString(lines) = marker else {
        return None;
    };
    let stroke = lines.first()?;
    let (start, end) = (stroke.first()?, stroke.get(1)?);
    let delta = end.x - start.x;
    Some((
        Point::new(start.x - 0.7 * delta, start.y - 0.7 * delta),
        Point::new(start.x + 1.7 * delta, start.y + 1.7 * delta),
    ))
}

/// Drill editor selection: nearest marker across every diameter.
#[derive(Debug, Default)]
pub struct DrillSelectTool {
    output: Option<ToolOutput>,
}

impl DrillSelectTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for DrillSelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn start_message(&self) -> &str {
        "Click on a drill to select it."
    }

    fn click(&mut self, view: &dyn EditorView, _point: Point) -> Option<Status> {
        let multi = view
            .config()
            .drawing
            .multi_select
            .is_held(view.modifiers());
        if !multi {
            self.output = Some(ToolOutput::ClearSelection);
        }
        None
    }

    fn click_release(&mut self, view: &dyn EditorView, point: Point) -> Option<Status> {
        let Some((id, marker)) = view.nearest_shape(point) else {
            return None;
        };
        let inside = drill_pick_window(marker).is_some_and(|(min, max)| {
            point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
        });
        self.output = Some(if inside {
            let toggle = view
                .config()
                .drawing
                .multi_select
                .is_held(view.modifiers());
            ToolOutput::Select {
                candidates: vec![id],
                toggle,
            }
        } else {
            ToolOutput::ClearSelection
        });
        None
    }

    fn preview(&self, _view: &dyn EditorView, _cursor: Point) -> Vec<Geometry> {
        Vec::new()
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}
