//! Tools that transform the current selection.

use super::{EditorView, Status, Tool, ToolKind, ToolOutput};
use crate::error::EditError;
use crate::geometry::{Affine, Geometry, Point};

/// Rotation applied by the rotate tool, in degrees
pub const ROTATE_ANGLE: f64 = -90.0;

/// Reference point then destination; moves or copies the selection.
#[derive(Debug)]
pub struct MoveTool {
    copy: bool,
    origin: Option<Point>,
    output: Option<ToolOutput>,
    complete: bool,
}

impl MoveTool {
    pub fn moving() -> Self {
        Self {
            copy: false,
            origin: None,
            output: None,
            complete: false,
        }
    }

    pub fn copying() -> Self {
        Self {
            copy: true,
            ..Self::moving()
        }
    }

    pub fn origin(&self) -> Option<Point> {
        self.origin
    }
}

impl Tool for MoveTool {
    fn kind(&self) -> ToolKind {
        if self.copy {
            ToolKind::Copy
        } else {
            ToolKind::Move
        }
    }

    fn start_message(&self) -> &str {
        "Click on reference point."
    }

    fn click(&mut self, view: &dyn EditorView, point: Point) -> Option<Status> {
        if view.selected_geometry().is_empty() {
            return Some(Status::warning(EditError::NothingToMove.to_string()));
        }
        match self.origin {
            None => {
                self.origin = Some(point);
                Some(Status::info("Click on final location."))
            }
            Some(origin) => {
                self.output = Some(ToolOutput::Translate {
                    dx: point.x - origin.x,
                    dy: point.y - origin.y,
                    copy: self.copy,
                });
                self.complete = true;
                Some(Status::info("Done."))
            }
        }
    }

    fn preview(&self, view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        let Some(origin) = self.origin else {
            return Vec::new();
        };
        let (dx, dy) = (cursor.x - origin.x, cursor.y - origin.y);
        view.selected_geometry()
            .into_iter()
            .map(|(_, geometry)| geometry.translated(dx, dy))
            .collect()
    }

    fn set_origin(&mut self, origin: Point) {
        self.origin = Some(origin);
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

/// Rotates each selected shape a quarter turn clockwise about the center of
/// its own bounds.
#[derive(Debug, Default)]
pub struct RotateTool {
    output: Option<ToolOutput>,
    complete: bool,
}

impl RotateTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn rotated(geometry: &Geometry) -> Geometry {
        match geometry.bounds() {
            Some(bounds) => {
                geometry.transformed(&Affine::rotation(ROTATE_ANGLE, bounds.center_point()))
            }
            None => geometry.clone(),
        }
    }

    fn commit(&mut self, view: &dyn EditorView) {
        self.complete = true;
        let selected = view.selected_geometry();
        if selected.is_empty() {
            self.output = Some(ToolOutput::Abort(EditError::NothingSelectedTo("rotate")));
            return;
        }
        let (remove, add): (Vec<_>, Vec<_>) = selected
            .into_iter()
            .map(|(id, geometry)| (id, Self::rotated(geometry)))
            .unzip();
        self.output = Some(ToolOutput::Replace { remove, add });
    }
}

impl Tool for RotateTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rotate
    }

    fn start_message(&self) -> &str {
        "Click anywhere to finish the Rotation"
    }

    fn click(&mut self, view: &dyn EditorView, _point: Point) -> Option<Status> {
        self.commit(view);
        Some(Status::info("Done."))
    }

    fn preview(&self, view: &dyn EditorView, _cursor: Point) -> Vec<Geometry> {
        view.selected_geometry()
            .into_iter()
            .map(|(_, geometry)| Self::rotated(geometry))
            .collect()
    }

    fn finish(&mut self, view: &dyn EditorView) -> bool {
        self.commit(view);
        true
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}
