//! Buffer and paint tools.
//!
//! Both only collect confirmation: the parameters come from the option panel
//! and the session runs the operation on the current selection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EditorView, Status, Tool, ToolKind, ToolOutput};
use crate::geometry::buffer::JoinStyle;
use crate::geometry::{Geometry, Point};

/// Which part of the offset result is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferKind {
    /// The whole offset region
    #[default]
    Full,
    /// Exterior rings of an inward offset
    Interior,
    /// Exterior rings of an outward offset
    Exterior,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "Full"),
            Self::Interior => write!(f, "Interior"),
            Self::Exterior => write!(f, "Exterior"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferParams {
    pub distance: f64,
    pub join: JoinStyle,
    pub kind: BufferKind,
}

#[derive(Debug, Default)]
pub struct BufferTool {
    output: Option<ToolOutput>,
    complete: bool,
}

impl BufferTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for BufferTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Buffer
    }

    fn start_message(&self) -> &str {
        "Create buffer geometry ..."
    }

    fn click(&mut self, _view: &dyn EditorView, _point: Point) -> Option<Status> {
        None
    }

    fn preview(&self, _view: &dyn EditorView, _cursor: Point) -> Vec<Geometry> {
        Vec::new()
    }

    fn finish(&mut self, view: &dyn EditorView) -> bool {
        self.output = Some(ToolOutput::Buffer(view.parameters().buffer));
        self.complete = true;
        true
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

#[derive(Debug, Default)]
pub struct PaintTool {
    output: Option<ToolOutput>,
    complete: bool,
}

impl PaintTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PaintTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Paint
    }

    fn start_message(&self) -> &str {
        "Create Paint geometry ..."
    }

    fn click(&mut self, _view: &dyn EditorView, _point: Point) -> Option<Status> {
        None
    }

    fn preview(&self, _view: &dyn EditorView, _cursor: Point) -> Vec<Geometry> {
        Vec::new()
    }

    fn finish(&mut self, view: &dyn EditorView) -> bool {
        self.output = Some(ToolOutput::Paint(view.parameters().paint.clone()));
        self.complete = true;
        true
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}
