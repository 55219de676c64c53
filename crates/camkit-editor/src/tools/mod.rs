//! Drawing tools
//!
//! A tool turns clicks and key presses into geometry. Tools read the session
//! through [`EditorView`] and hand their result back as a [`ToolOutput`];
//! they never mutate the store themselves.

pub mod arc_tool;
pub mod composite;
pub mod drill;
pub mod select;
pub mod shape_tools;
pub mod text;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

use camkit_core::{MessageLevel, Units};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::EditorConfig;
use crate::error::{EditError, Result};
use crate::fonts::FontProvider;
use crate::geometry::buffer::JoinStyle;
use crate::geometry::paint::PaintParams;
use crate::geometry::{Geometry, Point};
use crate::shape_store::ShapeId;

pub use composite::{BufferKind, BufferParams};
pub use drill::DrillArrayParams;
pub use text::TextParams;

/// Every tool an editor can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Select,
    Circle,
    Arc,
    Rectangle,
    Polygon,
    Path,
    Text,
    Move,
    Copy,
    Rotate,
    Buffer,
    Paint,
    #[serde(rename = "add")]
    AddDrill,
    #[serde(rename = "add_array")]
    AddDrillArray,
    #[serde(rename = "resize")]
    ResizeDrill,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Circle => "circle",
            Self::Arc => "arc",
            Self::Rectangle => "rectangle",
            Self::Polygon => "polygon",
            Self::Path => "path",
            Self::Text => "text",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Rotate => "rotate",
            Self::Buffer => "buffer",
            Self::Paint => "paint",
            Self::AddDrill => "add",
            Self::AddDrillArray => "add_array",
            Self::ResizeDrill => "resize",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        const ALL: [ToolKind; 15] = [
            ToolKind::Select,
            ToolKind::Circle,
            ToolKind::Arc,
            ToolKind::Rectangle,
            ToolKind::Polygon,
            ToolKind::Path,
            ToolKind::Text,
            ToolKind::Move,
            ToolKind::Copy,
            ToolKind::Rotate,
            ToolKind::Buffer,
            ToolKind::Paint,
            ToolKind::AddDrill,
            ToolKind::AddDrillArray,
            ToolKind::ResizeDrill,
        ];
        let name = s.trim().to_lowercase();
        ALL.into_iter()
            .find(|kind| kind.name() == name)
            .ok_or(EditError::UnknownTool(name))
    }
}

/// Keyboard keys the editors react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Space,
    Char(char),
}

impl Key {
    /// Letter keys match case-insensitively
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

impl FromStr for Key {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "enter" | "return" => Ok(Key::Enter),
            "escape" | "esc" => Ok(Key::Escape),
            "backspace" => Ok(Key::Backspace),
            "delete" | "del" => Ok(Key::Delete),
            "space" | " " => Ok(Key::Space),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(EditError::InvalidParameter {
                        name: "key",
                        reason: format!("unknown key '{}'", s),
                    }),
                }
            }
        }
    }
}

/// Keyboard modifiers held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
}

/// Modifier that switches selection clicks from replace to toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiSelectKey {
    #[default]
    Control,
    Shift,
}

impl MultiSelectKey {
    pub fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Control => modifiers.control,
            Self::Shift => modifiers.shift,
        }
    }
}

/// Status line text produced by a tool
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub level: MessageLevel,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            text: text.into(),
        }
    }
}

/// Values entered in the tool option panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolParameters {
    pub buffer: BufferParams,
    pub paint: PaintParams,
    pub text: TextParams,
    pub drill_array: DrillArrayParams,
    /// Target diameter for drill resizing
    pub resize_diameter: Option<f64>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            buffer: BufferParams {
                distance: 0.2,
                join: JoinStyle::Round,
                kind: BufferKind::Full,
            },
            paint: PaintParams::default(),
            text: TextParams::default(),
            drill_array: DrillArrayParams::default(),
            resize_diameter: None,
        }
    }
}

/// What a finished (or partially finished) tool asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Commit new shapes
    Shapes(Vec<Geometry>),
    /// Remove shapes and commit replacements
    Replace {
        remove: Vec<ShapeId>,
        add: Vec<Geometry>,
    },
    /// Translate the selection, keeping the originals when copying
    Translate { dx: f64, dy: f64, copy: bool },
    /// Pick among shapes under the cursor
    Select {
        candidates: Vec<ShapeId>,
        toggle: bool,
    },
    ClearSelection,
    Buffer(BufferParams),
    Paint(PaintParams),
    /// Drill markers for one diameter
    Drills {
        diameter: f64,
        markers: Vec<Geometry>,
    },
    /// Move the selected drills into the bucket for `diameter`
    ResizeDrills { diameter: f64 },
    /// The tool gave up; report and reset
    Abort(EditError),
}

/// Read-only view of a session handed to tools
pub trait EditorView {
    fn config(&self) -> &EditorConfig;
    fn parameters(&self) -> &ToolParameters;
    fn modifiers(&self) -> Modifiers;
    /// Selected shapes in selection order
    fn selected_geometry(&self) -> Vec<(ShapeId, &Geometry)>;
    /// Shapes under `point`, closest first
    fn candidates_at(&self, point: Point) -> Vec<ShapeId>;
    /// Shape owning the indexed point closest to `point`
    fn nearest_shape(&self, point: Point) -> Option<(ShapeId, &Geometry)>;
    /// Units of the edited object
    fn units(&self) -> Units {
        self.config().units
    }
    /// Diameter of the tool picked in the drill tool table
    fn active_diameter(&self) -> Option<f64> {
        None
    }
    /// Outline source for the text tool; editors without text return `None`
    fn font_provider(&self) -> Option<&dyn FontProvider> {
        None
    }
}

/// One interactive tool instance.
///
/// Tools are created fresh whenever one is selected and dropped when the
/// session switches away; no state carries over between instances.
pub trait Tool: fmt::Debug {
    fn kind(&self) -> ToolKind;

    fn start_message(&self) -> &str;

    fn click(&mut self, view: &dyn EditorView, point: Point) -> Option<Status>;

    fn click_release(&mut self, _view: &dyn EditorView, _point: Point) -> Option<Status> {
        None
    }

    /// Offer a key to the tool. `Some` means the tool consumed it.
    fn on_key(&mut self, _view: &dyn EditorView, _key: &Key) -> Option<Status> {
        None
    }

    /// Preview geometry for the current cursor position
    fn preview(&self, view: &dyn EditorView, cursor: Point) -> Vec<Geometry>;

    /// Explicit finish (Enter). Returns `false` when there was nothing to make.
    fn finish(&mut self, _view: &dyn EditorView) -> bool {
        false
    }

    fn set_origin(&mut self, _origin: Point) {}

    fn is_complete(&self) -> bool;

    fn take_output(&mut self) -> Option<ToolOutput>;
}

pub type ToolConstructor = fn(&dyn EditorView) -> Result<Box<dyn Tool>>;

/// Name to constructor mapping for one kind of editor
#[derive(Clone)]
pub struct ToolRegistry {
    constructors: BTreeMap<ToolKind, ToolConstructor>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, kind: ToolKind, constructor: ToolConstructor) {
        self.constructors.insert(kind, constructor);
    }

    /// Tools of the geometry editor
    pub fn geometry() -> Self {
        let mut registry = Self::empty();
        registry.register(ToolKind::Select, |_| Ok(Box::new(select::SelectTool::new())));
        registry.register(ToolKind::Circle, |view| {
            Ok(Box::new(shape_tools::CircleTool::new(view)))
        });
        registry.register(ToolKind::Arc, |view| Ok(Box::new(arc_tool::ArcTool::new(view))));
        registry.register(ToolKind::Rectangle, |_| {
            Ok(Box::new(shape_tools::RectangleTool::new()))
        });
        registry.register(ToolKind::Polygon, |_| {
            Ok(Box::new(shape_tools::PolyTool::polygon()))
        });
        registry.register(ToolKind::Path, |_| Ok(Box::new(shape_tools::PolyTool::path())));
        registry.register(ToolKind::Text, |view| Ok(Box::new(text::TextTool::new(view)?)));
        registry.register(ToolKind::Move, |_| {
            Ok(Box::new(transform::MoveTool::moving()))
        });
        registry.register(ToolKind::Copy, |_| {
            Ok(Box::new(transform::MoveTool::copying()))
        });
        registry.register(ToolKind::Rotate, |_| Ok(Box::new(transform::RotateTool::new())));
        registry.register(ToolKind::Buffer, |_| {
            Ok(Box::new(composite::BufferTool::new()))
        });
        registry.register(ToolKind::Paint, |_| Ok(Box::new(composite::PaintTool::new())));
        registry
    }

    /// Tools of the drill editor
    pub fn drill() -> Self {
        let mut registry = Self::empty();
        registry.register(ToolKind::Select, |_| {
            Ok(Box::new(select::DrillSelectTool::new()))
        });
        registry.register(ToolKind::AddDrill, |view| {
            Ok(Box::new(drill::AddDrillTool::new(view)?))
        });
        registry.register(ToolKind::AddDrillArray, |view| {
            Ok(Box::new(drill::DrillArrayTool::new(view)?))
        });
        registry.register(ToolKind::ResizeDrill, |_| {
            Ok(Box::new(drill::ResizeDrillTool::new()))
        });
        registry.register(ToolKind::Move, |_| {
            Ok(Box::new(transform::MoveTool::moving()))
        });
        registry.register(ToolKind::Copy, |_| {
            Ok(Box::new(transform::MoveTool::copying()))
        });
        registry
    }

    pub fn contains(&self, kind: ToolKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ToolKind> + '_ {
        self.constructors.keys().copied()
    }

    pub fn create(&self, kind: ToolKind, view: &dyn EditorView) -> Result<Box<dyn Tool>> {
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| EditError::UnknownTool(kind.to_string()))?;
        constructor(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for name in ["select", "arc", "add_array", "resize"] {
            assert_eq!(name.parse::<ToolKind>().unwrap().name(), name);
        }
        assert!("lasso".parse::<ToolKind>().is_err());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let key: Key = "A".parse().unwrap();
        assert!(key.is_char('a'));
        assert_eq!("Return".parse::<Key>().unwrap(), Key::Enter);
    }

    #[test]
    fn test_registries_differ() {
        let geometry = ToolRegistry::geometry();
        let drill = ToolRegistry::drill();
        assert!(geometry.contains(ToolKind::Buffer));
        assert!(!drill.contains(ToolKind::Buffer));
        assert!(drill.contains(ToolKind::ResizeDrill));
        assert!(drill.contains(ToolKind::Move));
    }

    #[test]
    fn test_multi_select_key() {
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert!(MultiSelectKey::Shift.is_held(shift));
        assert!(!MultiSelectKey::Control.is_held(shift));
    }
}
