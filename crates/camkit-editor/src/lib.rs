//! # CamKit Editor
//!
//! Interactive editing of 2D manufacturing geometry: outlines, paths and
//! drill markers, driven by pointer and keyboard events.
//!
//! ## Core Components
//!
//! ### Storage
//! - **Spatial Index**: quadtree over shape vertices for nearest queries
//! - **Shape Store**: committed shapes keyed by their vertices
//! - **Selection**: ordered selection with click cycling
//!
//! ### Geometry Operations
//! - **Booleans**: union, intersection, difference and path cutting
//! - **Buffer**: signed offsets with round, square and bevel joins
//! - **Arcs**: center/start/end, start/end/center and three-point arcs
//! - **Paint**: standard, seed and line pocket filling
//!
//! ### Editing
//! - **Snap**: grid and nearest-corner snapping
//! - **Tools**: one state machine per drawing or transform tool
//! - **Sessions**: geometry and drill editors dispatching events to tools
//!
//! ## Architecture
//!
//! ```text
//! Session (events, replot, finalize)
//!   ├── SnapEngine
//!   ├── Active Tool ──> ToolOutput
//!   └── State
//!         ├── ShapeStore (one, or one per drill diameter)
//!         │     └── SpatialIndex
//!         └── SelectionManager
//!
//! GeometryOps (boolean, buffer, arc, paint)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use camkit_editor::{EditorConfig, GeometryEditor, ToolKind};
//!
//! let mut editor = GeometryEditor::new(EditorConfig::default(), collaborators);
//! editor.select_tool(ToolKind::Rectangle);
//! editor.click(0.0, 0.0);
//! editor.click(10.0, 5.0);
//! ```

pub mod config;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod selection_manager;
pub mod session;
pub mod shape_store;
pub mod snap;
pub mod spatial_index;
pub mod tools;

pub use config::{DrawingSettings, DrillSettings, EditorConfig};
pub use error::{EditError, GeometryError, Result, StoreError};
pub use fonts::{FontError, FontProvider, FontStyle, SystemFontProvider};
pub use geometry::{Geometry, Point, Polygon};
pub use selection_manager::SelectionManager;
pub use session::{
    Collaborators, DrillEditor, DrillObject, DrillPoint, GeometryEditor, GeometryObject,
    NullRenderer, RecordingRenderer, Renderer, Session, SessionState,
};
pub use shape_store::{Shape, ShapeId, ShapeStore};
pub use snap::{PointSource, SnapEngine, SnapOptions};
pub use spatial_index::{Bounds, SpatialIndex};
pub use tools::{Key, Modifiers, Tool, ToolKind, ToolOutput, ToolParameters, ToolRegistry};
