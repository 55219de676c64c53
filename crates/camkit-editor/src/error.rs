//! Error types for the editor
//!
//! `EditError` carries the exact text reported to the user through the
//! notifier; `level()` picks the severity it is reported at.

use camkit_core::MessageLevel;
use thiserror::Error;

/// Geometry operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An operation received no geometry to work on
    #[error("No geometry to {operation}")]
    NoInput {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Polygonal and linear geometry cannot be combined by this operation
    #[error("Cannot {operation} polygons with lines")]
    MixedGeometry {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Operation is not defined for this kind of geometry
    #[error("Not implemented.")]
    Unsupported,

    /// Offset computation failed
    #[error("Offset failed: {0}")]
    OffsetFailed(String),
}

/// Shape store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Nearest query on a store without shapes
    #[error("Shape store is empty")]
    Empty,
}

/// User-facing editing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Nothing selected for {0}.")]
    NothingSelectedFor(&'static str),

    #[error("Cancelled. Nothing selected to {0}.")]
    NothingSelectedTo(&'static str),

    #[error("Nothing to move.")]
    NothingToMove,

    #[error("Negative buffer value is not accepted. Use Buffer interior to generate an 'inside' shape")]
    NegativeBuffer,

    #[error("Failed, the result is empty. Choose a {0} buffer value.")]
    EmptyBuffer(&'static str),

    #[error("Could not do Paint. Overlap value has to be less than Tool Dia value.")]
    OverlapNotAboveToolDiameter,

    #[error("Could not do Paint. Try a different combination of parameters. Or a different method of Paint")]
    PaintFailed,

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("To add a drill first select a tool")]
    NoToolForDrill,

    #[error("To add an Drill Array first select a tool in Tool Table")]
    NoToolForArray,

    #[error("Select a tool in Tool Table")]
    NoToolSelected,

    #[error("Too many drills for the selected spacing angle.")]
    TooManyDrills,

    #[error("Resize drill(s) failed. Please enter a diameter for resize.")]
    MissingResizeDiameter,

    #[error("Tool already in the original or actual tool list. Save and reedit Excellon if you need to add this tool.")]
    DuplicateTool,

    #[error("Font not supported. Only Regular, Bold, Italic and BoldItalic are supported. Error: {0}")]
    FontNotSupported(String),

    #[error("Please first select a geometry item to be cut, then the items that will be cut out of it.")]
    CutPathSelection,

    #[error("Failed, the {0} result is empty.")]
    EmptyResult(&'static str),

    #[error("Tool {0} is not available in this editor.")]
    UnknownTool(String),

    #[error("Cancelled.")]
    Cancelled,

    #[error("{0}")]
    Geometry(#[from] GeometryError),

    #[error("{0}")]
    Task(String),
}

impl EditError {
    /// Notifier level the error is reported at
    pub fn level(&self) -> MessageLevel {
        match self {
            Self::NegativeBuffer
            | Self::EmptyBuffer(_)
            | Self::EmptyResult(_)
            | Self::OverlapNotAboveToolDiameter
            | Self::PaintFailed
            | Self::MissingResizeDiameter
            | Self::FontNotSupported(_)
            | Self::Geometry(_)
            | Self::Task(_) => MessageLevel::Error,
            _ => MessageLevel::Warning,
        }
    }
}

/// Result type alias for editing operations
pub type Result<T> = std::result::Result<T, EditError>;
