//! Editing sessions
//!
//! A [`Session`] owns the edited shapes, the selection and the active tool.
//! Pointer and key events are snapped, handed to the active tool, and
//! whatever the tool produces is applied to the state before the renderer is
//! asked to redraw.
//!
//! Two concrete sessions share this machinery:
//! - [`GeometryEditor`] edits arbitrary outlines and lines
//! - [`DrillEditor`] edits drill markers grouped by diameter

pub mod drill;
pub mod geometry;
pub mod host;
pub mod render;

use camkit_core::{JobId, MessageLevel, Notifier, TaskEvent, TaskOutcome, TaskQueue};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{EditError, Result};
use crate::fonts::FontProvider;
use crate::geometry::{Geometry, Point};
use crate::tools::{
    EditorView, Key, Modifiers, Status, Tool, ToolKind, ToolOutput, ToolParameters, ToolRegistry,
};

pub use drill::{DrillEditor, DrillState, ToolTableRow};
pub use geometry::{GeometryEditor, GeometryState};
pub use host::{DrillObject, DrillPoint, GeometryObject};
pub use render::{DrawStyle, NullRenderer, RecordingRenderer, Renderer};

/// Everything a session talks to outside itself
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub renderer: Box<dyn Renderer>,
    pub tasks: Arc<dyn TaskQueue>,
    pub fonts: Arc<dyn FontProvider>,
}

/// Session-specific half of an editor: shape storage and selection
/// bookkeeping.
pub trait SessionState: EditorView {
    /// Background job submitted on finalize
    const FINISH_TASK: &'static str;
    /// Reported when that job completes
    const FINISHED_MESSAGE: &'static str;

    /// Resolve raw pointer coordinates
    fn snap(&self, x: f64, y: f64) -> Point;

    /// Committed shapes with their selected flag
    fn drawable(&self) -> Vec<(&Geometry, bool)>;

    /// Apply a tool result. `Abort` outputs come back as errors.
    fn apply(&mut self, output: ToolOutput) -> Result<Option<Status>>;

    fn clear_selection(&mut self);

    fn set_modifiers(&mut self, modifiers: Modifiers);

    fn parameters_mut(&mut self) -> &mut ToolParameters;
}

/// Event dispatcher shared by both editors
pub struct Session<S: SessionState> {
    state: S,
    registry: ToolRegistry,
    active: Option<Box<dyn Tool>>,
    utility: Vec<Geometry>,
    cursor: Point,
    notifier: Arc<dyn Notifier>,
    renderer: Box<dyn Renderer>,
    tasks: Arc<dyn TaskQueue>,
    pending_job: Option<JobId>,
}

impl<S: SessionState> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tool", &self.active_tool())
            .field("cursor", &self.cursor)
            .field("utility", &self.utility.len())
            .field("pending_job", &self.pending_job)
            .finish()
    }
}

impl<S: SessionState> Session<S> {
    pub(crate) fn with_state(
        state: S,
        registry: ToolRegistry,
        notifier: Arc<dyn Notifier>,
        renderer: Box<dyn Renderer>,
        tasks: Arc<dyn TaskQueue>,
    ) -> Self {
        let mut session = Self {
            state,
            registry,
            active: None,
            utility: Vec::new(),
            cursor: Point::default(),
            notifier,
            renderer,
            tasks,
            pending_job: None,
        };
        session.select_tool(ToolKind::Select);
        session.replot();
        session
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active.as_ref().map(|tool| tool.kind())
    }

    /// Preview geometry of the active tool
    pub fn utility(&self) -> &[Geometry] {
        &self.utility
    }

    /// Last snapped pointer position
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Job submitted by the last finalize that has not reported back yet
    pub fn pending_job(&self) -> Option<JobId> {
        self.pending_job
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.state.set_modifiers(modifiers);
    }

    pub fn parameters_mut(&mut self) -> &mut ToolParameters {
        self.state.parameters_mut()
    }

    /// Activate a new tool instance, dropping the current one.
    ///
    /// A tool that cannot start is reported and the select tool takes its
    /// place.
    pub fn select_tool(&mut self, kind: ToolKind) -> bool {
        self.active = None;
        self.utility.clear();
        match self.registry.create(kind, &self.state) {
            Ok(tool) => {
                tracing::debug!(tool = %kind, "tool selected");
                if kind != ToolKind::Select {
                    self.notifier.info(tool.start_message());
                }
                self.active = Some(tool);
                self.refresh_preview();
                true
            }
            Err(err) => {
                tracing::debug!(tool = %kind, error = %err, "tool could not start");
                self.report(&err);
                if kind != ToolKind::Select {
                    self.select_tool(ToolKind::Select);
                }
                false
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.cursor = self.state.snap(x, y);
        self.refresh_preview();
        self.replot();
    }

    pub fn click(&mut self, x: f64, y: f64) {
        let point = self.state.snap(x, y);
        self.cursor = point;
        let status = match self.active.as_mut() {
            Some(tool) => tool.click(&self.state, point),
            None => None,
        };
        self.after_event(status);
    }

    pub fn click_release(&mut self, x: f64, y: f64) {
        let point = self.state.snap(x, y);
        self.cursor = point;
        let status = match self.active.as_mut() {
            Some(tool) => tool.click_release(&self.state, point),
            None => None,
        };
        self.after_event(status);
    }

    /// Explicit finish of the active tool (Enter)
    pub fn finish_tool(&mut self) {
        let finished = match self.active.as_mut() {
            Some(tool) => tool.finish(&self.state),
            None => false,
        };
        if finished {
            self.after_event(None);
        }
    }

    /// Drop the active tool and its preview (Escape)
    pub fn cancel(&mut self) {
        self.notifier.warning(&EditError::Cancelled.to_string());
        self.select_tool(ToolKind::Select);
        self.replot();
    }

    /// Redraw committed shapes, the selection and the preview
    pub fn replot(&mut self) {
        let drawing = &self.state.config().drawing;
        let plain = DrawStyle::new(drawing.draw_color.as_str(), 1.0);
        let selected = DrawStyle::new(drawing.selection_color.as_str(), 2.0);
        let utility = DrawStyle::new(drawing.utility_color.as_str(), 1.0);

        self.renderer.clear();
        for (geometry, is_selected) in self.state.drawable() {
            let style = if is_selected { &selected } else { &plain };
            self.renderer.draw(geometry, style);
        }
        for geometry in &self.utility {
            self.renderer.draw(geometry, &utility);
        }
        self.renderer.present();
    }

    /// Handle a completion event for a job this session submitted
    pub fn on_task_event(&mut self, event: &TaskEvent) {
        if self.pending_job != Some(event.id) {
            tracing::debug!(id = %event.id, task = %event.name, "ignoring foreign task event");
            return;
        }
        self.pending_job = None;
        match &event.outcome {
            TaskOutcome::Completed { output } => {
                tracing::info!(task = %event.name, %output, "background task finished");
                self.notifier.success(S::FINISHED_MESSAGE);
                self.notifier.info(&format!("Output: {}", output));
            }
            TaskOutcome::Failed { reason } => {
                tracing::warn!(task = %event.name, %reason, "background task failed");
                self.notifier
                    .error(&EditError::Task(reason.clone()).to_string());
            }
        }
    }

    /// Report an error and reset the selection
    pub fn report(&mut self, err: &EditError) {
        self.notifier.emit(err.level(), &err.to_string());
        self.state.clear_selection();
    }

    fn notify(&self, status: &Status) {
        self.notifier.emit(status.level, &status.text);
    }

    /// Run a state operation, then report its outcome and redraw
    pub(crate) fn run(&mut self, op: impl FnOnce(&mut S) -> Result<Option<Status>>) {
        match op(&mut self.state) {
            Ok(Some(status)) => self.notify(&status),
            Ok(None) => {}
            Err(err) => self.report(&err),
        }
        self.refresh_preview();
        self.replot();
    }

    /// Offer a key to the active tool; `true` when it was consumed
    pub(crate) fn offer_key(&mut self, key: &Key) -> bool {
        let status = match self.active.as_mut() {
            Some(tool) => tool.on_key(&self.state, key),
            None => None,
        };
        let Some(status) = status else {
            return false;
        };
        self.notify(&status);
        self.refresh_preview();
        self.replot();
        true
    }

    /// Start a transform tool with the cursor as its reference point
    pub(crate) fn start_at_cursor(&mut self, kind: ToolKind) {
        if self.select_tool(kind) {
            let cursor = self.cursor;
            if let Some(tool) = self.active.as_mut() {
                tool.set_origin(cursor);
            }
            self.refresh_preview();
        }
        self.replot();
    }

    /// Submit the finalize job and leave the session without a tool
    pub(crate) fn submit_finish(&mut self, params: Value) -> Option<JobId> {
        self.active = None;
        self.utility.clear();
        self.replot();
        match self.tasks.submit(S::FINISH_TASK, params) {
            Ok(id) => {
                tracing::info!(%id, task = S::FINISH_TASK, "finalize submitted");
                self.pending_job = Some(id);
                Some(id)
            }
            Err(err) => {
                self.notifier.emit(MessageLevel::Error, &err.to_string());
                None
            }
        }
    }

    fn refresh_preview(&mut self) {
        self.utility = match self.active.as_ref() {
            Some(tool) => tool.preview(&self.state, self.cursor),
            None => Vec::new(),
        };
    }

    fn after_event(&mut self, status: Option<Status>) {
        if let Some(status) = status {
            self.notify(&status);
        }
        let output = self.active.as_mut().and_then(|tool| tool.take_output());
        if let Some(output) = output {
            tracing::debug!(tool = ?self.active_tool(), "applying tool output");
            match self.state.apply(output) {
                Ok(Some(status)) => self.notify(&status),
                Ok(None) => {}
                Err(err) => self.report(&err),
            }
        }
        let complete = self.active.as_ref().is_some_and(|tool| tool.is_complete());
        if complete {
            self.select_tool(ToolKind::Select);
        } else {
            self.refresh_preview();
        }
        self.replot();
    }
}
