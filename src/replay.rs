//! Scripted editing sessions
//!
//! A replay script names the editor, the object to load and a list of
//! pointer, key and command events. Events are fed to the session in order;
//! a `finalize` event waits for the background job before continuing.

use anyhow::{bail, Context};
use camkit_core::{
    spawn_worker, ChannelTaskQueue, Message, MessageLog, TaskEvent, TaskOutcome, TaskRequest,
};
use camkit_editor::geometry::paint::PaintParams;
use camkit_editor::tools::BufferParams;
use camkit_editor::{
    Collaborators, DrillEditor, DrillObject, EditorConfig, GeometryEditor, GeometryObject, Key,
    Modifiers, NullRenderer, Point, Session, SessionState, SystemFontProvider, ToolKind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// A whole replay file
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "editor", rename_all = "snake_case")]
pub enum Script {
    Geometry {
        object: GeometryObject,
        #[serde(default)]
        events: Vec<Event>,
    },
    Drill {
        object: DrillObject,
        #[serde(default)]
        events: Vec<Event>,
    },
}

impl Script {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing script {}", path.display()))
    }
}

/// One scripted input
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Move { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    Release { x: f64, y: f64 },
    Key { key: String },
    Modifiers {
        #[serde(default)]
        control: bool,
        #[serde(default)]
        shift: bool,
    },
    Tool { tool: ToolKind },
    // geometry editor
    SelectArea { start: Point, end: Point },
    Union,
    Intersection,
    Subtract,
    CutPath,
    Buffer { params: BufferParams },
    Paint { params: PaintParams },
    Text { text: String },
    // drill editor
    AddTool { diameter: f64 },
    DeleteTools { diameters: Vec<f64> },
    EditTool { old: f64, new: f64 },
    SelectToolRow { diameter: f64 },
    ResizeDiameter { diameter: f64 },
    Finalize,
}

/// What a replay produced
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub messages: Vec<Message>,
    /// Object handed to the last finalize job, or the final state
    pub object: Value,
}

/// Worker side of the finalize job: the object name is the output
fn finish_job(request: &TaskRequest) -> TaskOutcome {
    match request.params.get("name").and_then(Value::as_str) {
        Some(name) => TaskOutcome::Completed {
            output: name.to_string(),
        },
        None => TaskOutcome::Failed {
            reason: format!("{} received an object without a name", request.name),
        },
    }
}

struct Runner {
    log: MessageLog,
    events: UnboundedReceiver<TaskEvent>,
    submitted: Option<Value>,
}

impl Runner {
    fn key(key: &str) -> anyhow::Result<Key> {
        key.parse::<Key>().map_err(anyhow::Error::from)
    }

    /// Events both editors understand; `false` when the event is not one
    fn common<S: SessionState>(session: &mut Session<S>, event: &Event) -> bool {
        match event {
            Event::Move { x, y } => session.pointer_move(*x, *y),
            Event::Click { x, y } => session.click(*x, *y),
            Event::Release { x, y } => session.click_release(*x, *y),
            Event::Modifiers { control, shift } => session.set_modifiers(Modifiers {
                control: *control,
                shift: *shift,
            }),
            Event::Tool { tool } => {
                session.select_tool(*tool);
                session.replot();
            }
            _ => return false,
        }
        true
    }

    async fn wait_for<S: SessionState>(&mut self, session: &mut Session<S>) -> anyhow::Result<()> {
        let Some(id) = session.pending_job() else {
            return Ok(());
        };
        while let Some(event) = self.events.recv().await {
            let done = event.id == id;
            session.on_task_event(&event);
            if done {
                return Ok(());
            }
        }
        bail!("task worker stopped before {} completed", id)
    }

    async fn geometry(&mut self, editor: &mut GeometryEditor, events: &[Event]) -> anyhow::Result<()> {
        for event in events {
            tracing::debug!(?event, "replaying");
            if Self::common(editor, event) {
                continue;
            }
            match event {
                Event::Key { key } => editor.on_key(Self::key(key)?),
                Event::SelectArea { start, end } => editor.select_area(*start, *end),
                Event::Union => editor.union(),
                Event::Intersection => editor.intersection(),
                Event::Subtract => editor.subtract(),
                Event::CutPath => editor.cut_path(),
                Event::Buffer { params } => editor.buffer(*params),
                Event::Paint { params } => editor.paint(params.clone()),
                Event::Text { text } => editor.parameters_mut().text.text = text.clone(),
                Event::Finalize => {
                    self.submitted = Some(serde_json::to_value(editor.state().to_object())?);
                    editor.finalize();
                    self.wait_for(editor).await?;
                }
                other => tracing::warn!(event = ?other, "event not supported by the geometry editor"),
            }
        }
        Ok(())
    }

    async fn drill(&mut self, editor: &mut DrillEditor, events: &[Event]) -> anyhow::Result<()> {
        for event in events {
            tracing::debug!(?event, "replaying");
            if Self::common(editor, event) {
                continue;
            }
            match event {
                Event::Key { key } => editor.on_key(Self::key(key)?),
                Event::AddTool { diameter } => editor.add_tool(*diameter),
                Event::DeleteTools { diameters } => {
                    let keys = diameters
                        .iter()
                        .map(|d| editor.state().key(*d))
                        .collect::<Result<Vec<_>, _>>()?;
                    editor.delete_tools(&keys);
                }
                Event::EditTool { old, new } => {
                    let old = editor.state().key(*old)?;
                    editor.edit_tool_diameter(old, *new);
                }
                Event::SelectToolRow { diameter } => {
                    let key = editor.state().key(*diameter)?;
                    editor.select_tool_row(key);
                }
                Event::ResizeDiameter { diameter } => {
                    editor.parameters_mut().resize_diameter = Some(*diameter);
                }
                Event::Finalize => {
                    self.submitted = Some(serde_json::to_value(editor.state().to_object())?);
                    editor.finalize();
                    self.wait_for(editor).await?;
                }
                other => tracing::warn!(event = ?other, "event not supported by the drill editor"),
            }
        }
        Ok(())
    }
}

/// Run `script` against a fresh editor. Must be called inside a tokio
/// runtime.
pub async fn run(script: &Script, config: EditorConfig) -> anyhow::Result<ReplayReport> {
    let log = MessageLog::new();
    let (queue, requests) = ChannelTaskQueue::new();
    let (worker, events) = spawn_worker(requests, finish_job);
    let collaborators = Collaborators {
        notifier: Arc::new(log.clone()),
        renderer: Box::new(NullRenderer),
        tasks: Arc::new(queue),
        fonts: Arc::new(SystemFontProvider::new()),
    };
    let mut runner = Runner {
        log,
        events,
        submitted: None,
    };

    let object = match script {
        Script::Geometry { object, events } => {
            let mut editor = GeometryEditor::new(config, collaborators);
            editor.load(object);
            runner.geometry(&mut editor, events).await?;
            match runner.submitted.take() {
                Some(value) => value,
                None => serde_json::to_value(editor.state().to_object())?,
            }
        }
        Script::Drill { object, events } => {
            let mut editor = DrillEditor::new(config, collaborators);
            editor.load(object);
            runner.drill(&mut editor, events).await?;
            match runner.submitted.take() {
                Some(value) => value,
                None => serde_json::to_value(editor.state().to_object())?,
            }
        }
    };
    worker.abort();

    Ok(ReplayReport {
        messages: runner.log.drain(),
        object,
    })
}
