//! Collaborators wired to in-memory fakes

use camkit_core::{ChannelTaskQueue, MessageLevel, MessageLog, TaskRequest, Units};
use camkit_editor::session::DrawStyle;
use camkit_editor::{
    Collaborators, FontError, FontProvider, FontStyle, Geometry, Point, Polygon,
    RecordingRenderer, Renderer,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Renderer handle the test keeps a second reference to
#[derive(Clone, Default)]
pub struct SharedRenderer(pub Arc<Mutex<RecordingRenderer>>);

impl Renderer for SharedRenderer {
    fn clear(&mut self) {
        self.0.lock().clear();
    }

    fn draw(&mut self, geometry: &Geometry, style: &DrawStyle) {
        self.0.lock().draw(geometry, style);
    }

    fn present(&mut self) {
        self.0.lock().present();
    }
}

/// Every glyph run becomes a unit square per character
pub struct BlockFont;

impl FontProvider for BlockFont {
    fn outline_for(
        &self,
        text: &str,
        _font: &str,
        _size: f64,
        _style: FontStyle,
        _units: Units,
    ) -> Result<Geometry, FontError> {
        let blocks: Vec<Polygon> = (0..text.chars().count())
            .map(|i| {
                let x = i as f64 * 1.5;
                Polygon::new(vec![
                    Point::new(x, 0.0),
                    Point::new(x + 1.0, 0.0),
                    Point::new(x + 1.0, 1.0),
                    Point::new(x, 1.0),
                ])
            })
            .collect();
        Ok(Geometry::MultiPolygon(blocks))
    }
}

pub struct Fakes {
    pub log: MessageLog,
    pub renderer: SharedRenderer,
    pub requests: UnboundedReceiver<TaskRequest>,
}

impl Fakes {
    pub fn texts(&self) -> Vec<String> {
        self.log.messages().into_iter().map(|m| m.text).collect()
    }

    pub fn has(&self, text: &str) -> bool {
        self.log.messages().iter().any(|m| m.text == text)
    }

    pub fn has_at(&self, level: MessageLevel, text: &str) -> bool {
        self.log
            .messages()
            .iter()
            .any(|m| m.level == level && m.text == text)
    }
}

pub fn collaborators() -> (Collaborators, Fakes) {
    let log = MessageLog::new();
    let renderer = SharedRenderer::default();
    let (queue, requests) = ChannelTaskQueue::new();
    let collaborators = Collaborators {
        notifier: Arc::new(log.clone()),
        renderer: Box::new(renderer.clone()),
        tasks: Arc::new(queue),
        fonts: Arc::new(BlockFont),
    };
    (
        collaborators,
        Fakes {
            log,
            renderer,
            requests,
        },
    )
}

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    Geometry::Polygon(Polygon::new(vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]))
}
