//! Renderer collaborator.
//!
//! Sessions hand the renderer one shape at a time with a colour and line
//! width. The renderer never reports anything back.

use lyon::math::point;
use lyon::path::Path;

use crate::geometry::Geometry;

/// Stroke style of one drawn shape
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    /// `#RRGGBB`
    pub color: String,
    pub width: f32,
}

impl DrawStyle {
    pub fn new(color: impl Into<String>, width: f32) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

pub trait Renderer {
    /// Start a new frame
    fn clear(&mut self);

    fn draw(&mut self, geometry: &Geometry, style: &DrawStyle);

    /// Show the frame
    fn present(&mut self);
}

/// Renderer that discards everything
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}

    fn draw(&mut self, _geometry: &Geometry, _style: &DrawStyle) {}

    fn present(&mut self) {}
}

/// One recorded stroke of a frame
#[derive(Debug, Clone)]
pub struct RecordedStroke {
    pub path: Path,
    pub style: DrawStyle,
}

/// Keeps the last presented frame as lyon paths.
///
/// Hosts tessellate `frame()` themselves; tests use it to inspect what a
/// session drew.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pending: Vec<RecordedStroke>,
    frame: Vec<RecordedStroke>,
    frames: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes of the last presented frame
    pub fn frame(&self) -> &[RecordedStroke] {
        &self.frame
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Strokes of the last frame drawn with `color`
    pub fn count_with_color(&self, color: &str) -> usize {
        self.frame
            .iter()
            .filter(|stroke| stroke.style.color.eq_ignore_ascii_case(color))
            .count()
    }
}

/// Build a lyon path from every line and ring of `geometry`
pub fn to_path(geometry: &Geometry) -> Path {
    let mut builder = Path::builder();
    for line in geometry.paths() {
        let mut points = line.iter();
        let Some(first) = points.next() else {
            continue;
        };
        builder.begin(point(first.x as f32, first.y as f32));
        for p in points {
            builder.line_to(point(p.x as f32, p.y as f32));
        }
        let closed = line.len() > 2 && line.first() == line.last();
        builder.end(closed);
    }
    builder.build()
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw(&mut self, geometry: &Geometry, style: &DrawStyle) {
        self.pending.push(RecordedStroke {
            path: to_path(geometry),
            style: style.clone(),
        });
    }

    fn present(&mut self) {
        self.frame = std::mem::take(&mut self.pending);
        self.frames += 1;
    }
}
