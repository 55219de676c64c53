//! Point-collecting shape tools: circle, rectangle, polygon and path.

use super::{EditorView, Key, Status, Tool, ToolKind, ToolOutput};
use crate::geometry::arc::circle;
use crate::geometry::{Geometry, Point, Polygon};

/// Center then perimeter point
#[derive(Debug)]
pub struct CircleTool {
    points: Vec<Point>,
    steps: usize,
    output: Option<ToolOutput>,
    complete: bool,
}

impl CircleTool {
    pub fn new(view: &dyn EditorView) -> Self {
        Self {
            points: Vec::new(),
            steps: view.config().drawing.circle_steps,
            output: None,
            complete: false,
        }
    }

    fn disc(&self, center: Point, edge: Point) -> Geometry {
        let radius = center.distance_to(&edge);
        Geometry::Polygon(Polygon::new(circle(center, radius, self.steps)))
    }
}

impl Tool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
    }

    fn start_message(&self) -> &str {
        "Click on CENTER ..."
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        self.points.push(point);
        match self.points.len() {
            1 => Some(Status::info("Click on perimeter to complete ...")),
            2 => {
                let (center, edge) = (self.points[0], self.points[1]);
                if center.distance_to(&edge) > 0.0 {
                    self.output = Some(ToolOutput::Shapes(vec![self.disc(center, edge)]));
                }
                self.complete = true;
                Some(Status::info("Done."))
            }
            _ => None,
        }
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        match self.points.as_slice() {
            [center] if center.distance_to(&cursor) > 0.0 => vec![self.disc(*center, cursor)],
            _ => Vec::new(),
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

fn corners(p1: Point, p2: Point) -> Vec<Point> {
    vec![p1, Point::new(p2.x, p1.y), p2, Point::new(p1.x, p2.y)]
}

/// Two opposite corners
#[derive(Debug, Default)]
pub struct RectangleTool {
    points: Vec<Point>,
    output: Option<ToolOutput>,
    complete: bool,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn start_message(&self) -> &str {
        "Click on 1st corner ..."
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        self.points.push(point);
        match self.points.len() {
            1 => Some(Status::info("Click on opposite corner to complete ...")),
            2 => {
                let (p1, p2) = (self.points[0], self.points[1]);
                if p1.x != p2.x && p1.y != p2.y {
                    let rect = Polygon::new(corners(p1, p2));
                    self.output = Some(ToolOutput::Shapes(vec![Geometry::Polygon(rect)]));
                }
                self.complete = true;
                Some(Status::info("Done."))
            }
            _ => None,
        }
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        match self.points.as_slice() {
            [p1] => vec![Geometry::LinearRing(corners(*p1, cursor))],
            _ => Vec::new(),
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

/// Unbounded point sequence finished with Enter.
///
/// Makes a filled polygon (at least 3 points) or an open path (at least 2).
#[derive(Debug)]
pub struct PolyTool {
    closed: bool,
    points: Vec<Point>,
    output: Option<ToolOutput>,
    complete: bool,
}

impl PolyTool {
    pub fn polygon() -> Self {
        Self {
            closed: true,
            points: Vec::new(),
            output: None,
            complete: false,
        }
    }

    pub fn path() -> Self {
        Self {
            closed: false,
            ..Self::polygon()
        }
    }

    fn min_points(&self) -> usize {
        if self.closed {
            3
        } else {
            2
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Tool for PolyTool {
    fn kind(&self) -> ToolKind {
        if self.closed {
            ToolKind::Polygon
        } else {
            ToolKind::Path
        }
    }

    fn start_message(&self) -> &str {
        "Click on 1st point ..."
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        self.points.push(point);
        Some(Status::info(
            "Click on next point or hit ENTER to complete ...",
        ))
    }

    fn on_key(&mut self, _view: &dyn EditorView, key: &Key) -> Option<Status> {
        if *key != Key::Backspace {
            return None;
        }
        self.points.pop();
        Some(Status::info(format!("{} point(s) left.", self.points.len())))
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let mut points = self.points.clone();
        points.push(cursor);
        if self.closed && points.len() > 2 {
            vec![Geometry::LinearRing(points)]
        } else {
            vec![Geometry::LineString(points)]
        }
    }

    fn finish(&mut self, _view: &dyn EditorView) -> bool {
        if self.points.len() < self.min_points() {
            tracing::debug!(
                points = self.points.len(),
                tool = %self.kind(),
                "not enough points to make a shape"
            );
            return false;
        }
        let points = std::mem::take(&mut self.points);
        let geometry = if self.closed {
            Geometry::Polygon(Polygon::new(points))
        } else {
            Geometry::LineString(points)
        };
        self.output = Some(ToolOutput::Shapes(vec![geometry]));
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
