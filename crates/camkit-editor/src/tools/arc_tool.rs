use super::{EditorView, Key, Status, Tool, ToolKind, ToolOutput};
use crate::geometry::arc::{construct, ArcDirection, ArcMode};
use crate::geometry::{Geometry, Point};

/// Three-click arc.
///
/// `o` flips the sweep direction and `p` cycles the point order between
/// center-start-end, start-end-center and start-through-end.
#[derive(Debug)]
pub struct ArcTool {
    points: Vec<Point>,
    direction: ArcDirection,
    mode: ArcMode,
    steps: usize,
    output: Option<ToolOutput>,
    complete: bool,
}

impl ArcTool {
    pub fn new(view: &dyn EditorView) -> Self {
        Self {
            points: Vec::new(),
            direction: ArcDirection::Cw,
            mode: ArcMode::CenterStartEnd,
            steps: view.config().drawing.circle_steps,
            output: None,
            complete: false,
        }
    }

    pub fn direction(&self) -> ArcDirection {
        self.direction
    }

    pub fn mode(&self) -> ArcMode {
        self.mode
    }

    fn arc_line(&self, points: [Point; 3]) -> Option<Geometry> {
        let arc = construct(self.mode, points, self.direction)?;
        Some(Geometry::LineString(arc.points(self.steps)))
    }
}

impl Tool for ArcTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Arc
    }

    fn start_message(&self) -> &str {
        "Click on CENTER ..."
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        self.points.push(point);
        match self.points.len() {
            1 => Some(Status::info("Click on 1st point ...")),
            2 => Some(Status::info("Click on 2nd point to complete ...")),
            3 => {
                let points = [self.points[0], self.points[1], self.points[2]];
                match self.arc_line(points) {
                    Some(arc) => self.output = Some(ToolOutput::Shapes(vec![arc])),
                    None => tracing::debug!(mode = %self.mode, "degenerate arc discarded"),
                }
                self.complete = true;
                Some(Status::info("Done."))
            }
            _ => None,
        }
    }

    fn on_key(&mut self, _view: &dyn EditorView, key: &Key) -> Option<Status> {
        if key.is_char('o') {
            self.direction = self.direction.toggled();
            return Some(Status::info(format!("Direction: {}", self.direction)));
        }
        if key.is_char('p') {
            self.mode = self.mode.next();
            return Some(Status::info(format!("Mode: {}", self.mode)));
        }
        None
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        match *self.points.as_slice() {
            [first] => vec![Geometry::LineString(vec![first, cursor])],
            [first, second] => {
                let Some(arc) = construct(self.mode, [first, second, cursor], self.direction)
                else {
                    return Vec::new();
                };
                let mut shapes = vec![
                    Geometry::LineString(arc.points(self.steps)),
                    marker(arc.center),
                ];
                if self.mode == ArcMode::ThroughPoint {
                    shapes.push(marker(first));
                    shapes.push(marker(second));
                }
                shapes
            }
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

/// Single-point marker used to show construction points in previews
fn marker(p: Point) -> Geometry {
    Geometry::LineString(vec![p, p])
}
