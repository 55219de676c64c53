//! Drill editor tools: single drill, drill array and resize.
//!
//! A drill is drawn as a `+` marker whose strokes are one diameter long.

use camkit_core::DiameterKey;
use serde::{Deserialize, Serialize};

use super::{EditorView, Status, Tool, ToolKind, ToolOutput};
use crate::error::{EditError, Result};
use crate::geometry::arc::ArcDirection;
use crate::geometry::{Geometry, Point};

/// Cross marker for a drill of `diameter` centered on `p`
pub fn marker(p: Point, diameter: f64) -> Geometry {
    let r = diameter / 2.0;
    Geometry::MultiLineString(vec![
        vec![Point::new(p.x - r, p.y), Point::new(p.x + r, p.y)],
        vec![Point::new(p.x, p.y - r), Point::new(p.x, p.y + r)],
    ])
}

/// Drill position recovered from a marker: horizontal stroke start plus half
/// a diameter.
pub fn marker_point(marker: &Geometry, diameter: f64) -> Option<Point> {
    let Geometry::MultiLineString(lines) = marker else {
        return None;
    };
    let start = lines.first()?.first()?;
    Some(Point::new(start.x + diameter / 2.0, start.y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayType {
    #[default]
    Linear,
    Circular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
}

/// Drill array panel values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillArrayParams {
    pub array_type: ArrayType,
    /// Number of drills
    pub size: usize,
    /// Linear spacing
    pub pitch: f64,
    pub axis: Axis,
    /// Circular spacing in degrees
    pub angle: f64,
    pub direction: ArcDirection,
}

impl Default for DrillArrayParams {
    fn default() -> Self {
        Self {
            array_type: ArrayType::Linear,
            size: 5,
            pitch: 2.54,
            axis: Axis::X,
            angle: 12.0,
            direction: ArcDirection::Cw,
        }
    }
}

impl DrillArrayParams {
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(EditError::InvalidParameter {
                name: "array size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.pitch.is_finite() {
            return Err(EditError::InvalidParameter {
                name: "pitch",
                reason: "the value is not a number".to_string(),
            });
        }
        if !self.angle.is_finite() {
            return Err(EditError::InvalidParameter {
                name: "angle",
                reason: "the value is not a number".to_string(),
            });
        }
        Ok(())
    }

    /// Drill centers of a linear array starting at `start`
    pub fn linear_points(&self, start: Point) -> Vec<Point> {
        (0..self.size)
            .map(|i| {
                let offset = self.pitch * i as f64;
                match self.axis {
                    Axis::X => Point::new(start.x + offset, start.y),
                    Axis::Y => Point::new(start.x, start.y + offset),
                }
            })
            .collect()
    }

    /// Drill centers of a circular array around `center`, first drill at
    /// `start`
    pub fn circular_points(&self, center: Point, start: Point) -> Result<Vec<Point>> {
        if self.angle * self.size as f64 > 360.0 {
            return Err(EditError::TooManyDrills);
        }
        let radius = center.distance_to(&start);
        if radius <= 0.0 {
            return Err(EditError::InvalidParameter {
                name: "radius",
                reason: "the start position is on the center".to_string(),
            });
        }
        let initial = (start.y - center.y).atan2(start.x - center.x);
        let sign = match self.direction {
            ArcDirection::Cw => -1.0,
            ArcDirection::Ccw => 1.0,
        };
        Ok((0..self.size)
            .map(|i| {
                let theta = initial + sign * (self.angle * i as f64).to_radians();
                Point::new(
                    center.x + radius * theta.cos(),
                    center.y + radius * theta.sin(),
                )
            })
            .collect())
    }
}

fn markers(points: &[Point], diameter: f64) -> Vec<Geometry> {
    points.iter().map(|p| marker(*p, diameter)).collect()
}

#[derive(Debug)]
pub struct AddDrillTool {
    diameter: f64,
    output: Option<ToolOutput>,
    complete: bool,
}

impl AddDrillTool {
    pub fn new(view: &dyn EditorView) -> Result<Self> {
        let diameter = view.active_diameter().ok_or(EditError::NoToolForDrill)?;
        Ok(Self {
            diameter,
            output: None,
            complete: false,
        })
    }
}

impl Tool for AddDrillTool {
    fn kind(&self) -> ToolKind {
        ToolKind::AddDrill
    }

    fn start_message(&self) -> &str {
        "Click on target location ..."
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        self.output = Some(ToolOutput::Drills {
            diameter: self.diameter,
            markers: vec![marker(point, self.diameter)],
        });
        self.complete = true;
        Some(Status::success("Done. Drill added."))
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        vec![marker(cursor, self.diameter)]
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

/// Linear arrays commit on one click; circular arrays take the center and
/// then the position of the first drill.
#[derive(Debug)]
pub struct DrillArrayTool {
    diameter: f64,
    params: DrillArrayParams,
    center: Option<Point>,
    output: Option<ToolOutput>,
    complete: bool,
}

impl DrillArrayTool {
    pub fn new(view: &dyn EditorView) -> Result<Self> {
        let diameter = view.active_diameter().ok_or(EditError::NoToolForArray)?;
        let params = view.parameters().drill_array.clone();
        params.validate()?;
        Ok(Self {
            diameter,
            params,
            center: None,
            output: None,
            complete: false,
        })
    }
}

impl Tool for DrillArrayTool {
    fn kind(&self) -> ToolKind {
        ToolKind::AddDrillArray
    }

    fn start_message(&self) -> &str {
        match self.params.array_type {
            ArrayType::Linear => "Click on target location ...",
            ArrayType::Circular => "Click on the circular array Center position",
        }
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        let points = match (self.params.array_type, self.center) {
            (ArrayType::Linear, _) => Ok(self.params.linear_points(point)),
            (ArrayType::Circular, None) => {
                self.center = Some(point);
                return Some(Status::info("Click on the circular array Start position"));
            }
            (ArrayType::Circular, Some(center)) => self.params.circular_points(center, point),
        };
        self.complete = true;
        match points {
            Ok(points) => {
                self.output = Some(ToolOutput::Drills {
                    diameter: self.diameter,
                    markers: markers(&points, self.diameter),
                });
                Some(Status::success("Done. Drill Array added."))
            }
            Err(err) => {
                self.output = Some(ToolOutput::Abort(err));
                None
            }
        }
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        match (self.params.array_type, self.center) {
            (ArrayType::Linear, _) => markers(&self.params.linear_points(cursor), self.diameter),
            (ArrayType::Circular, None) => Vec::new(),
            (ArrayType::Circular, Some(center)) => {
                let mut shapes = vec![Geometry::LineString(vec![center, cursor])];
                if let Ok(points) = self.params.circular_points(center, cursor) {
                    shapes.extend(markers(&points, self.diameter));
                }
                shapes
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

/// Confirms a resize of the selected drills to the panel diameter
#[derive(Debug, Default)]
pub struct ResizeDrillTool {
    output: Option<ToolOutput>,
    complete: bool,
}

impl ResizeDrillTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for ResizeDrillTool {
    fn kind(&self) -> ToolKind {
        ToolKind::ResizeDrill
    }

    fn start_message(&self) -> &str {
        "Click on the Drill(s) to resize ..."
    }

    fn click(&mut self, _view: &dyn EditorView, _point: Point) -> Option<Status> {
        None
    }

    fn preview(&self, _view: &dyn EditorView, _cursor: Point) -> Vec<Geometry> {
        Vec::new()
    }

    fn finish(&mut self, view: &dyn EditorView) -> bool {
        let output = match view.parameters().resize_diameter {
            Some(diameter) if DiameterKey::checked(diameter, view.units()).is_some() => {
                ToolOutput::ResizeDrills { diameter }
            }
            Some(diameter) => ToolOutput::Abort(EditError::InvalidParameter {
                name: "resize diameter",
                reason: format!("{} rounds to zero or below", diameter),
            }),
            None => ToolOutput::Abort(EditError::MissingResizeDiameter),
        };
        self.output = Some(output);
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
