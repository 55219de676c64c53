//! Circle and circular arc construction.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::Point;

/// Sweep direction of an arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcDirection {
    #[default]
    Cw,
    Ccw,
}

impl ArcDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Cw => Self::Ccw,
            Self::Ccw => Self::Cw,
        }
    }
}

impl fmt::Display for ArcDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cw => write!(f, "CW"),
            Self::Ccw => write!(f, "CCW"),
        }
    }
}

/// How the three clicked points of an arc are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArcMode {
    /// Center, start point, end point
    #[default]
    #[serde(rename = "c12")]
    CenterStartEnd,
    /// Start point, end point, then a point that places the center
    #[serde(rename = "12c")]
    StartEndCenter,
    /// Start point, end point, then a point on the arc
    #[serde(rename = "132")]
    ThroughPoint,
}

impl ArcMode {
    /// Next mode in the c12, 12c, 132 cycle
    pub fn next(self) -> Self {
        match self {
            Self::CenterStartEnd => Self::StartEndCenter,
            Self::StartEndCenter => Self::ThroughPoint,
            Self::ThroughPoint => Self::CenterStartEnd,
        }
    }
}

impl fmt::Display for ArcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CenterStartEnd => write!(f, "c12"),
            Self::StartEndCenter => write!(f, "12c"),
            Self::ThroughPoint => write!(f, "132"),
        }
    }
}

/// A fully determined arc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub center: Point,
    pub radius: f64,
    /// Start angle in radians
    pub start: f64,
    /// Stop angle in radians
    pub stop: f64,
    pub direction: ArcDirection,
}

impl CircularArc {
    pub fn points(&self, steps_per_circle: usize) -> Vec<Point> {
        arc(
            self.center,
            self.radius,
            self.start,
            self.stop,
            self.direction,
            steps_per_circle,
        )
    }
}

/// Tessellate an arc from `start` to `stop` (radians) around `center`.
///
/// The sweep always runs in `direction`, wrapping through a full turn when
/// needed. At least two steps are produced; the result has `steps + 1` points.
pub fn arc(
    center: Point,
    radius: f64,
    start: f64,
    stop: f64,
    direction: ArcDirection,
    steps_per_circle: usize,
) -> Vec<Point> {
    let mut stop = stop;
    match direction {
        ArcDirection::Ccw if stop <= start => stop += 2.0 * PI,
        ArcDirection::Cw if stop >= start => stop -= 2.0 * PI,
        _ => {}
    }
    let angle = (stop - start).abs();
    let steps = ((angle / (2.0 * PI) * steps_per_circle as f64).ceil() as usize).max(2);
    let sign = match direction {
        ArcDirection::Cw => -1.0,
        ArcDirection::Ccw => 1.0,
    };
    let delta = sign * angle / steps as f64;
    (0..=steps)
        .map(|i| {
            let theta = start + delta * i as f64;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// Open ring of `steps` points on a full circle
pub fn circle(center: Point, radius: f64, steps: usize) -> Vec<Point> {
    let steps = steps.max(3);
    (0..steps)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / steps as f64;
            Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
        })
        .collect()
}

/// Circle through three points.
///
/// Returns the center, the radius and the sweep direction that takes the arc
/// from `p1` through `p2` to `p3`. `None` when the points are collinear.
pub fn three_point_circle(p1: Point, p2: Point, p3: Point) -> Option<(Point, f64, ArcDirection)> {
    let a1 = p1.midpoint(&p2);
    let a2 = p2.midpoint(&p3);
    let d1 = p2 - p1;
    let d2 = p3 - p2;
    let b1 = Point::new(d1.y, -d1.x);
    let b2 = Point::new(-d2.y, d2.x);

    // -b1 * t0 + b2 * t1 = a1 - a2
    let rhs = a1 - a2;
    let det = (-b1.x) * b2.y - b2.x * (-b1.y);
    if det.abs() < 1e-12 {
        return None;
    }
    let t0 = (rhs.x * b2.y - b2.x * rhs.y) / det;
    let center = a1 + b1 * t0;
    let radius = center.distance_to(&p1);
    let direction = if t0 > 0.0 {
        ArcDirection::Cw
    } else {
        ArcDirection::Ccw
    };
    Some((center, radius, direction))
}

fn angle_of(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Build an arc from three clicked points interpreted by `mode`.
///
/// `direction` applies to [`ArcMode::CenterStartEnd`] only; the other modes
/// derive their sweep from the points themselves.
pub fn construct(mode: ArcMode, points: [Point; 3], direction: ArcDirection) -> Option<CircularArc> {
    match mode {
        ArcMode::CenterStartEnd => {
            let [center, p1, p2] = points;
            let radius = center.distance_to(&p1);
            if radius <= 0.0 {
                return None;
            }
            Some(CircularArc {
                center,
                radius,
                start: angle_of(center, p1),
                stop: angle_of(center, p2),
                direction,
            })
        }
        ArcMode::StartEndCenter => {
            let [p1, p2, handle] = points;
            let chord = p2 - p1;
            let len = chord.length();
            if len <= 0.0 {
                return None;
            }
            let mid = p1.midpoint(&p2);
            let normal = Point::new(chord.y, -chord.x) * (1.0 / len);
            let side = (handle.x - p1.x) * chord.y - (handle.y - p1.y) * chord.x;
            // a handle on the chord line centers the arc on the chord
            let sign = if side == 0.0 { 0.0 } else { side.signum() };
            let t = handle.distance_to(&mid) * sign;
            let center = mid + normal * t;
            let turn = (handle - p1).cross(&(p2 - handle));
            let direction = if turn > 0.0 {
                ArcDirection::Ccw
            } else {
                ArcDirection::Cw
            };
            Some(CircularArc {
                center,
                radius: center.distance_to(&p1),
                start: angle_of(center, p1),
                stop: angle_of(center, p2),
                direction,
            })
        }
        ArcMode::ThroughPoint => {
            let [p1, p3, p2] = points;
            let (center, radius, direction) = three_point_circle(p1, p2, p3)?;
            Some(CircularArc {
                center,
                radius,
                start: angle_of(center, p1),
                stop: angle_of(center, p3),
                direction,
            })
        }
    }
}
