//! Signed offsetting (buffering) with join-style control.
//!
//! Polygon rings are offset with cavalier_contours; the offset polylines come
//! back with arc segments (bulges) at the joins, which are then flattened
//! according to the requested [`JoinStyle`]. Linework is buffered by unioning
//! segment rectangles, caps and join patches through csgrs.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use csgrs::traits::CSG;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic;
use std::str::FromStr;

use super::arc::{arc, circle, ArcDirection};
use super::boolean::{from_sketch, ring_to_sketch, to_sketch};
use super::{signed_area, Geometry, Point, Polygon};
use crate::error::GeometryError;

/// Mitre length limit, as a multiple of the offset distance
const MITRE_LIMIT: f64 = 5.0;
const EPS: f64 = 1e-9;

/// Corner treatment for buffered geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStyle {
    #[default]
    Round,
    Square,
    Bevel,
}

impl fmt::Display for JoinStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Round => write!(f, "Round"),
            Self::Square => write!(f, "Square"),
            Self::Bevel => write!(f, "Bevel"),
        }
    }
}

impl FromStr for JoinStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "round" => Ok(Self::Round),
            "square" | "mitre" | "miter" => Ok(Self::Square),
            "bevel" => Ok(Self::Bevel),
            _ => Err(format!("Unknown join style: {}", s)),
        }
    }
}

fn ccw(ring: &[Point]) -> Vec<Point> {
    let mut ring = ring.to_vec();
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}

fn to_polyline(ring: &[Point]) -> Polyline<f64> {
    let mut pline = Polyline::new();
    let mut last: Option<Point> = None;
    for p in ring {
        if last.is_some_and(|l| l.distance_to(p) < 1e-7) {
            continue;
        }
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
        last = Some(*p);
    }
    if let (Some(first), Some(last)) = (ring.first(), last) {
        if pline.vertex_count() > 1 && first.distance_to(&last) < 1e-7 {
            pline.remove_last();
        }
    }
    pline.set_is_closed(true);
    pline
}

/// Replace the arc between `a` and `b` (bulge `bulge`) by straight segments.
/// Pushes the intermediate points only.
fn flatten_join(a: Point, b: Point, bulge: f64, join: JoinStyle, steps: usize, out: &mut Vec<Point>) {
    let chord = b - a;
    let len = chord.length();
    if len < EPS {
        return;
    }
    let right = Point::new(chord.y, -chord.x) * (1.0 / len);
    let mid = a.midpoint(&b);
    let side = bulge.signum();

    match join {
        JoinStyle::Bevel => {}
        JoinStyle::Square => {
            let b_abs = bulge.abs();
            let ratio = (1.0 + b_abs * b_abs) / (1.0 - b_abs * b_abs);
            if b_abs < 1.0 && ratio <= MITRE_LIMIT {
                let h = len * b_abs / (1.0 - b_abs * b_abs);
                out.push(mid + right * (side * h));
            }
        }
        JoinStyle::Round => {
            let theta = 4.0 * bulge.atan();
            let radius = len / (2.0 * (theta.abs() / 2.0).sin());
            let apex = mid + right * (bulge * len / 2.0);
            let center = apex - right * (side * radius);
            let start = (a.y - center.y).atan2(a.x - center.x);
            let stop = (b.y - center.y).atan2(b.x - center.x);
            let direction = if bulge > 0.0 {
                ArcDirection::Ccw
            } else {
                ArcDirection::Cw
            };
            let pts = arc(center, radius, start, stop, direction, steps);
            if pts.len() > 2 {
                out.extend_from_slice(&pts[1..pts.len() - 1]);
            }
        }
    }
}

fn flatten_polyline(pline: &Polyline<f64>, join: JoinStyle, steps: usize) -> Vec<Point> {
    let n = pline.vertex_count();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let v = pline.at(i);
        let a = Point::new(v.x, v.y);
        out.push(a);
        if v.bulge.abs() > 1e-12 && (pline.is_closed() || i + 1 < n) {
            let w = pline.at((i + 1) % n);
            flatten_join(a, Point::new(w.x, w.y), v.bulge, join, steps, &mut out);
        }
    }
    out
}

/// Offset one ring, treated as the boundary of its own region.
/// Positive `delta` grows the region.
fn offset_ring(
    ring: &[Point],
    delta: f64,
    join: JoinStyle,
    steps: usize,
) -> Result<Vec<Vec<Point>>, GeometryError> {
    let pline = to_polyline(&ccw(ring));
    if pline.vertex_count() < 3 {
        return Ok(Vec::new());
    }
    // cavalier offsets to the left for positive values, i.e. inward for CCW
    let offsets = panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(-delta)))
        .map_err(|_| GeometryError::OffsetFailed("parallel offset panicked".to_string()))?;
    Ok(offsets
        .iter()
        .map(|pl| flatten_polyline(pl, join, steps))
        .filter(|r| r.len() >= 3 && signed_area(r).abs() > EPS)
        .collect())
}

fn buffer_polygons(
    polygons: &[Polygon],
    delta: f64,
    join: JoinStyle,
    steps: usize,
) -> Result<Vec<Polygon>, GeometryError> {
    let merged = from_sketch(&to_sketch(polygons));
    if delta.abs() < EPS {
        return Ok(merged);
    }
    let mut positive = csgrs::sketch::Sketch::new();
    let mut negative = csgrs::sketch::Sketch::new();
    for poly in &merged {
        for ring in offset_ring(&poly.exterior, delta, join, steps)? {
            positive = positive.union(&ring_to_sketch(&ring));
        }
        for hole in &poly.interiors {
            for ring in offset_ring(hole, -delta, join, steps)? {
                negative = negative.union(&ring_to_sketch(&ring));
            }
        }
    }
    Ok(from_sketch(&positive.difference(&negative)))
}

fn join_patch(v: Point, n1: Point, n2: Point, d: f64, join: JoinStyle) -> Option<Vec<Point>> {
    let a = v + n1 * d;
    let b = v + n2 * d;
    match join {
        JoinStyle::Round => None,
        JoinStyle::Bevel => Some(vec![v, a, b]),
        JoinStyle::Square => {
            let m = n1 + n2;
            let m2 = m.dot(&m);
            if m2 < EPS || 2.0 / m2.sqrt() > MITRE_LIMIT {
                return Some(vec![v, a, b]);
            }
            Some(vec![v, a, v + m * (2.0 * d / m2), b])
        }
    }
}

fn buffer_lines(lines: &[Vec<Point>], d: f64, join: JoinStyle, steps: usize) -> Vec<Polygon> {
    let mut pieces: Vec<Polygon> = Vec::new();
    let disc = |c: Point| Polygon::new(circle(c, d, steps));

    for line in lines {
        let mut path: Vec<Point> = Vec::with_capacity(line.len());
        for p in line {
            if path.last().is_none_or(|l: &Point| l.distance_to(p) > EPS) {
                path.push(*p);
            }
        }
        if path.len() == 1 {
            pieces.push(disc(path[0]));
            continue;
        }
        let closed = path.len() > 2 && path[0].distance_to(&path[path.len() - 1]) < EPS;
        if closed {
            path.pop();
        }

        let seg_count = if closed { path.len() } else { path.len() - 1 };
        let seg = |i: usize| (path[i], path[(i + 1) % path.len()]);
        let left_normal = |a: Point, b: Point| {
            let u = b - a;
            Point::new(-u.y, u.x) * (1.0 / u.length())
        };

        for i in 0..seg_count {
            let (a, b) = seg(i);
            let n = left_normal(a, b) * d;
            pieces.push(Polygon::new(ccw(&[a - n, b - n, b + n, a + n])));
        }

        if !closed {
            pieces.push(disc(path[0]));
            pieces.push(disc(path[path.len() - 1]));
        }

        let joints: Vec<usize> = if closed {
            (0..path.len()).collect()
        } else {
            (1..path.len() - 1).collect()
        };
        for i in joints {
            let v = path[i];
            if join == JoinStyle::Round {
                pieces.push(disc(v));
                continue;
            }
            let prev = path[(i + path.len() - 1) % path.len()];
            let next = path[(i + 1) % path.len()];
            let turn = (v - prev).cross(&(next - v));
            if turn.abs() < EPS {
                continue;
            }
            // outer side is right of a left turn, left of a right turn
            let side = if turn > 0.0 { -1.0 } else { 1.0 };
            let n1 = left_normal(prev, v) * side;
            let n2 = left_normal(v, next) * side;
            if let Some(patch) = join_patch(v, n1, n2, d, join) {
                pieces.push(Polygon::new(ccw(&patch)));
            }
        }
    }
    from_sketch(&to_sketch(&pieces))
}

/// Buffer a set of geometries by `distance` and union the result.
///
/// Polygonal inputs are merged before offsetting. Linework has no interior,
/// so a non-positive distance leaves nothing of it.
pub fn buffer(
    geoms: &[Geometry],
    distance: f64,
    join: JoinStyle,
    steps_per_circle: usize,
) -> Result<Geometry, GeometryError> {
    let steps = steps_per_circle.max(8);
    let polygons: Vec<Polygon> = geoms.iter().flat_map(Geometry::polygons).collect();
    let lines: Vec<Vec<Point>> = geoms
        .iter()
        .filter(|g| !g.is_polygonal())
        .flat_map(Geometry::paths)
        .collect();

    let mut result = if polygons.is_empty() {
        Vec::new()
    } else {
        buffer_polygons(&polygons, distance, join, steps)?
    };
    if !lines.is_empty() && distance > EPS {
        let swept = buffer_lines(&lines, distance, join, steps);
        result = if result.is_empty() {
            swept
        } else {
            result.extend(swept);
            from_sketch(&to_sketch(&result))
        };
    }
    tracing::debug!(distance, %join, polygons = result.len(), "buffer computed");
    Ok(Geometry::from_polygons(result))
}
