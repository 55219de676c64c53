//! Pocket filling ("paint") of closed regions.
//!
//! Each region is first shrunk by the margin, then filled with one of three
//! path families. Optionally, paths are chained into longer ones wherever the
//! tool can travel between them without leaving the region.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::arc::circle;
use super::buffer::{buffer, JoinStyle};
use super::clip::{self, distance_to_segment};
use super::{Geometry, Point, Polygon};
use crate::error::{EditError, GeometryError};
use crate::spatial_index::SpatialIndex;

/// Upper bound on seed-fill rings for a single region
const MAX_SEED_RINGS: usize = 10_000;

/// Path family used to fill a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintMethod {
    /// Repeated inward offsets of the boundary
    #[default]
    Standard,
    /// Concentric rings grown from an interior point
    Seed,
    /// Horizontal back-and-forth lines
    Lines,
}

impl fmt::Display for PaintMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Seed => write!(f, "seed"),
            Self::Lines => write!(f, "lines"),
        }
    }
}

impl FromStr for PaintMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "seed" => Ok(Self::Seed),
            "lines" => Ok(Self::Lines),
            _ => Err(format!("Unknown paint method: {}", s)),
        }
    }
}

/// Paint parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintParams {
    pub tool_diameter: f64,
    /// Fraction of the tool diameter shared by neighbouring passes
    pub overlap: f64,
    /// Distance kept from the region boundary
    pub margin: f64,
    pub method: PaintMethod,
    /// Chain passes to reduce tool lifts
    pub connect: bool,
    /// Add a pass following the boundary
    pub contour: bool,
}

impl Default for PaintParams {
    fn default() -> Self {
        Self {
            tool_diameter: 0.07,
            overlap: 0.15,
            margin: 0.0,
            method: PaintMethod::Standard,
            connect: true,
            contour: true,
        }
    }
}

impl PaintParams {
    pub fn validate(&self) -> Result<(), EditError> {
        let checks = [
            ("tool diameter", self.tool_diameter, self.tool_diameter > 0.0),
            ("overlap", self.overlap, (0.0..1.0).contains(&self.overlap)),
            ("margin", self.margin, self.margin >= 0.0),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(EditError::InvalidParameter {
                    name,
                    reason: format!("{} is out of range", value),
                });
            }
        }
        if self.tool_diameter >= self.overlap {
            return Err(EditError::OverlapNotAboveToolDiameter);
        }
        Ok(())
    }

    fn step(&self) -> f64 {
        self.tool_diameter * (1.0 - self.overlap)
    }
}

/// Closed regions to paint: polygons as they are, rings and paths closed.
pub fn regions(geom: &Geometry) -> Vec<Polygon> {
    if geom.is_polygonal() {
        return geom.polygons();
    }
    geom.paths()
        .into_iter()
        .map(Polygon::new)
        .filter(|p| p.exterior.len() >= 3)
        .collect()
}

fn rings_of(polygons: &[Polygon]) -> Vec<Vec<Point>> {
    Geometry::MultiPolygon(polygons.to_vec()).paths()
}

/// A point strictly inside the first polygon, on its horizontal mid line.
fn representative_point(polygons: &[Polygon]) -> Option<Point> {
    let poly = polygons.first()?;
    let bounds = poly.bounds()?;
    let (_, cy) = bounds.center();
    let scan = [
        Point::new(bounds.min_x - 1.0, cy),
        Point::new(bounds.max_x + 1.0, cy),
    ];
    clip::clip_line(&scan, std::slice::from_ref(poly), true)
        .into_iter()
        .filter(|piece| piece.len() >= 2)
        .max_by(|a, b| {
            let la = a[0].distance_to(&a[a.len() - 1]);
            let lb = b[0].distance_to(&b[b.len() - 1]);
            la.total_cmp(&lb)
        })
        .map(|piece| piece[0].midpoint(&piece[piece.len() - 1]))
}

fn clear_standard(
    region: &[Polygon],
    params: &PaintParams,
    steps: usize,
) -> Result<Vec<Vec<Point>>, GeometryError> {
    let mut current = buffer(
        &[Geometry::MultiPolygon(region.to_vec())],
        -params.tool_diameter / 1.999999,
        JoinStyle::Round,
        steps,
    )?;
    if current.area() <= 0.0 {
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    if params.contour {
        paths.extend(current.paths());
    }
    loop {
        current = buffer(&[current], -params.step(), JoinStyle::Round, steps)?;
        if current.area() > 0.0 {
            paths.extend(current.paths());
        } else {
            break;
        }
    }
    Ok(paths)
}

fn clear_seed(
    region: &[Polygon],
    params: &PaintParams,
    steps: usize,
) -> Result<Vec<Vec<Point>>, GeometryError> {
    let margin = buffer(
        &[Geometry::MultiPolygon(region.to_vec())],
        -params.tool_diameter / 2.0,
        JoinStyle::Round,
        steps,
    )?
    .polygons();
    let Some(seed) = representative_point(&margin) else {
        return Ok(Vec::new());
    };

    let mut paths = Vec::new();
    let mut radius = params.tool_diameter / 2.0 * (1.0 - params.overlap);
    for _ in 0..MAX_SEED_RINGS {
        let mut ring = circle(seed, radius, steps);
        ring.push(ring[0]);
        let pieces = clip::clip_line(&ring, &margin, true);
        if pieces.is_empty() {
            break;
        }
        paths.extend(pieces);
        radius += params.step();
    }
    if params.contour {
        paths.extend(rings_of(&margin));
    }
    Ok(paths)
}

fn clear_lines(
    region: &[Polygon],
    params: &PaintParams,
    steps: usize,
) -> Result<Vec<Vec<Point>>, GeometryError> {
    let Some(bounds) = Geometry::MultiPolygon(region.to_vec()).bounds() else {
        return Ok(Vec::new());
    };
    let half = params.tool_diameter / 1.99999999;
    let mut lines = Vec::new();
    let mut y = bounds.max_y - half;
    while y > bounds.min_y + half {
        lines.push(vec![Point::new(bounds.min_x, y), Point::new(bounds.max_x, y)]);
        y -= params.step();
    }
    let y = bounds.min_y + params.tool_diameter / 2.0;
    lines.push(vec![Point::new(bounds.min_x, y), Point::new(bounds.max_x, y)]);

    let margin = buffer(
        &[Geometry::MultiPolygon(region.to_vec())],
        -half,
        JoinStyle::Round,
        steps,
    )?
    .polygons();
    let mut paths = clip::clip_lines(&lines, &margin, true);
    if params.contour {
        paths.extend(rings_of(&margin));
    }
    Ok(paths)
}

fn segment_distance(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let r = b - a;
    let s = d - c;
    let denom = r.cross(&s);
    if denom.abs() > 1e-12 {
        let t = (c - a).cross(&s) / denom;
        let u = (c - a).cross(&r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            return 0.0;
        }
    }
    distance_to_segment(&a, &c, &d)
        .min(distance_to_segment(&b, &c, &d))
        .min(distance_to_segment(&c, &a, &b))
        .min(distance_to_segment(&d, &a, &b))
}

/// True when a tool of radius `r` can travel `a -> b` without leaving `boundary`.
fn walk_inside(boundary: &[Polygon], a: Point, b: Point, r: f64) -> bool {
    let mid = a.midpoint(&b);
    boundary.iter().any(|poly| {
        poly.contains_point(&mid)
            && poly.rings().all(|ring| {
                (0..ring.len()).all(|i| {
                    let c = ring[i];
                    let d = ring[(i + 1) % ring.len()];
                    segment_distance(a, b, c, d) >= r - 1e-9
                })
            })
    })
}

/// Chain paths end to start, nearest first, starting from the origin.
///
/// Two consecutive paths are joined when the connecting move stays inside
/// `boundary` with `tool_diameter / 2` clearance and is shorter than ten tool
/// diameters.
pub fn paint_connect(paths: Vec<Vec<Point>>, boundary: &[Polygon], tool_diameter: f64) -> Vec<Vec<Point>> {
    let paths: Vec<Vec<Point>> = paths.into_iter().filter(|p| !p.is_empty()).collect();
    if paths.is_empty() {
        return paths;
    }
    let max_walk = 10.0 * tool_diameter;
    let mut index: SpatialIndex<usize> = SpatialIndex::default();
    for (i, path) in paths.iter().enumerate() {
        index.insert(i, path[0]);
        index.insert(i, path[path.len() - 1]);
    }
    let mut slots: Vec<Option<Vec<Point>>> = paths.into_iter().map(Some).collect();
    let mut take = |index: &mut SpatialIndex<usize>, i: usize| -> Vec<Point> {
        let path = slots[i].take().unwrap_or_default();
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            index.remove(&i, *first);
            index.remove(&i, *last);
        }
        path
    };

    let mut optimized = Vec::new();
    let Some((_, first)) = index.nearest(Point::default()) else {
        return optimized;
    };
    let mut geo = take(&mut index, first);
    let mut current = geo[geo.len() - 1];

    while let Some((pt, i)) = index.nearest(current) {
        let mut candidate = take(&mut index, i);
        if pt != candidate[0] && pt == candidate[candidate.len() - 1] {
            candidate.reverse();
        }
        if walk_inside(boundary, current, pt, tool_diameter / 2.0)
            && current.distance_to(&pt) < max_walk
        {
            geo.extend(candidate);
        } else {
            optimized.push(std::mem::replace(&mut geo, candidate));
        }
        current = geo[geo.len() - 1];
    }
    optimized.push(geo);
    optimized
}

/// Paint every closed region of `geom`.
///
/// Returns one geometry per region that produced paths. Any failure aborts
/// the whole operation.
pub fn paint(geom: &Geometry, params: &PaintParams, steps_per_circle: usize) -> Result<Vec<Geometry>, GeometryError> {
    let mut results = Vec::new();
    for region in regions(geom) {
        let shrunk = buffer(
            &[Geometry::Polygon(region)],
            -params.margin,
            JoinStyle::Round,
            steps_per_circle,
        )?
        .polygons();
        if shrunk.is_empty() {
            continue;
        }
        let mut paths = match params.method {
            PaintMethod::Standard => clear_standard(&shrunk, params, steps_per_circle)?,
            PaintMethod::Seed => clear_seed(&shrunk, params, steps_per_circle)?,
            PaintMethod::Lines => clear_lines(&shrunk, params, steps_per_circle)?,
        };
        if params.connect {
            paths = paint_connect(paths, &shrunk, params.tool_diameter);
        }
        if !paths.is_empty() {
            results.push(Geometry::MultiLineString(paths));
        }
    }
    tracing::debug!(method = %params.method, regions = results.len(), "paint computed");
    Ok(results)
}
