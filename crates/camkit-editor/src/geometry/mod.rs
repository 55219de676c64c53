//! Geometry model and stateless geometry operations.
//!
//! Shapes are made of a small set of planar primitives. Rings are stored open
//! (the closing vertex is implied) and polygons follow the even-odd rule.

pub mod arc;
pub mod boolean;
pub mod buffer;
pub mod clip;
pub mod paint;
pub mod transform;

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::spatial_index::Bounds;
pub use transform::Affine;

/// A 2D point or vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Z component of the cross product of two vectors
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Signed area of an open ring, positive for counter-clockwise.
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.cross(&b);
    }
    sum / 2.0
}

/// Return the ring with its closing vertex appended.
pub fn close_ring(ring: &[Point]) -> Vec<Point> {
    let mut closed = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            closed.push(*first);
        }
    }
    closed
}

/// Drop a duplicated closing vertex, if present.
pub fn open_ring(mut ring: Vec<Point>) -> Vec<Point> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// A polygon with optional holes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Point>) -> Self {
        Self {
            exterior: open_ring(exterior),
            interiors: Vec::new(),
        }
    }

    pub fn with_interiors(exterior: Vec<Point>, interiors: Vec<Vec<Point>>) -> Self {
        Self {
            exterior: open_ring(exterior),
            interiors: interiors.into_iter().map(open_ring).collect(),
        }
    }

    /// Enclosed area, holes subtracted
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|r| signed_area(r).abs()).sum();
        (signed_area(&self.exterior).abs() - holes).max(0.0)
    }

    /// Even-odd containment test over all rings
    pub fn contains_point(&self, p: &Point) -> bool {
        clip::ring_contains(&self.exterior, p)
            && !self.interiors.iter().any(|hole| clip::ring_contains(hole, p))
    }

    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point>> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.exterior.iter())
    }

    fn map_points(&self, f: &impl Fn(Point) -> Point) -> Polygon {
        Polygon {
            exterior: self.exterior.iter().map(|p| f(*p)).collect(),
            interiors: self
                .interiors
                .iter()
                .map(|r| r.iter().map(|p| f(*p)).collect())
                .collect(),
        }
    }
}

/// Geometric value held by a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    LineString(Vec<Point>),
    /// Closed polyline stored open
    LinearRing(Vec<Point>),
    MultiLineString(Vec<Vec<Point>>),
}

impl Geometry {
    /// True for null geometry or an empty collection
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Polygon(p) => p.exterior.is_empty(),
            Geometry::MultiPolygon(ps) => ps.iter().all(|p| p.exterior.is_empty()),
            Geometry::LineString(pts) | Geometry::LinearRing(pts) => pts.is_empty(),
            Geometry::MultiLineString(lines) => lines.iter().all(|l| l.is_empty()),
        }
    }

    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    /// Every vertex, rings and members included
    pub fn points(&self) -> Vec<Point> {
        match self {
            Geometry::Polygon(p) => p.rings().flatten().copied().collect(),
            Geometry::MultiPolygon(ps) => ps
                .iter()
                .flat_map(|p| p.rings().flatten().copied())
                .collect(),
            Geometry::LineString(pts) | Geometry::LinearRing(pts) => pts.clone(),
            Geometry::MultiLineString(lines) => lines.iter().flatten().copied().collect(),
        }
    }

    /// Vertices after Douglas-Peucker simplification of every line and ring
    pub fn simplified_points(&self, tolerance: f64) -> Vec<Point> {
        if tolerance <= 0.0 {
            return self.points();
        }
        self.paths()
            .iter()
            .flat_map(|path| simplify(path, tolerance))
            .collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points().iter())
    }

    pub fn area(&self) -> f64 {
        self.polygons().iter().map(Polygon::area).sum()
    }

    pub fn polygons(&self) -> Vec<Polygon> {
        match self {
            Geometry::Polygon(p) => vec![p.clone()],
            Geometry::MultiPolygon(ps) => ps.clone(),
            _ => Vec::new(),
        }
    }

    /// Linework as explicit point sequences, rings closed
    pub fn paths(&self) -> Vec<Vec<Point>> {
        match self {
            Geometry::Polygon(p) => p.rings().map(|r| close_ring(r)).collect(),
            Geometry::MultiPolygon(ps) => ps
                .iter()
                .flat_map(|p| p.rings().map(|r| close_ring(r)))
                .collect(),
            Geometry::LineString(pts) => vec![pts.clone()],
            Geometry::LinearRing(pts) => vec![close_ring(pts)],
            Geometry::MultiLineString(lines) => lines.clone(),
        }
    }

    /// Exterior ring of every polygon, each as its own ring geometry
    pub fn exteriors(&self) -> Vec<Geometry> {
        self.polygons()
            .into_iter()
            .filter(|p| !p.exterior.is_empty())
            .map(|p| Geometry::LinearRing(p.exterior))
            .collect()
    }

    /// Interior rings of every polygon
    pub fn interiors(&self) -> Vec<Geometry> {
        self.polygons()
            .into_iter()
            .flat_map(|p| p.interiors.into_iter())
            .map(Geometry::LinearRing)
            .collect()
    }

    /// Distance from `p` to this geometry; zero inside a polygon.
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        if self.polygons().iter().any(|poly| poly.contains_point(p)) {
            return 0.0;
        }
        self.paths()
            .iter()
            .map(|path| clip::distance_to_path(path, p))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn transformed(&self, affine: &Affine) -> Geometry {
        self.map_points(|p| affine.apply(p))
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Geometry {
        self.map_points(|p| Point::new(p.x + dx, p.y + dy))
    }

    fn map_points(&self, f: impl Fn(Point) -> Point) -> Geometry {
        let line = |pts: &Vec<Point>| pts.iter().map(|p| f(*p)).collect::<Vec<_>>();
        match self {
            Geometry::Polygon(p) => Geometry::Polygon(p.map_points(&f)),
            Geometry::MultiPolygon(ps) => {
                Geometry::MultiPolygon(ps.iter().map(|p| p.map_points(&f)).collect())
            }
            Geometry::LineString(pts) => Geometry::LineString(line(pts)),
            Geometry::LinearRing(pts) => Geometry::LinearRing(line(pts)),
            Geometry::MultiLineString(lines) => {
                Geometry::MultiLineString(lines.iter().map(line).collect())
            }
        }
    }

    /// Collapse a list of polygons into the smallest fitting variant.
    pub fn from_polygons(mut polygons: Vec<Polygon>) -> Geometry {
        polygons.retain(|p| !p.exterior.is_empty());
        if polygons.len() == 1 {
            Geometry::Polygon(polygons.remove(0))
        } else {
            Geometry::MultiPolygon(polygons)
        }
    }

    /// Collapse a list of lines into the smallest fitting variant.
    pub fn from_lines(mut lines: Vec<Vec<Point>>) -> Geometry {
        lines.retain(|l| l.len() > 1);
        if lines.len() == 1 {
            Geometry::LineString(lines.remove(0))
        } else {
            Geometry::MultiLineString(lines)
        }
    }
}

/// Douglas-Peucker simplification of an open polyline
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        let mut max_dist = 0.0;
        let mut index = start;
        for i in start + 1..end {
            let d = clip::distance_to_segment(&points[i], &points[start], &points[end]);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }
        if max_dist > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}
