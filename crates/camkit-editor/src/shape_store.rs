//! Spatial container of committed shapes.
//!
//! Each shape is indexed by its vertices, optionally simplified by a
//! tolerance. Nearest queries return the closest indexed vertex and the shape
//! owning it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StoreError;
use crate::geometry::{Geometry, Point};
use crate::snap::PointSource;
use crate::spatial_index::SpatialIndex;

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(u64);

impl ShapeId {
    /// Allocate a fresh, process-wide unique ID
    pub fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A geometry plus its utility flag.
///
/// Utility shapes are preview geometry and never enter a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub geometry: Geometry,
    #[serde(default)]
    pub utility: bool,
}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: ShapeId::next(),
            geometry,
            utility: false,
        }
    }

    pub fn utility(geometry: Geometry) -> Self {
        Self {
            id: ShapeId::next(),
            geometry,
            utility: true,
        }
    }
}

/// Spatially indexed set of committed shapes
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: BTreeMap<ShapeId, (Shape, Vec<Point>)>,
    index: SpatialIndex<ShapeId>,
    tolerance: f64,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose index keys are simplified by `tolerance`
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
            ..Self::default()
        }
    }

    /// Add a shape to the store.
    ///
    /// # Panics
    ///
    /// Panics if the geometry is empty or the shape is a utility shape; both
    /// are programming errors upstream.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        assert!(
            !shape.geometry.is_empty(),
            "cannot insert empty geometry into a shape store"
        );
        assert!(!shape.utility, "utility shapes are never stored");

        let id = shape.id;
        self.remove(id);
        let mut points = shape.geometry.simplified_points(self.tolerance);
        if points.is_empty() {
            points = shape.geometry.points();
        }
        for p in &points {
            self.index.insert(id, *p);
        }
        self.shapes.insert(id, (shape, points));
        id
    }

    /// Remove a shape and all its index entries
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let (shape, points) = self.shapes.remove(&id)?;
        for p in points {
            self.index.remove(&id, p);
        }
        Some(shape)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id).map(|(s, _)| s)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Closest indexed point to `p` and the shape that owns it
    pub fn nearest(&self, p: Point) -> Result<(Point, &Shape), StoreError> {
        let (pt, id) = self.index.nearest(p).ok_or(StoreError::Empty)?;
        let shape = self.get(id).ok_or(StoreError::Empty)?;
        Ok((pt, shape))
    }

    /// All stored shapes, in ID order
    pub fn all_objects(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes.values().map(|(s, _)| s)
    }

    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.keys().copied().collect()
    }

    /// Shapes within `tolerance` of `p` or containing it, closest first.
    /// Equal distances are ordered by ID.
    pub fn candidates_at(&self, p: Point, tolerance: f64) -> Vec<ShapeId> {
        let mut hits: Vec<(f64, ShapeId)> = self
            .all_objects()
            .filter(|s| {
                s.geometry.bounds().is_some_and(|b| {
                    b.distance_to_point(&p) <= tolerance
                })
            })
            .map(|s| (s.geometry.distance_to_point(&p), s.id))
            .filter(|(d, _)| *d <= tolerance)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, id)| id).collect()
    }

    /// Remove and return every shape
    pub fn drain(&mut self) -> Vec<Shape> {
        self.index.clear();
        std::mem::take(&mut self.shapes)
            .into_values()
            .map(|(s, _)| s)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl PointSource for ShapeStore {
    fn nearest_point(&self, p: Point) -> Option<Point> {
        self.nearest(p).ok().map(|(pt, _)| pt)
    }
}
