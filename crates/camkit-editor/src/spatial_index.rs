//! Point quadtree used for nearest-point and region queries.
//!
//! Every entry is a `(point, key)` pair; one key may be stored at many
//! points. Points outside the root bounds are kept in a flat overflow list so
//! the index accepts any coordinate.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::Point;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    /// Smallest bounds containing every point, `None` for no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Bounds>, p| {
            Some(match acc {
                None => Bounds::new(p.x, p.y, p.x, p.y),
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn center_point(&self) -> Point {
        let (x, y) = self.center();
        Point::new(x, y)
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Distance from a point to the box, zero inside
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        let dx = (self.min_x - p.x).max(0.0).max(p.x - self.max_x);
        let dy = (self.min_y - p.y).max(0.0).max(p.y - self.max_y);
        (dx * dx + dy * dy).sqrt()
    }

    fn quadrants(&self) -> [Bounds; 4] {
        let (cx, cy) = self.center();
        [
            Bounds::new(self.min_x, self.min_y, cx, cy),
            Bounds::new(cx, self.min_y, self.max_x, cy),
            Bounds::new(self.min_x, cy, cx, self.max_y),
            Bounds::new(cx, cy, self.max_x, self.max_y),
        ]
    }
}

type Entries<K> = SmallVec<[(Point, K); 8]>;

#[derive(Debug, Clone)]
struct QuadtreeNode<K> {
    bounds: Bounds,
    depth: usize,
    items: Entries<K>,
    children: Option<Box<[QuadtreeNode<K>; 4]>>,
}

impl<K: Clone + Ord> QuadtreeNode<K> {
    fn new(bounds: Bounds, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: SmallVec::new(),
            children: None,
        }
    }

    fn child_index(&self, p: &Point) -> usize {
        let (cx, cy) = self.bounds.center();
        usize::from(p.x >= cx) + 2 * usize::from(p.y >= cy)
    }

    fn insert(&mut self, point: Point, key: K, max_depth: usize, max_items: usize) {
        let i = self.child_index(&point);
        if let Some(children) = self.children.as_mut() {
            children[i].insert(point, key, max_depth, max_items);
            return;
        }
        self.items.push((point, key));
        if self.items.len() > max_items && self.depth < max_depth {
            self.split(max_depth, max_items);
        }
    }

    fn split(&mut self, max_depth: usize, max_items: usize) {
        let [a, b, c, d] = self.bounds.quadrants();
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            QuadtreeNode::new(a, depth),
            QuadtreeNode::new(b, depth),
            QuadtreeNode::new(c, depth),
            QuadtreeNode::new(d, depth),
        ]));
        for (point, key) in std::mem::take(&mut self.items) {
            self.insert(point, key, max_depth, max_items);
        }
    }

    fn remove(&mut self, key: &K, point: &Point) -> bool {
        let i = self.child_index(point);
        match self.children.as_mut() {
            Some(children) => children[i].remove(key, point),
            None => match self.items.iter().position(|(p, k)| p == point && k == key) {
                Some(pos) => {
                    self.items.remove(pos);
                    true
                }
                None => false,
            },
        }
    }

    fn query(&self, area: &Bounds, out: &mut Vec<(Point, K)>) {
        if !self.bounds.intersects(area) {
            return;
        }
        out.extend(
            self.items
                .iter()
                .filter(|(p, _)| area.contains_point(p.x, p.y))
                .cloned(),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(area, out);
            }
        }
    }

    fn nearest(&self, target: &Point, best: &mut Option<(f64, Point, K)>) {
        if let Some((d, _, _)) = best {
            if self.bounds.distance_to_point(target) > *d {
                return;
            }
        }
        for (p, k) in &self.items {
            consider(best, target, p, k);
        }
        if let Some(children) = &self.children {
            let mut order: Vec<&QuadtreeNode<K>> = children.iter().collect();
            order.sort_by(|a, b| {
                a.bounds
                    .distance_to_point(target)
                    .total_cmp(&b.bounds.distance_to_point(target))
            });
            for child in order {
                child.nearest(target, best);
            }
        }
    }

    fn collect_stats(&self, stats: &mut SpatialIndexStats) {
        stats.total_nodes += 1;
        stats.total_items += self.items.len();
        stats.max_depth = stats.max_depth.max(self.depth);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_stats(stats);
            }
        }
    }
}

/// Keep `(p, k)` if it is closer than the current best. Equal distances go
/// to the smaller key so repeated queries are deterministic.
fn consider<K: Clone + Ord>(best: &mut Option<(f64, Point, K)>, target: &Point, p: &Point, k: &K) {
    let d = target.distance_to(p);
    let better = match best {
        None => true,
        Some((bd, _, bk)) => d < *bd || (d == *bd && *k < *bk),
    };
    if better {
        *best = Some((d, *p, k.clone()));
    }
}

/// Statistics about the index layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpatialIndexStats {
    pub total_nodes: usize,
    pub total_items: usize,
    pub max_depth: usize,
    pub overflow_items: usize,
}

/// Quadtree of points tagged with keys
#[derive(Debug, Clone)]
pub struct SpatialIndex<K> {
    root: QuadtreeNode<K>,
    overflow: Vec<(Point, K)>,
    max_depth: usize,
    max_items: usize,
    len: usize,
}

impl<K: Clone + Ord> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self::new(Bounds::new(-1.0e6, -1.0e6, 1.0e6, 1.0e6), 16, 16)
    }
}

impl<K: Clone + Ord> SpatialIndex<K> {
    /// Create an index covering `bounds`, splitting nodes that hold more than
    /// `max_items` entries until `max_depth` is reached.
    pub fn new(bounds: Bounds, max_depth: usize, max_items: usize) -> Self {
        Self {
            root: QuadtreeNode::new(bounds, 0),
            overflow: Vec::new(),
            max_depth,
            max_items: max_items.max(1),
            len: 0,
        }
    }

    pub fn insert(&mut self, key: K, point: Point) {
        if self.root.bounds.contains_point(point.x, point.y) {
            self.root
                .insert(point, key, self.max_depth, self.max_items);
        } else {
            self.overflow.push((point, key));
        }
        self.len += 1;
    }

    /// Remove one entry for `key` at `point`. Returns false if absent.
    pub fn remove(&mut self, key: &K, point: Point) -> bool {
        let removed = if self.root.bounds.contains_point(point.x, point.y) {
            self.root.remove(key, &point)
        } else {
            match self
                .overflow
                .iter()
                .position(|(p, k)| *p == point && k == key)
            {
                Some(pos) => {
                    self.overflow.swap_remove(pos);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Closest entry to `target`, ties broken by the smaller key
    pub fn nearest(&self, target: Point) -> Option<(Point, K)> {
        let mut best = None;
        for (p, k) in &self.overflow {
            consider(&mut best, &target, p, k);
        }
        self.root.nearest(&target, &mut best);
        best.map(|(_, p, k)| (p, k))
    }

    /// Entries whose point lies inside `area`
    pub fn query(&self, area: &Bounds) -> Vec<(Point, K)> {
        let mut out = Vec::new();
        self.root.query(area, &mut out);
        out.extend(
            self.overflow
                .iter()
                .filter(|(p, _)| area.contains_point(p.x, p.y))
                .cloned(),
        );
        out
    }

    /// Entries within `radius` of `center`
    pub fn within(&self, center: Point, radius: f64) -> Vec<(Point, K)> {
        let area = Bounds::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        );
        self.query(&area)
            .into_iter()
            .filter(|(p, _)| p.distance_to(&center) <= radius)
            .collect()
    }

    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
        self.overflow.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stats(&self) -> SpatialIndexStats {
        let mut stats = SpatialIndexStats::default();
        self.root.collect_stats(&mut stats);
        stats.overflow_items = self.overflow.len();
        stats.total_items += self.overflow.len();
        stats
    }
}
