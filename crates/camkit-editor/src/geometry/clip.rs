//! Point-in-ring tests, distances and clipping of linework against polygons.

use super::{Point, Polygon};

const EPS: f64 = 1e-12;

/// Even-odd point-in-ring test. The ring is open; the closing edge is implied.
pub fn ring_contains(ring: &[Point], p: &Point) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub fn distance_to_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = *b - *a;
    let len2 = ab.dot(&ab);
    if len2 < EPS {
        return p.distance_to(a);
    }
    let t = ((*p - *a).dot(&ab) / len2).clamp(0.0, 1.0);
    p.distance_to(&(*a + ab * t))
}

/// Distance from `p` to an open polyline
pub fn distance_to_path(path: &[Point], p: &Point) -> f64 {
    match path.len() {
        0 => f64::INFINITY,
        1 => p.distance_to(&path[0]),
        _ => path
            .windows(2)
            .map(|w| distance_to_segment(p, &w[0], &w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Parameter along `a->b` where it crosses `c->d`, if strictly inside `a->b`.
fn crossing(a: Point, b: Point, c: Point, d: Point) -> Option<f64> {
    let r = b - a;
    let s = d - c;
    let denom = r.cross(&s);
    if denom.abs() < EPS {
        return None;
    }
    let ac = c - a;
    let t = ac.cross(&s) / denom;
    let u = ac.cross(&r) / denom;
    ((0.0..=1.0).contains(&u) && t > EPS && t < 1.0 - EPS).then_some(t)
}

fn inside_any(polygons: &[Polygon], p: &Point) -> bool {
    polygons.iter().any(|poly| poly.contains_point(p))
}

/// Clip `line` against `polygons`, keeping pieces inside (or outside) them.
///
/// Contiguous kept pieces are merged back into a single polyline.
pub fn clip_line(line: &[Point], polygons: &[Polygon], keep_inside: bool) -> Vec<Vec<Point>> {
    let mut result = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for w in line.windows(2) {
        let (a, b) = (w[0], w[1]);
        let mut ts = vec![0.0, 1.0];
        for poly in polygons {
            for ring in poly.rings() {
                for i in 0..ring.len() {
                    let c = ring[i];
                    let d = ring[(i + 1) % ring.len()];
                    if let Some(t) = crossing(a, b, c, d) {
                        ts.push(t);
                    }
                }
            }
        }
        ts.sort_by(|x, y| x.total_cmp(y));
        ts.dedup_by(|x, y| (*x - *y).abs() < EPS);

        for pair in ts.windows(2) {
            let p0 = a + (b - a) * pair[0];
            let p1 = a + (b - a) * pair[1];
            let mid = p0.midpoint(&p1);
            if inside_any(polygons, &mid) == keep_inside {
                if current.is_empty() {
                    current.push(p0);
                }
                current.push(p1);
            } else if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        }
    }
    if current.len() > 1 {
        result.push(current);
    }
    result
}

/// Clip many lines; see [`clip_line`].
pub fn clip_lines(lines: &[Vec<Point>], polygons: &[Polygon], keep_inside: bool) -> Vec<Vec<Point>> {
    lines
        .iter()
        .flat_map(|line| clip_line(line, polygons, keep_inside))
        .collect()
}
