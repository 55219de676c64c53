//! Boolean operations on shape geometry.
//!
//! Polygonal operands go through csgrs sketches. Linework is clipped against
//! polygons with [`clip`](super::clip).

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;

use super::{clip, open_ring, Geometry, Point, Polygon};
use crate::error::GeometryError;

pub(crate) fn ring_to_sketch(ring: &[Point]) -> Sketch<()> {
    let points: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
    Sketch::polygon(&points, None)
}

/// Convert polygons to a single csgrs sketch, holes cut out.
pub fn to_sketch(polygons: &[Polygon]) -> Sketch<()> {
    let mut sketch = Sketch::new();
    for poly in polygons.iter().filter(|p| p.exterior.len() >= 3) {
        let mut s = ring_to_sketch(&poly.exterior);
        for hole in poly.interiors.iter().filter(|h| h.len() >= 3) {
            s = s.difference(&ring_to_sketch(hole));
        }
        sketch = sketch.union(&s);
    }
    sketch
}

/// Read the polygons back out of a sketch.
pub fn from_sketch(sketch: &Sketch<()>) -> Vec<Polygon> {
    let mp = sketch.to_multipolygon();
    mp.0.iter()
        .map(|poly| {
            let exterior = poly
                .exterior()
                .0
                .iter()
                .map(|c| Point::new(c.x, c.y))
                .collect::<Vec<_>>();
            let interiors = poly
                .interiors()
                .iter()
                .map(|ring| {
                    open_ring(ring.0.iter().map(|c| Point::new(c.x, c.y)).collect())
                })
                .filter(|ring: &Vec<Point>| ring.len() >= 3)
                .collect();
            Polygon::with_interiors(exterior, interiors)
        })
        .filter(|p| p.exterior.len() >= 3)
        .collect()
}

fn polygonal_union(geoms: &[Geometry]) -> Vec<Polygon> {
    let polygons: Vec<Polygon> = geoms.iter().flat_map(Geometry::polygons).collect();
    from_sketch(&to_sketch(&polygons))
}

/// Union of all operands.
///
/// Polygons merge into polygons; linework is collected into one
/// multi-line. Mixing both kinds is rejected.
pub fn union(geoms: &[Geometry]) -> Result<Geometry, GeometryError> {
    if geoms.is_empty() {
        return Err(GeometryError::NoInput { operation: "union" });
    }
    let polygonal = geoms.iter().filter(|g| g.is_polygonal()).count();
    if polygonal == geoms.len() {
        Ok(Geometry::from_polygons(polygonal_union(geoms)))
    } else if polygonal == 0 {
        Ok(Geometry::from_lines(
            geoms.iter().flat_map(Geometry::paths).collect(),
        ))
    } else {
        Err(GeometryError::MixedGeometry { operation: "union" })
    }
}

/// Pairwise intersection of two operands
pub fn intersect_pair(a: &Geometry, b: &Geometry) -> Result<Geometry, GeometryError> {
    match (a.is_polygonal(), b.is_polygonal()) {
        (true, true) => {
            let sa = to_sketch(&a.polygons());
            let sb = to_sketch(&b.polygons());
            Ok(Geometry::from_polygons(from_sketch(&sa.intersection(&sb))))
        }
        (false, true) => Ok(Geometry::from_lines(clip::clip_lines(
            &a.paths(),
            &b.polygons(),
            true,
        ))),
        (true, false) => Ok(Geometry::from_lines(clip::clip_lines(
            &b.paths(),
            &a.polygons(),
            true,
        ))),
        (false, false) => Err(GeometryError::Unsupported),
    }
}

/// Intersection of all operands, folded left to right
pub fn intersection(geoms: &[Geometry]) -> Result<Geometry, GeometryError> {
    let (first, rest) = geoms.split_first().ok_or(GeometryError::NoInput {
        operation: "intersect",
    })?;
    rest.iter()
        .try_fold(first.clone(), |acc, g| intersect_pair(&acc, g))
}

/// `target` minus `tool`.
///
/// Lines are clipped to the outside of polygonal tools. Subtracting linework
/// from anything leaves the target unchanged.
pub fn difference(target: &Geometry, tool: &Geometry) -> Result<Geometry, GeometryError> {
    if !tool.is_polygonal() {
        return Ok(target.clone());
    }
    if target.is_polygonal() {
        let st = to_sketch(&target.polygons());
        let sc = to_sketch(&tool.polygons());
        Ok(Geometry::from_polygons(from_sketch(&st.difference(&sc))))
    } else {
        Ok(Geometry::from_lines(clip::clip_lines(
            &target.paths(),
            &tool.polygons(),
            false,
        )))
    }
}

/// Cut `target` with the union of `tools`.
///
/// A polygon target is decomposed into its rings first, so the cut removes
/// ring material and yields one result per ring. Empty results are dropped.
pub fn cut_path(target: &Geometry, tools: &[Geometry]) -> Result<Vec<Geometry>, GeometryError> {
    let cutter = Geometry::from_polygons(polygonal_union(tools));
    let pieces: Vec<Geometry> = match target {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => target
            .paths()
            .into_iter()
            .map(Geometry::LineString)
            .collect(),
        Geometry::LineString(_) | Geometry::LinearRing(_) => vec![target.clone()],
        Geometry::MultiLineString(lines) => {
            lines.iter().cloned().map(Geometry::LineString).collect()
        }
    };
    pieces
        .iter()
        .map(|piece| difference(piece, &cutter))
        .filter(|r| !matches!(r, Ok(g) if g.is_empty()))
        .collect()
}
