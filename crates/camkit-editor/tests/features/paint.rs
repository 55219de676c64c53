use camkit_editor::geometry::paint::{paint, PaintMethod, PaintParams};
use camkit_editor::{EditError, Geometry, Point, Polygon};

fn square(size: f64) -> Geometry {
    Geometry::Polygon(Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(size, 0.0),
        Point::new(size, size),
        Point::new(0.0, size),
    ]))
}

fn params(method: PaintMethod) -> PaintParams {
    PaintParams {
        tool_diameter: 0.1,
        overlap: 0.15,
        method,
        ..Default::default()
    }
}

#[test]
fn test_every_method_stays_inside_region() {
    for method in [PaintMethod::Standard, PaintMethod::Seed, PaintMethod::Lines] {
        let painted = paint(&square(2.0), &params(method), 64).unwrap();
        assert!(!painted.is_empty(), "{} produced nothing", method);
        for geometry in &painted {
            for p in geometry.points() {
                assert!(
                    (-1e-6..=2.0 + 1e-6).contains(&p.x) && (-1e-6..=2.0 + 1e-6).contains(&p.y),
                    "{} left the region at {:?}",
                    method,
                    p
                );
            }
        }
    }
}

#[test]
fn test_margin_larger_than_region_paints_nothing() {
    let p = PaintParams {
        margin: 1.5,
        ..params(PaintMethod::Standard)
    };
    assert!(paint(&square(2.0), &p, 64).unwrap().is_empty());
}

#[test]
fn test_overlap_must_exceed_tool_diameter() {
    let p = PaintParams {
        tool_diameter: 0.5,
        overlap: 0.15,
        ..Default::default()
    };
    assert_eq!(p.validate(), Err(EditError::OverlapNotAboveToolDiameter));
    assert!(params(PaintMethod::Lines).validate().is_ok());
}
