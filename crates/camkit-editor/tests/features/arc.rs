use camkit_editor::geometry::arc::{construct, ArcDirection, ArcMode};
use camkit_editor::Point;

#[test]
fn test_through_point_arc() {
    let arc = construct(
        ArcMode::ThroughPoint,
        [Point::new(1.0, 0.0), Point::new(-1.0, 0.0), Point::new(0.0, 1.0)],
        ArcDirection::Cw,
    )
    .unwrap();
    assert!(arc.center.distance_to(&Point::new(0.0, 0.0)) < 1e-9);
    assert!((arc.radius - 1.0).abs() < 1e-9);
    for p in arc.points(64) {
        assert!(p.y >= -1e-9);
        assert!((p.distance_to(&arc.center) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_center_start_end_follows_direction() {
    let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)];
    let ccw = construct(ArcMode::CenterStartEnd, points, ArcDirection::Ccw).unwrap();
    let cw = construct(ArcMode::CenterStartEnd, points, ArcDirection::Cw).unwrap();
    // a quarter turn one way, three quarters the other
    assert!(ccw.points(64).len() < cw.points(64).len());
    assert!(ccw.points(64).iter().all(|p| p.x >= -1e-9 && p.y >= -1e-9));
}

#[test]
fn test_collinear_through_point_has_no_arc() {
    let arc = construct(
        ArcMode::ThroughPoint,
        [Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 0.0)],
        ArcDirection::Cw,
    );
    assert!(arc.is_none());
}

#[test]
fn test_mode_cycle() {
    let mode = ArcMode::default();
    assert_eq!(mode.to_string(), "c12");
    assert_eq!(mode.next().next().to_string(), "132");
    assert_eq!(mode.next().next().next(), mode);
}
