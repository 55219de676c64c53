//! Grid and nearest-feature snapping.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Anything that can report its vertex closest to a point
pub trait PointSource {
    fn nearest_point(&self, p: Point) -> Option<Point>;
}

/// Snapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    /// Grid spacing along X; 0 disables the axis
    pub grid_x: f64,
    /// Grid spacing along Y; ignored while `link_grid` is set
    pub grid_y: f64,
    pub link_grid: bool,
    /// Largest distance at which a shape vertex captures the cursor
    pub snap_max: f64,
    pub grid_snap: bool,
    /// Snap to the nearest shape vertex
    pub corner_snap: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            grid_x: 0.1,
            grid_y: 0.1,
            link_grid: true,
            snap_max: 0.05,
            grid_snap: true,
            corner_snap: false,
        }
    }
}

fn round_to(value: f64, spacing: f64) -> f64 {
    if spacing == 0.0 {
        value
    } else {
        (value / spacing).round() * spacing
    }
}

/// Resolves raw pointer coordinates to snapped coordinates
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    pub options: SnapOptions,
}

impl SnapEngine {
    pub fn new(options: SnapOptions) -> Self {
        Self { options }
    }

    /// Snap `(x, y)`.
    ///
    /// The nearest-feature candidate is computed first and only accepted
    /// within `snap_max`; the grid candidate then wins only if it is strictly
    /// closer to the raw input.
    pub fn snap(&self, x: f64, y: f64, source: &dyn PointSource) -> Point {
        let raw = Point::new(x, y);
        let mut snapped = raw;
        let mut snap_distance = f64::INFINITY;

        if self.options.corner_snap {
            if let Some(nearest) = source.nearest_point(raw) {
                let d = raw.distance_to(&nearest);
                if d <= self.options.snap_max {
                    snap_distance = d;
                    snapped = nearest;
                }
            }
        }

        if self.options.grid_snap {
            let gy = if self.options.link_grid {
                self.options.grid_x
            } else {
                self.options.grid_y
            };
            let grid = Point::new(round_to(x, self.options.grid_x), round_to(y, gy));
            if raw.distance_to(&grid) < snap_distance {
                snapped = grid;
            }
        }
        snapped
    }

    /// Flip grid snapping, returning the new state
    pub fn toggle_grid(&mut self) -> bool {
        self.options.grid_snap = !self.options.grid_snap;
        self.options.grid_snap
    }

    /// Flip nearest-feature snapping, returning the new state
    pub fn toggle_corner(&mut self) -> bool {
        self.options.corner_snap = !self.options.corner_snap;
        self.options.corner_snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;

    impl PointSource for Nothing {
        fn nearest_point(&self, _p: Point) -> Option<Point> {
            None
        }
    }

    #[test]
    fn test_no_snapping_returns_input() {
        let engine = SnapEngine::new(SnapOptions {
            grid_snap: false,
            ..SnapOptions::default()
        });
        assert_eq!(engine.snap(0.123, 4.56, &Nothing), Point::new(0.123, 4.56));
    }

    #[test]
    fn test_zero_spacing_axis_is_left_alone() {
        let engine = SnapEngine::new(SnapOptions {
            grid_x: 0.0,
            grid_y: 0.5,
            link_grid: false,
            ..SnapOptions::default()
        });
        assert_eq!(engine.snap(0.37, 0.74, &Nothing), Point::new(0.37, 0.5));
    }

    #[test]
    fn test_toggles() {
        let mut engine = SnapEngine::default();
        assert!(!engine.toggle_grid());
        assert!(engine.toggle_corner());
    }
}
