//! Affine transforms for 2D geometry, backed by a homogeneous `Matrix3`.

use nalgebra::{Matrix3, Vector3};

use super::Point;

/// 2D affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(Matrix3<f64>);

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self(Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0))
    }

    /// Counter-clockwise rotation by `degrees` about `origin`
    pub fn rotation(degrees: f64, origin: Point) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let r = Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
        Self::about(r, origin)
    }

    /// Scale by `sx`, `sy` about `origin`
    pub fn scale(sx: f64, sy: f64, origin: Point) -> Self {
        let s = Matrix3::new(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0);
        Self::about(s, origin)
    }

    fn about(m: Matrix3<f64>, origin: Point) -> Self {
        let to = Self::translation(origin.x, origin.y).0;
        let from = Self::translation(-origin.x, -origin.y).0;
        Self(to * m * from)
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine(next.0 * self.0)
    }

    pub fn apply(&self, p: Point) -> Point {
        let v = self.0 * Vector3::new(p.x, p.y, 1.0);
        Point::new(v.x, v.y)
    }
}
