//! 2×3 affine transformation matrix.

use super::Point;

/// Affine transform `(a, b, c, d, e, f)` mapping
/// `x' = a·x + c·y + e` and `y' = b·x + d·y + f`.
///
/// Coefficients are laid out exactly like Cairo's `Matrix::new(xx, yx, xy, yy, x0, y0)`,
/// so conversion to the backend is a straight copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn from_array(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Resets to the identity matrix.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Right-multiplies the current matrix by `other`.
    ///
    /// Points are mapped through `other` first, then through the previous matrix.
    pub fn multiply(&mut self, other: &AffineTransform) {
        let a = self.a * other.a + self.c * other.b;
        let b = self.b * other.a + self.d * other.b;
        let c = self.a * other.c + self.c * other.d;
        let d = self.b * other.c + self.d * other.d;
        let e = self.a * other.e + self.c * other.f + self.e;
        let f = self.b * other.e + self.d * other.f + self.f;
        *self = Self::new(a, b, c, d, e, f);
    }

    /// Composes with a rotation of `radians`.
    pub fn rotate(&mut self, radians: f64) {
        let (s, c) = radians.sin_cos();
        let a = self.a * c + self.c * s;
        let b = self.b * c + self.d * s;
        let cc = self.a * -s + self.c * c;
        let d = self.b * -s + self.d * c;
        self.a = a;
        self.b = b;
        self.c = cc;
        self.d = d;
    }

    /// Composes with a translation expressed in the current basis.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.e += self.a * x + self.c * y;
        self.f += self.b * x + self.d * y;
    }

    /// Composes with a scale of `sx` along x and `sy` along y.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.a *= sx;
        self.b *= sx;
        self.c *= sy;
        self.d *= sy;
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    pub fn apply(&self, point: Point) -> Point {
        let (x, y) = self.transform_point(point.x, point.y);
        Point::new(x, y)
    }

    /// Estimated `(x, y)` scale: the length of each basis column, rounded to 4 decimals.
    ///
    /// This is a derived estimate and does not recover the original `scale` calls
    /// once rotation and non-uniform scaling have been mixed.
    pub fn get_scale(&self) -> (f64, f64) {
        (
            round4(self.a.hypot(self.b)),
            round4(self.c.hypot(self.d)),
        )
    }

    /// Estimated rotation `atan2(c, d)`, rounded to 4 decimals.
    pub fn get_rotation(&self) -> f64 {
        round4(self.c.atan2(self.d))
    }

    /// Translation component `(e, f)`, rounded to 4 decimals.
    pub fn get_origin(&self) -> (f64, f64) {
        (round4(self.e), round4(self.f))
    }

    pub fn to_cairo(&self) -> cairo::Matrix {
        cairo::Matrix::new(self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

impl std::fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{},{},{},{},{}]",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn identity_leaves_points_alone() {
        let t = AffineTransform::identity();
        assert_eq!(t.transform_point(3.5, -2.0), (3.5, -2.0));
    }

    #[test]
    fn translate_is_applied_in_current_basis() {
        let mut t = AffineTransform::identity();
        t.scale(2.0, 3.0);
        t.translate(5.0, 5.0);
        assert_eq!(t.get_origin(), (10.0, 15.0));
        assert_close(t.transform_point(1.0, 1.0), (12.0, 18.0));
    }

    #[test]
    fn rotate_quarter_turn_maps_x_axis_onto_y_axis() {
        let mut t = AffineTransform::identity();
        t.rotate(FRAC_PI_2);
        assert_close(t.transform_point(1.0, 0.0), (0.0, 1.0));
    }

    #[test]
    fn multiply_applies_argument_first() {
        let mut t = AffineTransform::new(1.0, 0.0, 0.0, 1.0, 10.0, 0.0);
        t.multiply(&AffineTransform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        assert_close(t.transform_point(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn derived_scale_and_rotation_are_rounded() {
        let mut t = AffineTransform::identity();
        t.scale(2.0, 3.0);
        assert_eq!(t.get_scale(), (2.0, 3.0));
        assert_eq!(t.get_rotation(), 0.0);

        let mut r = AffineTransform::identity();
        r.rotate(PI / 3.0);
        assert_eq!(r.get_scale(), (1.0, 1.0));
        assert_eq!(r.get_rotation(), round4(-(PI / 3.0)));
    }

    #[test]
    fn reset_restores_identity() {
        let mut t = AffineTransform::new(3.0, 1.0, 4.0, 1.0, 5.0, 9.0);
        t.reset();
        assert_eq!(t, AffineTransform::identity());
    }
}
