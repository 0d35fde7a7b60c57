//! Elliptical arc to cubic Bezier approximation.
//!
//! Arcs are recursively bisected until every piece is within a fixed error bound,
//! using the closed-form error estimate for cubic approximations of elliptical arcs
//! (rational fit over the axis ratio, exponential over the angular span).

use super::path::PathError;
use super::sink::PathSink;
use super::Point;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Maximum allowed approximation error, in user-space units.
pub const ARC_TOLERANCE: f64 = 0.5;

/// Bisection depth cap; spans below 2π / 2^16 are always within tolerance in practice.
const MAX_DEPTH: u32 = 16;

// Error-estimate coefficients, axis ratio below 1/4.
const COEFFS_LOW: [[[f64; 4]; 4]; 2] = [
    [
        [3.85268, -21.229, -0.330434, 0.0127842],
        [-1.61486, 0.706564, 0.225945, 0.263682],
        [-0.910164, 0.388383, 0.00551445, 0.00671814],
        [-0.630184, 0.192402, 0.0098871, 0.0102527],
    ],
    [
        [-0.162211, 9.94329, 0.13723, 0.0124084],
        [-0.253135, 0.00187735, 0.0230286, 0.01264],
        [-0.0695069, -0.0437594, 0.0120636, 0.0163087],
        [-0.0328856, -0.00926032, -0.00173573, 0.00527385],
    ],
];

// Error-estimate coefficients, axis ratio from 1/4 to 1.
const COEFFS_HIGH: [[[f64; 4]; 4]; 2] = [
    [
        [0.0899116, -19.2349, -4.11711, 0.183362],
        [0.138148, -1.45804, 1.32044, 1.38474],
        [0.230903, -0.450262, 0.219963, 0.414038],
        [0.0590565, -0.101062, 0.0430592, 0.0204699],
    ],
    [
        [0.0164649, 9.89394, 0.0919496, 0.00760802],
        [0.0191603, -0.0322058, 0.0134667, -0.0825018],
        [0.0156192, -0.017535, 0.00326508, -0.228157],
        [-0.0236752, 0.0405821, -0.0173086, 0.176187],
    ],
];

const SAFETY: [f64; 4] = [0.001, 4.98, 0.207, 0.0067];

/// One cubic Bezier piece of an approximated arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

/// Converts elliptical arcs into chains of cubic Bezier segments.
#[derive(Clone, Copy, Debug)]
pub struct ArcApproximator {
    tolerance: f64,
}

impl Default for ArcApproximator {
    fn default() -> Self {
        Self {
            tolerance: ARC_TOLERANCE,
        }
    }
}

/// Geometry of the ellipse an arc lies on.
#[derive(Clone, Copy, Debug)]
struct Ellipse {
    cx: f64,
    cy: f64,
    a: f64,
    b: f64,
}

impl Ellipse {
    fn inscribed(x: f64, y: f64, width: f64, height: f64) -> Self {
        let a = width / 2.0;
        let b = height / 2.0;
        Self {
            cx: x + a,
            cy: y + b,
            a,
            b,
        }
    }

    fn point_at(&self, eta: f64) -> Point {
        Point::new(self.cx + self.a * eta.cos(), self.cy + self.b * eta.sin())
    }
}

/// Normalizes a caller angle pair into the internal decreasing sweep `(eta1, eta2)`.
///
/// The end angle is flipped (`2π − eta2`) so increasing on-screen sweep matches
/// decreasing raw angle; both are reduced into `[0, 2π)` and `eta1` is lifted by
/// `2π` when it does not exceed `eta2`. Equal angles therefore describe a full sweep.
pub fn normalize_angles(eta1: f64, eta2: f64) -> (f64, f64) {
    let mut start = eta1.rem_euclid(TAU);
    let end = (TAU - eta2).rem_euclid(TAU);
    if start <= end {
        start += TAU;
    }
    (start, end)
}

/// Start and end points of the arc the approximator draws for a caller angle pair.
pub fn arc_endpoints(x: f64, y: f64, width: f64, height: f64, eta1: f64, eta2: f64) -> (Point, Point) {
    let ellipse = Ellipse::inscribed(x, y, width, height);
    let (start, end) = normalize_angles(eta1, eta2);
    (ellipse.point_at(start), ellipse.point_at(end))
}

/// Estimated error of one cubic Bezier approximating the arc between `eta1` and `eta2`
/// on an ellipse with semi-axes `a` (horizontal) and `b` (vertical).
pub fn bezier_error(a: f64, b: f64, eta1: f64, eta2: f64) -> f64 {
    let (a, b) = (a.abs(), b.abs());
    // The fit is expressed against the major axis; a tall ellipse shifts both angles by π/2.
    let (major, minor, shift) = if a >= b { (a, b, 0.0) } else { (b, a, PI) };
    let ratio = minor / major;
    let span = (eta1 - eta2).abs();
    let eta_sum = eta1 + eta2 + shift;
    let coeffs = if ratio < 0.25 { &COEFFS_LOW } else { &COEFFS_HIGH };

    let c_term = |row: &[[f64; 4]; 4]| -> f64 {
        row.iter()
            .enumerate()
            .map(|(j, c)| (j as f64 * eta_sum).cos() * rational(ratio, c))
            .sum()
    };

    rational(ratio, &SAFETY) * major * (c_term(&coeffs[0]) + c_term(&coeffs[1]) * span).exp()
}

fn rational(x: f64, c: &[f64; 4]) -> f64 {
    (x * (x * c[0] + c[1]) + c[2]) / (x + c[3])
}

impl ArcApproximator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Emits the arc inscribed in `(x, y, width, height)` into `sink`.
    ///
    /// The first segment issues a `move_to` to its start point; every later segment
    /// chains with `curve_to` only.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse<S: PathSink + ?Sized>(
        &self,
        sink: &mut S,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        eta1: f64,
        eta2: f64,
    ) {
        let segments = self.ellipse_segments(x, y, width, height, eta1, eta2);
        if let Some(first) = segments.first() {
            sink.move_to(first.start.x, first.start.y);
        }
        for seg in &segments {
            sink.curve_to(seg.c1.x, seg.c1.y, seg.c2.x, seg.c2.y, seg.end.x, seg.end.y);
        }
    }

    /// Bezier segments for a caller angle pair, after angle normalization.
    ///
    /// A zero-width or zero-height ellipse yields no segments.
    pub fn ellipse_segments(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        eta1: f64,
        eta2: f64,
    ) -> Vec<CubicSegment> {
        let ellipse = Ellipse::inscribed(x, y, width, height);
        if ellipse.a == 0.0 || ellipse.b == 0.0 {
            return Vec::new();
        }
        let (start, end) = normalize_angles(eta1, eta2);
        let mut out = Vec::new();
        self.subdivide(&ellipse, start, end, 0, &mut out);
        out
    }

    /// Approximates the arc from `eta1` down to `eta2` on the ellipse centred at
    /// `(cx, cy)` with semi-axes `a`, `b`.
    ///
    /// # Errors
    /// Returns [`PathError::ArcOrder`] when `eta1 < eta2`; no correction is attempted.
    pub fn approximate_arc(
        &self,
        cx: f64,
        cy: f64,
        a: f64,
        b: f64,
        eta1: f64,
        eta2: f64,
    ) -> Result<Vec<CubicSegment>, PathError> {
        if eta1 < eta2 {
            return Err(PathError::ArcOrder { eta1, eta2 });
        }
        let mut out = Vec::new();
        self.subdivide(&Ellipse { cx, cy, a, b }, eta1, eta2, 0, &mut out);
        Ok(out)
    }

    fn subdivide(&self, e: &Ellipse, eta1: f64, eta2: f64, depth: u32, out: &mut Vec<CubicSegment>) {
        let span = eta1 - eta2;
        let split = span > FRAC_PI_2
            || (depth < MAX_DEPTH && bezier_error(e.a, e.b, eta1, eta2) >= self.tolerance);
        if split {
            let mid = (eta1 + eta2) / 2.0;
            self.subdivide(e, eta1, mid, depth + 1, out);
            self.subdivide(e, mid, eta2, depth + 1, out);
            return;
        }

        let k = (span / 2.0).tan();
        let alpha = span.sin() * ((4.0 + 3.0 * k * k).sqrt() - 1.0) / 3.0;

        let start = e.point_at(eta1);
        let end = e.point_at(eta2);
        // Sweep runs towards decreasing angle, so tangents are negated derivatives.
        let c1 = Point::new(
            start.x + e.a * eta1.sin() * alpha,
            start.y - e.b * eta1.cos() * alpha,
        );
        let c2 = Point::new(
            end.x - e.a * eta2.sin() * alpha,
            end.y + e.b * eta2.cos() * alpha,
        );
        out.push(CubicSegment { start, c1, c2, end });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::sink::{PathCommand, PathRecorder};

    fn on_ellipse(p: Point, cx: f64, cy: f64, a: f64, b: f64) -> f64 {
        // Radial distance from the ellipse along the centre ray.
        let dx = p.x - cx;
        let dy = p.y - cy;
        let theta = dy.atan2(dx);
        let r = (a * b) / ((b * theta.cos()).powi(2) + (a * theta.sin()).powi(2)).sqrt();
        ((dx * dx + dy * dy).sqrt() - r).abs()
    }

    #[test]
    fn full_circle_produces_continuous_chain_of_at_least_four_segments() {
        let approx = ArcApproximator::default();
        let segments = approx.ellipse_segments(0.0, 0.0, 200.0, 200.0, 0.0, TAU);
        assert!(segments.len() >= 4, "got {} segments", segments.len());

        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for seg in &segments {
            assert!(on_ellipse(seg.start, 100.0, 100.0, 100.0, 100.0) <= ARC_TOLERANCE);
            assert!(on_ellipse(seg.end, 100.0, 100.0, 100.0, 100.0) <= ARC_TOLERANCE);
        }
        let first = segments.first().unwrap();
        let last = segments.last().unwrap();
        assert!((first.start.x - last.end.x).abs() < 1e-9);
        assert!((first.start.y - last.end.y).abs() < 1e-9);
    }

    #[test]
    fn midpoints_of_segments_stay_within_tolerance() {
        let approx = ArcApproximator::default();
        let segments = approx.ellipse_segments(10.0, 20.0, 300.0, 120.0, 0.0, TAU);
        for seg in &segments {
            // Cubic Bezier at t = 0.5.
            let mid = Point::new(
                0.125 * seg.start.x + 0.375 * seg.c1.x + 0.375 * seg.c2.x + 0.125 * seg.end.x,
                0.125 * seg.start.y + 0.375 * seg.c1.y + 0.375 * seg.c2.y + 0.125 * seg.end.y,
            );
            assert!(on_ellipse(mid, 160.0, 80.0, 150.0, 60.0) <= ARC_TOLERANCE);
        }
    }

    #[test]
    fn emission_moves_once_then_chains_curves() {
        let mut recorder = PathRecorder::new();
        ArcApproximator::default().ellipse(&mut recorder, 0.0, 0.0, 50.0, 50.0, 0.0, TAU);
        let moves = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(..)))
            .count();
        assert_eq!(moves, 1);
        assert!(matches!(recorder.commands[0], PathCommand::MoveTo(..)));
        assert!(recorder.commands[1..]
            .iter()
            .all(|c| matches!(c, PathCommand::CurveTo(..))));
    }

    #[test]
    fn reversed_angles_are_a_contract_violation() {
        let err = ArcApproximator::default()
            .approximate_arc(0.0, 0.0, 10.0, 10.0, 0.5, 1.0)
            .unwrap_err();
        assert!(matches!(err, PathError::ArcOrder { .. }));
    }

    #[test]
    fn degenerate_ellipse_is_a_no_op() {
        let mut recorder = PathRecorder::new();
        ArcApproximator::default().ellipse(&mut recorder, 5.0, 5.0, 0.0, 40.0, 0.0, PI);
        assert!(recorder.commands.is_empty());
    }

    #[test]
    fn normalization_flips_end_angle_and_orders_pair() {
        let (start, end) = normalize_angles(0.0, FRAC_PI_2);
        assert!((end - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((start - TAU).abs() < 1e-12);
        assert!(start >= end);

        let (start, end) = normalize_angles(-FRAC_PI_2, 0.0);
        assert!((start - 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert_eq!(end, 0.0);
    }

    #[test]
    fn endpoints_match_emitted_chain() {
        let (start, end) = arc_endpoints(0.0, 0.0, 80.0, 40.0, 0.3, 1.2);
        let segments = ArcApproximator::default().ellipse_segments(0.0, 0.0, 80.0, 40.0, 0.3, 1.2);
        assert_eq!(segments.first().unwrap().start, start);
        assert_eq!(segments.last().unwrap().end, end);
    }

    #[test]
    fn error_grows_with_span_and_radius() {
        let small = bezier_error(10.0, 10.0, 0.5, 0.0);
        let wide = bezier_error(10.0, 10.0, 1.5, 0.0);
        let large = bezier_error(1000.0, 1000.0, 0.5, 0.0);
        assert!(small < wide);
        assert!(small < large);
    }
}
