//! Device-independent geometry: transforms, arcs and recorded paths.
//!
//! - [`AffineTransform`]: 2×3 matrix with compose/decompose helpers
//! - [`arc`]: elliptical arc to cubic Bezier approximation
//! - [`PathModel`]: mutable, invertible record of path-construction calls
//! - [`PathSink`]: the backend seam a recorded path is replayed into

pub mod arc;
pub mod path;
pub mod sink;
pub mod transform;

pub use arc::{ArcApproximator, CubicSegment};
pub use path::{PathError, PathModel, PathOp, PathOpKind};
pub use sink::{PathCommand, PathRecorder, PathSink};
pub use transform::AffineTransform;

/// A point in logical coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Integer bounding box `[min_x, min_y, max_x, max_y]` (inclusive extrema).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    pub fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x as f64
            && x <= self.max_x as f64
            && y >= self.min_y as f64
            && y <= self.max_y as f64
    }

    /// Component-wise min of the mins and max of the maxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Running real-valued extrema of every point ever added to a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Extents {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extents {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn merge(&mut self, other: &Extents) {
        self.include(other.min_x, other.min_y);
        self.include(other.max_x, other.max_y);
    }

    /// Rounds each extremum to the nearest integer, halves rounding up.
    pub fn rounded(&self) -> BoundingBox {
        BoundingBox::new(
            round_half_up(self.min_x),
            round_half_up(self.min_y),
            round_half_up(self.max_x),
            round_half_up(self.max_y),
        )
    }
}

pub(crate) fn extend(extents: &mut Option<Extents>, x: f64, y: f64) {
    match extents {
        Some(current) => current.include(x, y),
        None => *extents = Some(Extents::at(x, y)),
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
