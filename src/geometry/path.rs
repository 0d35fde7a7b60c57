//! Recorded, mutable path geometry.
//!
//! A [`PathModel`] stores an optional open sub-path plus any number of closed
//! sub-paths as explicit [`PathOp`] values. It can be reversed, concatenated,
//! transformed point-wise and replayed into any [`PathSink`].

use super::arc::{self, ArcApproximator};
use super::sink::PathSink;
use super::{BoundingBox, Extents, Point, extend};
use std::f64::consts::TAU;
use std::fmt;
use thiserror::Error;

/// Kappa constant for quarter-circle corners.
const KAPPA: f64 = 0.5522848;

/// Contract errors raised while building a path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("no open path for {operation}")]
    NoOpenPath { operation: &'static str },

    #[error("invalid corner radius {radius} (allowed: -0.5 to {limit})")]
    InvalidRadius { radius: f64, limit: f64 },

    #[error("arc angles out of order: eta1 {eta1} < eta2 {eta2}")]
    ArcOrder { eta1: f64, eta2: f64 },
}

/// Kind-specific payload of a path operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOpKind {
    MoveTo,
    LineTo,
    CurveTo {
        c1: Point,
        c2: Point,
    },
    /// Elliptical arc inscribed in `(x, y, width, height)`, expanded at replay time.
    Arc {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        eta1: f64,
        eta2: f64,
    },
    Close,
}

/// One recorded operation: its payload, the previous endpoint and its own endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathOp {
    pub kind: PathOpKind,
    pub from: Point,
    pub to: Point,
}

impl PathOp {
    fn replay<S: PathSink + ?Sized>(&self, sink: &mut S) {
        match self.kind {
            PathOpKind::MoveTo => sink.move_to(self.to.x, self.to.y),
            PathOpKind::LineTo => sink.line_to(self.to.x, self.to.y),
            PathOpKind::CurveTo { c1, c2 } => {
                sink.curve_to(c1.x, c1.y, c2.x, c2.y, self.to.x, self.to.y)
            }
            PathOpKind::Arc {
                x,
                y,
                width,
                height,
                eta1,
                eta2,
            } => sink.ellipse(x, y, width, height, eta1, eta2),
            PathOpKind::Close => sink.close_path(),
        }
    }

    fn map<F: Fn(Point) -> Point>(&self, f: &F) -> PathOp {
        let kind = match self.kind {
            PathOpKind::CurveTo { c1, c2 } => PathOpKind::CurveTo {
                c1: f(c1),
                c2: f(c2),
            },
            PathOpKind::Arc {
                x,
                y,
                width,
                height,
                eta1,
                eta2,
            } => {
                let corner = f(Point::new(x, y));
                let far = f(Point::new(x + width, y + height));
                PathOpKind::Arc {
                    x: corner.x,
                    y: corner.y,
                    width: far.x - corner.x,
                    height: far.y - corner.y,
                    eta1,
                    eta2,
                }
            }
            other => other,
        };
        PathOp {
            kind,
            from: f(self.from),
            to: f(self.to),
        }
    }
}

/// A device-independent path: one optional open sub-path plus closed sub-paths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathModel {
    open: Option<Vec<PathOp>>,
    closed: Vec<Vec<PathOp>>,
    extents: Option<Extents>,
}

impl PathModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when an open sub-path exists and is non-empty.
    pub fn is_open(&self) -> bool {
        self.open.as_ref().is_some_and(|ops| !ops.is_empty())
    }

    pub fn open_subpath(&self) -> Option<&[PathOp]> {
        self.open.as_deref()
    }

    pub fn closed_subpaths(&self) -> &[Vec<PathOp>] {
        &self.closed
    }

    /// Drops every sub-path and forgets the tracked extents.
    pub fn reset(&mut self) {
        self.open = None;
        self.closed.clear();
        self.extents = None;
    }

    /// Tracked extrema rounded to integers, or `None` before any point is added.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.extents.map(|e| e.rounded())
    }

    pub(crate) fn extents(&self) -> Option<Extents> {
        self.extents
    }

    fn last_point(&self, operation: &'static str) -> Result<Point, PathError> {
        self.open
            .as_ref()
            .and_then(|ops| ops.last())
            .map(|op| op.to)
            .ok_or(PathError::NoOpenPath { operation })
    }

    fn push(&mut self, op: PathOp) {
        if let Some(ops) = self.open.as_mut() {
            ops.push(op);
        }
    }

    // ---------------------------------------------------------------------
    // Primitives
    // ---------------------------------------------------------------------

    /// Closes the open sub-path and moves it into the closed list.
    pub fn close(&mut self) -> Result<(), PathError> {
        let last = self.last_point("close")?;
        self.push(PathOp {
            kind: PathOpKind::Close,
            from: last,
            to: last,
        });
        if let Some(ops) = self.open.take() {
            self.closed.push(ops);
        }
        Ok(())
    }

    /// Starts a new sub-path at `(x, y)`, closing any open one first.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.is_open() {
            // Cannot fail: an open sub-path exists.
            let _ = self.close();
        }
        let p = Point::new(x, y);
        self.open = Some(vec![PathOp {
            kind: PathOpKind::MoveTo,
            from: p,
            to: p,
        }]);
        extend(&mut self.extents, x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<(), PathError> {
        let from = self.last_point("line_to")?;
        self.push(PathOp {
            kind: PathOpKind::LineTo,
            from,
            to: Point::new(x, y),
        });
        extend(&mut self.extents, x, y);
        Ok(())
    }

    /// Appends a cubic Bezier; both control points count toward the bounding box.
    #[allow(clippy::too_many_arguments)]
    pub fn curve_to(
        &mut self,
        cx1: f64,
        cy1: f64,
        cx2: f64,
        cy2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<(), PathError> {
        let from = self.last_point("curve_to")?;
        self.push(PathOp {
            kind: PathOpKind::CurveTo {
                c1: Point::new(cx1, cy1),
                c2: Point::new(cx2, cy2),
            },
            from,
            to: Point::new(x3, y3),
        });
        extend(&mut self.extents, cx1, cy1);
        extend(&mut self.extents, cx2, cy2);
        extend(&mut self.extents, x3, y3);
        Ok(())
    }

    /// Appends an elliptical arc as a single operation.
    ///
    /// The bounding box grows by the whole ellipse rectangle, not the arc's true extent.
    pub fn arc_to(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        eta1: f64,
        eta2: f64,
    ) -> Result<(), PathError> {
        let from = self.last_point("arc_to")?;
        let (_, end) = arc::arc_endpoints(x, y, width, height, eta1, eta2);
        self.push(PathOp {
            kind: PathOpKind::Arc {
                x,
                y,
                width,
                height,
                eta1,
                eta2,
            },
            from,
            to: end,
        });
        extend(&mut self.extents, x, y);
        extend(&mut self.extents, x + width, y + height);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Composite constructors
    // ---------------------------------------------------------------------

    /// Line to every point, each shifted by `(dx, dy)`.
    pub fn lines(&mut self, points: &[Point], dx: f64, dy: f64) -> Result<(), PathError> {
        self.last_point("lines")?;
        for p in points {
            self.line_to(p.x + dx, p.y + dy)?;
        }
        Ok(())
    }

    /// New sub-path beginning at the arc's start point.
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        eta1: f64,
        eta2: f64,
    ) -> Result<(), PathError> {
        if self.is_open() {
            self.close()?;
        }
        let (start, _) = arc::arc_endpoints(x, y, width, height, eta1, eta2);
        self.move_to(start.x, start.y);
        self.arc_to(x, y, width, height, eta1, eta2)
    }

    pub fn ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), PathError> {
        self.arc(x, y, width, height, 0.0, TAU)
    }

    /// Closed five-point polygon; the explicit return to the start precedes `close`.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), PathError> {
        self.move_to(x, y);
        self.line_to(x + width, y)?;
        self.line_to(x + width, y + height)?;
        self.line_to(x, y + height)?;
        self.line_to(x, y)?;
        self.close()
    }

    /// Rectangle with quarter-ellipse corners.
    ///
    /// A negative `radius` is a fraction of the shorter side. Fails when the radius is
    /// NaN, below `-0.5` or above half the shorter side.
    pub fn rounded_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Result<(), PathError> {
        let shortest = width.min(height);
        let limit = 0.5 * shortest;
        if radius.is_nan() || radius > limit || radius < -0.5 {
            return Err(PathError::InvalidRadius { radius, limit });
        }
        let r = if radius < 0.0 {
            shortest * radius.abs()
        } else {
            radius
        };
        let co = KAPPA * r;

        self.move_to(x + r, y);
        self.line_to(x + width - r, y)?;
        self.curve_to(x + width - co, y, x + width, y + co, x + width, y + r)?;
        self.line_to(x + width, y + height - r)?;
        self.curve_to(
            x + width,
            y + height - co,
            x + width - co,
            y + height,
            x + width - r,
            y + height,
        )?;
        self.line_to(x + r, y + height)?;
        self.curve_to(x + co, y + height, x, y + height - co, x, y + height - r)?;
        self.line_to(x, y + r)?;
        self.curve_to(x, y + co, x + co, y, x + r, y)?;
        self.close()
    }

    // ---------------------------------------------------------------------
    // Structural operations
    // ---------------------------------------------------------------------

    /// Concatenates `other` onto this path.
    ///
    /// Closed sub-paths are appended in order. When both paths are open, the end of
    /// this open sub-path is bridged to the start of `other`'s with a line and
    /// `other`'s leading move is dropped. Without an open sub-path here, `other`'s
    /// open sub-path is adopted.
    pub fn append(&mut self, other: &PathModel) {
        self.closed.extend(other.closed.iter().cloned());

        match (self.is_open(), other.open.as_ref()) {
            (true, Some(theirs)) if !theirs.is_empty() => {
                let start = theirs[0].from;
                // Cannot fail: this path is open.
                let _ = self.line_to(start.x, start.y);
                if let Some(ours) = self.open.as_mut() {
                    ours.extend(theirs.iter().skip(1).copied());
                }
            }
            (false, _) => self.open = other.open.clone(),
            _ => {}
        }

        match (self.extents.as_mut(), other.extents.as_ref()) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.extents = Some(*theirs),
            _ => {}
        }
    }

    /// Rebuilds the path in reverse drawing order.
    ///
    /// Closed sub-paths are reversed individually and in reverse order; the open
    /// sub-path restarts from its former end point. Arcs are expanded into their
    /// Bezier chain so the reversed path traces the same curve backwards.
    pub fn reverse(&mut self) {
        let old_closed = std::mem::take(&mut self.closed);
        let old_open = self.open.take();
        self.reset();

        for sub in old_closed.iter().rev() {
            self.reverse_ops(sub);
        }

        if let Some(open) = old_open {
            if let Some(last) = open.last() {
                self.move_to(last.to.x, last.to.y);
                self.reverse_ops(&open[1..]);
            }
        }
    }

    fn reverse_ops(&mut self, ops: &[PathOp]) {
        // Every arm runs only while a sub-path is open, except Close which starts one.
        for op in ops.iter().rev() {
            let _ = match op.kind {
                PathOpKind::Close => {
                    self.move_to(op.from.x, op.from.y);
                    Ok(())
                }
                PathOpKind::CurveTo { c1, c2 } => {
                    self.curve_to(c2.x, c2.y, c1.x, c1.y, op.from.x, op.from.y)
                }
                PathOpKind::LineTo => self.line_to(op.from.x, op.from.y),
                PathOpKind::MoveTo => self.close(),
                PathOpKind::Arc {
                    x,
                    y,
                    width,
                    height,
                    eta1,
                    eta2,
                } => {
                    let segments = ArcApproximator::default()
                        .ellipse_segments(x, y, width, height, eta1, eta2);
                    segments.iter().rev().try_for_each(|seg| {
                        self.curve_to(
                            seg.c2.x,
                            seg.c2.y,
                            seg.c1.x,
                            seg.c1.y,
                            seg.start.x,
                            seg.start.y,
                        )
                    })
                }
            };
        }
    }

    /// Rewrites every coordinate of every operation through `f`, in place.
    ///
    /// The tracked extents are left as they were.
    pub fn map_points<F: Fn(Point) -> Point>(&mut self, f: F) {
        for sub in &mut self.closed {
            for op in sub.iter_mut() {
                *op = op.map(&f);
            }
        }
        if let Some(open) = self.open.as_mut() {
            for op in open.iter_mut() {
                *op = op.map(&f);
            }
        }
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.map_points(|p| Point::new(p.x * sx, p.y * sy));
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.map_points(|p| Point::new(p.x + dx, p.y + dy));
    }

    /// Rotates every point counter-clockwise around the origin, flooring the result.
    pub fn rotate(&mut self, radians: f64) {
        let (s, c) = radians.sin_cos();
        self.map_points(|p| Point::new((p.x * c + p.y * s).floor(), (p.y * c - p.x * s).floor()));
    }

    /// Replays closed sub-paths in order, then the open one.
    pub fn make_canvas_path<S: PathSink + ?Sized>(&self, sink: &mut S) {
        for op in self.closed.iter().flatten() {
            op.replay(sink);
        }
        for op in self.open.iter().flatten() {
            op.replay(sink);
        }
    }
}

impl fmt::Display for PathModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in self.closed.iter().flatten().chain(self.open.iter().flatten()) {
            let (x, y) = (op.to.x.round(), op.to.y.round());
            match op.kind {
                PathOpKind::MoveTo => writeln!(f, "move_to({x},{y})")?,
                PathOpKind::LineTo => writeln!(f, "line_to({x},{y})")?,
                PathOpKind::CurveTo { c1, c2 } => writeln!(
                    f,
                    "curve_to({},{},{},{},{x},{y})",
                    c1.x.round(),
                    c1.y.round(),
                    c2.x.round(),
                    c2.y.round()
                )?,
                PathOpKind::Arc {
                    x: ax,
                    y: ay,
                    width,
                    height,
                    eta1,
                    eta2,
                } => writeln!(
                    f,
                    "ellipse({},{},{},{},{eta1:.4},{eta2:.4})",
                    ax.round(),
                    ay.round(),
                    width.round(),
                    height.round()
                )?,
                PathOpKind::Close => writeln!(f, "close_path()")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
