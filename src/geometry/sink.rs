//! Backend seam for replaying recorded paths.

use super::arc::ArcApproximator;

/// Receiver of path-building primitives.
///
/// A [`PathModel`](super::PathModel) replays itself into any sink. The `ellipse`
/// primitive has a default body that expands the arc into cubic Beziers, so a
/// backend only needs the four basic primitives.
pub trait PathSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x3: f64, y3: f64);
    fn close_path(&mut self);

    /// Elliptical arc inscribed in `(x, y, width, height)` between `eta1` and `eta2`.
    fn ellipse(&mut self, x: f64, y: f64, width: f64, height: f64, eta1: f64, eta2: f64) {
        ArcApproximator::default().ellipse(self, x, y, width, height, eta1, eta2);
    }
}

impl PathSink for cairo::Context {
    fn move_to(&mut self, x: f64, y: f64) {
        cairo::Context::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        cairo::Context::line_to(self, x, y);
    }

    fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x3: f64, y3: f64) {
        cairo::Context::curve_to(self, cx1, cy1, cx2, cy2, x3, y3);
    }

    fn close_path(&mut self) {
        cairo::Context::close_path(self);
    }
}

/// A primitive call observed by a [`PathRecorder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
}

/// In-memory sink that records every primitive it receives.
#[derive(Debug, Default, Clone)]
pub struct PathRecorder {
    pub commands: Vec<PathCommand>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathSink for PathRecorder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x3: f64, y3: f64) {
        self.commands
            .push(PathCommand::CurveTo(cx1, cy1, cx2, cy2, x3, y3));
    }

    fn close_path(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}
