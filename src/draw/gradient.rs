//! Linear and radial gradient descriptions.

use super::color::Color;

/// One color stop; `offset` is expected in `[0, 1]` and stops in ascending order,
/// neither is enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, stops: Vec<ColorStop>) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops,
        }
    }

    /// `(x0, y0, x1, y1)`
    pub fn line(&self) -> (f64, f64, f64, f64) {
        (self.x0, self.y0, self.x1, self.y1)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    x0: f64,
    y0: f64,
    r0: f64,
    x1: f64,
    y1: f64,
    r1: f64,
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64, stops: Vec<ColorStop>) -> Self {
        Self {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
            stops,
        }
    }

    /// `(x0, y0, r0, x1, y1, r1)`
    pub fn circles(&self) -> (f64, f64, f64, f64, f64, f64) {
        (self.x0, self.y0, self.r0, self.x1, self.y1, self.r1)
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear(g) => g.stops(),
            Gradient::Radial(g) => g.stops(),
        }
    }

    /// Builds the Cairo gradient with every stop added in stored order.
    pub(crate) fn to_cairo(&self) -> cairo::Gradient {
        let gradient = match self {
            Gradient::Linear(g) => {
                let (x0, y0, x1, y1) = g.line();
                cairo::Gradient::clone(&cairo::LinearGradient::new(x0, y0, x1, y1))
            }
            Gradient::Radial(g) => {
                let (x0, y0, r0, x1, y1, r1) = g.circles();
                cairo::Gradient::clone(&cairo::RadialGradient::new(x0, y0, r0, x1, y1, r1))
            }
        };
        for stop in self.stops() {
            let c = stop.color;
            gradient.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a);
        }
        gradient
    }
}

impl From<LinearGradient> for Gradient {
    fn from(g: LinearGradient) -> Self {
        Gradient::Linear(g)
    }
}

impl From<RadialGradient> for Gradient {
    fn from(g: RadialGradient) -> Self {
        Gradient::Radial(g)
    }
}
