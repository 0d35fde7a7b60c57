//! Pens and the pen registry.

use super::bitmap::Bitmap;
use super::color::{BLACK, Color};
use super::stipple::Stipple;
use std::rc::Rc;

keyword_enum! {
    /// Stroke style. `xor*` styles are accepted but drawn solid.
    #[derive(Default)]
    pub enum PenStyle ("pen style") {
        Transparent => "transparent",
        #[default]
        Solid => "solid",
        Xor => "xor",
        Hilite => "hilite",
        Dot => "dot",
        LongDash => "long-dash",
        ShortDash => "short-dash",
        DotDash => "dot-dash",
        XorDot => "xor-dot",
        XorLongDash => "xor-long-dash",
        XorShortDash => "xor-short-dash",
        XorDotDash => "xor-dot-dash",
    }
}

impl PenStyle {
    /// Dash pattern in user units; empty for continuous strokes.
    pub fn dashes(self) -> &'static [f64] {
        match self {
            PenStyle::Dot => &[1.0, 2.0],
            PenStyle::LongDash => &[4.0, 2.0],
            PenStyle::ShortDash => &[2.0, 2.0],
            PenStyle::DotDash => &[4.0, 2.0, 1.0, 2.0],
            _ => &[],
        }
    }

    pub fn is_xor(self) -> bool {
        matches!(
            self,
            PenStyle::Xor
                | PenStyle::XorDot
                | PenStyle::XorLongDash
                | PenStyle::XorShortDash
                | PenStyle::XorDotDash
        )
    }
}

keyword_enum! {
    /// Line cap. `projecting` is rendered with Cairo's square cap.
    #[derive(Default)]
    pub enum Cap ("pen cap") {
        #[default]
        Round => "round",
        Projecting => "projecting",
        Butt => "butt",
    }
}

impl Cap {
    pub fn to_cairo(self) -> cairo::LineCap {
        match self {
            Cap::Round => cairo::LineCap::Round,
            Cap::Projecting => cairo::LineCap::Square,
            Cap::Butt => cairo::LineCap::Butt,
        }
    }
}

keyword_enum! {
    #[derive(Default)]
    pub enum Join ("pen join") {
        #[default]
        Round => "round",
        Bevel => "bevel",
        Miter => "miter",
    }
}

impl Join {
    pub fn to_cairo(self) -> cairo::LineJoin {
        match self {
            Join::Round => cairo::LineJoin::Round,
            Join::Bevel => cairo::LineJoin::Bevel,
            Join::Miter => cairo::LineJoin::Miter,
        }
    }
}

/// Immutable stroke description.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    color: Color,
    width: f64,
    style: PenStyle,
    cap: Cap,
    join: Join,
    stipple: Option<Stipple>,
}

impl Default for Pen {
    fn default() -> Self {
        Self::new(BLACK, 1.0, PenStyle::Solid)
    }
}

impl Pen {
    /// Pen with round cap and join.
    pub fn new(color: Color, width: f64, style: PenStyle) -> Self {
        Self {
            color,
            width,
            style,
            cap: Cap::default(),
            join: Join::default(),
            stipple: None,
        }
    }

    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Installs `template` recolored with this pen's color as the stroke source.
    pub fn with_stipple(mut self, template: &Bitmap) -> Self {
        self.stipple = Some(Stipple::recolor(template, self.color));
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn style(&self) -> PenStyle {
        self.style
    }

    pub fn cap(&self) -> Cap {
        self.cap
    }

    pub fn join(&self) -> Join {
        self.join
    }

    pub fn stipple(&self) -> Option<&Stipple> {
        self.stipple.as_ref()
    }
}

/// Find-or-create registry of shared pens.
#[derive(Debug, Default)]
pub struct PenList {
    pens: Vec<Rc<Pen>>,
}

impl PenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored pen matching every given field, creating it if needed.
    ///
    /// `cap` and `join` left as `None` match any stored value; a newly created pen
    /// uses the defaults for them.
    pub fn find_or_create(
        &mut self,
        color: Color,
        width: f64,
        style: PenStyle,
        cap: Option<Cap>,
        join: Option<Join>,
    ) -> Rc<Pen> {
        let found = self.pens.iter().find(|p| {
            p.color == color
                && p.width == width
                && p.style == style
                && p.stipple.is_none()
                && cap.is_none_or(|c| p.cap == c)
                && join.is_none_or(|j| p.join == j)
        });
        if let Some(pen) = found {
            return Rc::clone(pen);
        }

        let pen = Rc::new(
            Pen::new(color, width, style)
                .with_cap(cap.unwrap_or_default())
                .with_join(join.unwrap_or_default()),
        );
        self.pens.push(Rc::clone(&pen));
        pen
    }

    pub fn len(&self) -> usize {
        self.pens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pens.is_empty()
    }
}
