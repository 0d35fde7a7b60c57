//! Brushes and the brush registry.

use super::bitmap::Bitmap;
use super::color::{Color, WHITE};
use super::gradient::Gradient;
use super::stipple::{Hatch, Stipple};
use crate::geometry::AffineTransform;
use std::rc::Rc;

/// Alpha used for `hilite` brushes.
pub const HILITE_ALPHA: f64 = 0.3;

keyword_enum! {
    /// Fill style. Hatch styles install a recolored hatch stipple.
    #[derive(Default)]
    pub enum BrushStyle ("brush style") {
        Transparent => "transparent",
        #[default]
        Solid => "solid",
        Opaque => "opaque",
        Xor => "xor",
        Hilite => "hilite",
        Panel => "panel",
        BDiagonalHatch => "bdiagonal-hatch",
        CrossDiagHatch => "crossdiag-hatch",
        FDiagonalHatch => "fdiagonal-hatch",
        CrossHatch => "cross-hatch",
        HorizontalHatch => "horizontal-hatch",
        VerticalHatch => "vertical-hatch",
    }
}

impl BrushStyle {
    pub fn hatch(self) -> Option<Hatch> {
        match self {
            BrushStyle::BDiagonalHatch => Some(Hatch::BDiagonal),
            BrushStyle::CrossDiagHatch => Some(Hatch::CrossDiag),
            BrushStyle::FDiagonalHatch => Some(Hatch::FDiagonal),
            BrushStyle::CrossHatch => Some(Hatch::Cross),
            BrushStyle::HorizontalHatch => Some(Hatch::Horizontal),
            BrushStyle::VerticalHatch => Some(Hatch::Vertical),
            _ => None,
        }
    }
}

/// Immutable fill description.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    color: Color,
    style: BrushStyle,
    stipple: Option<Stipple>,
    gradient: Option<Gradient>,
    transformation: Option<AffineTransform>,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(WHITE, BrushStyle::Solid)
    }
}

impl Brush {
    /// Brush of `color`; hatch styles get their stipple here.
    pub fn new(color: Color, style: BrushStyle) -> Self {
        Self {
            color,
            style,
            stipple: style.hatch().map(|h| Stipple::recolor(&h.template(), color)),
            gradient: None,
            transformation: None,
        }
    }

    /// Recolors `template` with the brush color and uses it as the fill source.
    pub fn with_stipple(mut self, template: &Bitmap) -> Self {
        self.stipple = Some(Stipple::recolor(template, self.color));
        self
    }

    pub fn with_gradient(mut self, gradient: impl Into<Gradient>) -> Self {
        self.gradient = Some(gradient.into());
        self
    }

    /// Matrix applied to the gradient or stipple pattern space.
    pub fn with_transformation(mut self, transformation: AffineTransform) -> Self {
        self.transformation = Some(transformation);
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The style this brush was requested with.
    pub fn style(&self) -> BrushStyle {
        self.style
    }

    /// `solid` once a stipple is installed, else the requested style.
    pub fn effective_style(&self) -> BrushStyle {
        if self.stipple.is_some() && self.style != BrushStyle::Transparent {
            BrushStyle::Solid
        } else {
            self.style
        }
    }

    pub fn stipple(&self) -> Option<&Stipple> {
        self.stipple.as_ref()
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        self.gradient.as_ref()
    }

    pub fn transformation(&self) -> Option<&AffineTransform> {
        self.transformation.as_ref()
    }

    pub fn is_transparent(&self) -> bool {
        self.style == BrushStyle::Transparent
    }

    /// Flat color for the style: `hilite` is drawn at [`HILITE_ALPHA`].
    pub fn flat_color(&self) -> Color {
        match self.style {
            BrushStyle::Hilite => self.color.with_alpha(HILITE_ALPHA),
            _ => self.color,
        }
    }
}

/// Find-or-create registry of shared brushes.
#[derive(Debug, Default)]
pub struct BrushList {
    brushes: Vec<Rc<Brush>>,
}

impl BrushList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares brushes by color and requested style; brushes carrying a custom
    /// stipple, gradient or transformation are never matched.
    pub fn find_or_create(&mut self, color: Color, style: BrushStyle) -> Rc<Brush> {
        let found = self.brushes.iter().find(|b| {
            b.color == color && b.style == style && b.gradient.is_none() && b.transformation.is_none()
        });
        if let Some(brush) = found {
            return Rc::clone(brush);
        }

        let brush = Rc::new(Brush::new(color, style));
        self.brushes.push(Rc::clone(&brush));
        brush
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, RED};

    #[test]
    fn hatch_styles_install_a_recolored_stipple() {
        let brush = Brush::new(RED, BrushStyle::CrossHatch);
        let stipple = brush.stipple().expect("hatch stipple");
        assert_eq!(stipple.bitmap().pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(brush.style(), BrushStyle::CrossHatch);
        assert_eq!(brush.effective_style(), BrushStyle::Solid);
    }

    #[test]
    fn hilite_uses_reduced_alpha() {
        let brush = Brush::new(BLUE, BrushStyle::Hilite);
        assert_eq!(brush.flat_color().alpha(), HILITE_ALPHA);
        assert_eq!(Brush::new(BLUE, BrushStyle::Panel).flat_color(), BLUE);
    }

    #[test]
    fn registry_shares_hatched_brushes() {
        let mut list = BrushList::new();
        let a = list.find_or_create(RED, BrushStyle::VerticalHatch);
        let b = list.find_or_create(RED, BrushStyle::VerticalHatch);
        let c = list.find_or_create(RED, BrushStyle::Solid);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn default_brush_is_white_solid() {
        let brush = Brush::default();
        assert_eq!(brush.color(), WHITE);
        assert_eq!(brush.style(), BrushStyle::Solid);
        assert!(brush.stipple().is_none());
    }
}
