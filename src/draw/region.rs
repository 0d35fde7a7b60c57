//! Raster-backed boolean regions.
//!
//! A region is a monochrome (`A8`, no antialiasing) surface plus the tracked
//! bounding box of the shape last set on it. Regions combine by compositing one
//! surface onto another with the matching Cairo operator.
//!
//! A region created for a drawing context covers the device surface. A detached
//! region's surface covers only its shapes and sits at a device origin.

use super::error::DrawError;
use crate::geometry::{AffineTransform, BoundingBox, PathModel, Point};
use log::{debug, warn};
use std::cell::Cell;
use std::rc::Rc;

/// Surface size of a region with no drawing context.
const DETACHED_MIN_SIZE: i32 = 1;

/// Largest side Cairo accepts for an image surface.
const MAX_SURFACE_SIDE: i64 = 32767;

keyword_enum! {
    /// `winding` fills with the nonzero rule, `odd-even` with even-odd.
    #[derive(Default)]
    pub enum FillRule ("fill rule") {
        #[default]
        Winding => "winding",
        OddEven => "odd-even",
    }
}

impl FillRule {
    pub fn to_cairo(self) -> cairo::FillRule {
        match self {
            FillRule::Winding => cairo::FillRule::Winding,
            FillRule::OddEven => cairo::FillRule::EvenOdd,
        }
    }
}

/// What a region knows about the drawing context it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct ContextLink {
    pub id: u64,
    pub width: i32,
    pub height: i32,
    pub initial: Rc<Cell<AffineTransform>>,
}

#[derive(Debug)]
pub struct Region {
    surface: cairo::ImageSurface,
    /// Device position of the surface's top-left pixel; zero with a context.
    origin: (i64, i64),
    bbox: Option<BoundingBox>,
    link: Option<ContextLink>,
}

impl Region {
    /// Region with no drawing context; its surface follows the shapes set on it.
    pub fn new() -> Result<Self, DrawError> {
        Ok(Self {
            surface: blank_surface(DETACHED_MIN_SIZE, DETACHED_MIN_SIZE)?,
            origin: (0, 0),
            bbox: None,
            link: None,
        })
    }

    /// Region sized like its context, initially covering the whole surface.
    pub(crate) fn with_link(link: ContextLink) -> Result<Self, DrawError> {
        let (width, height) = (link.width, link.height);
        let mut region = Self {
            surface: blank_surface(width, height)?,
            origin: (0, 0),
            bbox: None,
            link: Some(link),
        };
        region.set_rectangle(0.0, 0.0, f64::from(width), f64::from(height))?;
        Ok(region)
    }

    /// Deep copy with its own surface.
    pub fn try_clone(&self) -> Result<Self, DrawError> {
        let surface = blank_surface(self.surface.width(), self.surface.height())?;
        {
            let cr = cairo::Context::new(&surface)?;
            cr.set_source_surface(&self.surface, 0.0, 0.0)?;
            cr.set_operator(cairo::Operator::Source);
            cr.paint()?;
        }
        Ok(Self {
            surface,
            origin: self.origin,
            bbox: self.bbox,
            link: self.link.clone(),
        })
    }

    /// Id of the associated drawing context, if any.
    pub fn context_id(&self) -> Option<u64> {
        self.link.as_ref().map(|l| l.id)
    }

    pub(crate) fn surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    /// Device offset at which [`surface`](Self::surface) is placed.
    pub(crate) fn origin(&self) -> (f64, f64) {
        (self.origin.0 as f64, self.origin.1 as f64)
    }

    /// Device rectangle `(x0, y0, x1, y1)` covered by the surface, end exclusive.
    fn frame(&self) -> (i64, i64, i64, i64) {
        let (x, y) = self.origin;
        (
            x,
            y,
            x + i64::from(self.surface.width()),
            y + i64::from(self.surface.height()),
        )
    }

    // ---------------------------------------------------------------------
    // Shape setters
    // ---------------------------------------------------------------------

    pub fn set_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.rectangle(x, y, width, height)?;
        self.fill_path(&path, path.bounding_box(), FillRule::Winding)
    }

    pub fn set_rounded_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.rounded_rectangle(x, y, width, height, radius)?;
        self.fill_path(&path, path.bounding_box(), FillRule::Winding)
    }

    pub fn set_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.ellipse(x, y, width, height)?;
        self.fill_path(&path, path.bounding_box(), FillRule::Winding)
    }

    pub fn set_arc(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        eta1: f64,
        eta2: f64,
    ) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.arc(x, y, width, height, eta1, eta2)?;
        self.fill_path(&path, path.bounding_box(), FillRule::Winding)
    }

    /// Closed polygon through `points`, each shifted by `(dx, dy)`. An empty slice
    /// leaves the region empty.
    pub fn set_polygon(
        &mut self,
        points: &[Point],
        dx: f64,
        dy: f64,
        rule: FillRule,
    ) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        if let Some(first) = points.first() {
            path.move_to(first.x + dx, first.y + dy);
            path.lines(points, dx, dy)?;
            path.line_to(first.x + dx, first.y + dy)?;
            path.close()?;
        }
        self.fill_path(&path, path.bounding_box(), rule)
    }

    /// A copy of `path` shifted by `(dx, dy)`; the caller's path is untouched.
    pub fn set_path(&mut self, path: &PathModel, dx: f64, dy: f64, rule: FillRule) -> Result<(), DrawError> {
        let mut shifted = path.clone();
        // Translation moves the points but not the tracked extents.
        shifted.translate(dx, dy);
        let bbox = path.extents().map(|mut e| {
            e.min_x += dx;
            e.max_x += dx;
            e.min_y += dy;
            e.max_y += dy;
            e.rounded()
        });
        self.fill_path(&shifted, bbox, rule)
    }

    /// Rasterizes `path` onto a fresh surface; a detached region's surface is
    /// sized and placed from `bbox`.
    fn fill_path(
        &mut self,
        path: &PathModel,
        bbox: Option<BoundingBox>,
        rule: FillRule,
    ) -> Result<(), DrawError> {
        if rule == FillRule::OddEven {
            warn!("odd-even fill rule depends on backend support; results may differ from winding");
        }

        if self.link.is_none() {
            let (origin, width, height) = detached_frame(bbox);
            self.surface = blank_surface(width, height)?;
            self.origin = origin;
        } else {
            self.surface = blank_surface(self.surface.width(), self.surface.height())?;
        }

        {
            let mut cr = cairo::Context::new(&self.surface)?;
            cr.translate(-(self.origin.0 as f64), -(self.origin.1 as f64));
            cr.set_antialias(cairo::Antialias::None);
            cr.set_fill_rule(rule.to_cairo());
            cr.set_source_rgba(0.0, 0.0, 0.0, 1.0);
            path.make_canvas_path(&mut cr);
            cr.fill()?;
        }
        self.bbox = bbox;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Combination
    // ---------------------------------------------------------------------

    /// Keeps only the area covered by both regions.
    pub fn intersect(&mut self, other: &Region) -> Result<(), DrawError> {
        self.combine(other, cairo::Operator::In)
    }

    pub fn union(&mut self, other: &Region) -> Result<(), DrawError> {
        self.combine(other, cairo::Operator::Over)
    }

    /// Removes `other`'s area from this region.
    pub fn subtract(&mut self, other: &Region) -> Result<(), DrawError> {
        self.combine(other, cairo::Operator::DestOut)
    }

    pub fn xor(&mut self, other: &Region) -> Result<(), DrawError> {
        self.combine(other, cairo::Operator::Xor)
    }

    fn combine(&mut self, other: &Region, operator: cairo::Operator) -> Result<(), DrawError> {
        if self.context_id() != other.context_id() {
            return Err(DrawError::RegionMismatch);
        }

        if self.link.is_none() {
            self.cover(other.frame())?;
        }

        {
            let cr = cairo::Context::new(&self.surface)?;
            cr.set_operator(operator);
            cr.set_source_surface(
                &other.surface,
                (other.origin.0 - self.origin.0) as f64,
                (other.origin.1 - self.origin.1) as f64,
            )?;
            cr.paint()?;
        }
        debug!("Combined regions with {:?}", operator);

        self.bbox = match (self.bbox, other.bbox) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
        Ok(())
    }

    /// Grows a detached surface until it also covers `frame`, keeping its pixels.
    fn cover(&mut self, frame: (i64, i64, i64, i64)) -> Result<(), DrawError> {
        let own = self.frame();
        let (x0, y0) = (own.0.min(frame.0), own.1.min(frame.1));
        let (x1, y1) = (own.2.max(frame.2), own.3.max(frame.3));
        if (x0, y0, x1, y1) == own {
            return Ok(());
        }

        let surface = blank_surface(surface_side(x1 - x0), surface_side(y1 - y0))?;
        {
            let cr = cairo::Context::new(&surface)?;
            cr.set_source_surface(&self.surface, (own.0 - x0) as f64, (own.1 - y0) as f64)?;
            cr.paint()?;
        }
        self.surface = surface;
        self.origin = (x0, y0);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Device rectangle when associated with a context, else the tracked box.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match &self.link {
            Some(link) => Some(BoundingBox::new(0, 0, i64::from(link.width), i64::from(link.height))),
            None => self.bbox,
        }
    }

    /// Membership test.
    ///
    /// With a context, `(x, y)` is mapped through the context's initial matrix and
    /// checked against the device rectangle. Without one, the tracked box is
    /// checked first, then the surface's alpha at the point.
    pub fn in_region(&mut self, x: f64, y: f64) -> Result<bool, DrawError> {
        if let Some(link) = &self.link {
            let (px, py) = link.initial.get().transform_point(x, y);
            return Ok(px >= 0.0
                && px <= f64::from(link.width)
                && py >= 0.0
                && py <= f64::from(link.height));
        }

        let Some(bbox) = self.bbox else {
            return Ok(false);
        };
        if !bbox.contains(x, y) {
            return Ok(false);
        }
        let ix = x.floor() as i64 - self.origin.0;
        let iy = y.floor() as i64 - self.origin.1;
        if ix < 0
            || iy < 0
            || ix >= i64::from(self.surface.width())
            || iy >= i64::from(self.surface.height())
        {
            return Ok(false);
        }
        let stride = self.surface.stride() as usize;
        self.surface.flush();
        let data = self.surface.data()?;
        Ok(data[iy as usize * stride + ix as usize] == 255)
    }

    /// True when the tracked box has zero area. Requires a drawing context.
    pub fn is_empty(&self) -> Result<bool, DrawError> {
        if self.link.is_none() {
            return Err(DrawError::RegionWithoutContext);
        }
        Ok(self.bbox.is_none_or(|b| b.area() == 0))
    }
}

fn blank_surface(width: i32, height: i32) -> Result<cairo::ImageSurface, DrawError> {
    Ok(cairo::ImageSurface::create(cairo::Format::A8, width.max(1), height.max(1))?)
}

/// Origin and size of a detached surface covering `bbox`, extrema included.
fn detached_frame(bbox: Option<BoundingBox>) -> ((i64, i64), i32, i32) {
    match bbox {
        Some(b) => (
            (b.min_x, b.min_y),
            surface_side(b.width() + 1),
            surface_side(b.height() + 1),
        ),
        None => ((0, 0), DETACHED_MIN_SIZE, DETACHED_MIN_SIZE),
    }
}

fn surface_side(extent: i64) -> i32 {
    if extent > MAX_SURFACE_SIDE {
        warn!(
            "Region extent {} exceeds {} pixels; the excess is dropped",
            extent, MAX_SURFACE_SIDE
        );
    }
    extent.clamp(1, MAX_SURFACE_SIDE) as i32
}

#[cfg(test)]
mod tests;
