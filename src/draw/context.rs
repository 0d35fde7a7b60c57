//! The double-buffered drawing context.
//!
//! Every primitive renders onto an offscreen buffer surface; [`DrawingContext::flush`]
//! masks the buffer with the clipping region, composites it onto the visible
//! surface and clears it. The user transform is the free-form initial matrix
//! followed by origin, scale and rotation, always in that order.

use super::bitmap::{Bitmap, BitmapStyle};
use super::brush::{Brush, BrushList};
use super::color::{BLACK, Color, WHITE};
use super::error::DrawError;
use super::font::{Font, FontList};
use super::pen::{Pen, PenList, PenStyle};
use super::region::{ContextLink, FillRule, Region};
use super::text::{self, TextExtent};
use crate::config::Config;
use crate::geometry::{AffineTransform, PathModel, Point};
use log::{debug, warn};
use std::cell::Cell;
use std::f64::consts::TAU;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Surface size used when none is given.
pub const DEFAULT_SIZE: u32 = 500;

keyword_enum! {
    /// Antialiasing of shapes. `aligned` is drawn like `smoothed`.
    #[derive(Default)]
    pub enum SmoothingMode ("smoothing mode") {
        Unsmoothed => "unsmoothed",
        #[default]
        Smoothed => "smoothed",
        Aligned => "aligned",
    }
}

keyword_enum! {
    /// `solid` paints the text background box behind unrotated text.
    #[derive(Default)]
    pub enum TextMode ("text mode") {
        Solid => "solid",
        #[default]
        Transparent => "transparent",
    }
}

/// Every component of the user transform at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub matrix: AffineTransform,
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            matrix: AffineTransform::identity(),
            origin_x: 0.0,
            origin_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct DrawingContext {
    id: u64,
    width: u32,
    height: u32,
    visible: cairo::ImageSurface,
    buffer: cairo::ImageSurface,

    // Transform pipeline
    initial: Rc<Cell<AffineTransform>>,
    origin: (f64, f64),
    scale: (f64, f64),
    rotation: f64,

    // Styles
    pens: PenList,
    brushes: BrushList,
    fonts: FontList,
    pen: Rc<Pen>,
    brush: Rc<Brush>,
    font: Rc<Font>,
    background: Color,
    text_foreground: Color,
    text_background: Color,
    text_mode: TextMode,
    alpha: f64,
    smoothing: SmoothingMode,

    clipping: Option<Region>,
    flush_suspended: bool,
}

impl DrawingContext {
    /// Context with transparent surfaces, a black 1-unit pen, a white solid brush
    /// and the default 18-unit font.
    pub fn new(width: u32, height: u32) -> Result<Self, DrawError> {
        let mut pens = PenList::new();
        let mut brushes = BrushList::new();
        let mut fonts = FontList::new();
        let pen = pens.find_or_create(BLACK, 1.0, PenStyle::Solid, None, None);
        let brush = brushes.find_or_create(WHITE, Default::default());
        let default_font = Font::default();
        let font = fonts.find_or_create(
            default_font.size(),
            default_font.family(),
            default_font.style(),
            default_font.weight(),
            None,
            None,
            None,
        );

        Ok(Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            visible: argb_surface(width, height)?,
            buffer: argb_surface(width, height)?,
            initial: Rc::new(Cell::new(AffineTransform::identity())),
            origin: (0.0, 0.0),
            scale: (1.0, 1.0),
            rotation: 0.0,
            pens,
            brushes,
            fonts,
            pen,
            brush,
            font,
            background: WHITE,
            text_foreground: BLACK,
            text_background: WHITE,
            text_mode: TextMode::Transparent,
            alpha: 1.0,
            smoothing: SmoothingMode::Smoothed,
            clipping: None,
            flush_suspended: false,
        })
    }

    /// Context sized and styled from the configuration sections.
    pub fn from_config(config: &Config) -> Result<Self, DrawError> {
        let mut dc = Self::new(config.surface.width, config.surface.height)?;
        dc.background = config.surface.background.to_color();

        let pen = dc.pens.find_or_create(
            config.pen.color.to_color(),
            config.pen.width,
            config.pen.style,
            Some(config.pen.cap),
            Some(config.pen.join),
        );
        dc.pen = pen;
        dc.brush = dc
            .brushes
            .find_or_create(config.brush.color.to_color(), config.brush.style);

        let font = dc.fonts.find_or_create(
            config.font.size,
            config.font.family,
            config.font.style,
            config.font.weight,
            Some(config.font.underline),
            Some(config.font.smoothing),
            None,
        );
        dc.font = match &config.font.face {
            Some(face) => dc.fonts.intern(font.as_ref().clone().with_face(face.clone())),
            None => font,
        };

        dc.text_mode = config.text.mode;
        dc.text_foreground = config.text.foreground.to_color();
        dc.text_background = config.text.background.to_color();
        Ok(dc)
    }

    /// Process-unique id, shared by every region created for this context.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn device_scale(&self) -> (f64, f64) {
        (1.0, 1.0)
    }

    /// The visible surface. Drop every reference before reading its pixels.
    pub fn surface(&self) -> &cairo::ImageSurface {
        &self.visible
    }

    /// Copies the visible surface into a bitmap.
    pub fn snapshot(&mut self) -> Result<Bitmap, DrawError> {
        Bitmap::from_surface(&mut self.visible)
    }

    /// Replaces both surfaces with blank ones of the new size.
    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawError> {
        self.visible = argb_surface(width, height)?;
        self.buffer = argb_surface(width, height)?;
        self.width = width;
        self.height = height;
        if self.clipping.take().is_some() {
            debug!("Dropped clipping region after resize to {}x{}", width, height);
        }
        Ok(())
    }

    /// Paints `bitmap` onto the visible surface at the device origin, replacing
    /// what was there.
    pub(crate) fn replace_pixels(&mut self, bitmap: &Bitmap) -> Result<(), DrawError> {
        let source = bitmap.to_surface()?;
        let cr = cairo::Context::new(&self.visible)?;
        cr.set_operator(cairo::Operator::Source);
        cr.set_source_surface(&source, 0.0, 0.0)?;
        cr.paint()?;
        Ok(())
    }

    fn link(&self) -> ContextLink {
        ContextLink {
            id: self.id,
            width: device_extent(self.width),
            height: device_extent(self.height),
            initial: Rc::clone(&self.initial),
        }
    }

    /// A region bound to this context, initially covering the whole surface.
    pub fn create_region(&self) -> Result<Region, DrawError> {
        Region::with_link(self.link())
    }

    // =====================================================================
    // Transform pipeline
    // =====================================================================

    /// The matrix handed to Cairo: initial matrix, then origin, scale and rotation.
    pub fn device_transform(&self) -> AffineTransform {
        let mut m = self.initial.get();
        m.translate(self.origin.0, self.origin.1);
        m.scale(self.scale.0, self.scale.1);
        m.rotate(-self.rotation);
        m
    }

    fn update_pipeline(&self) {
        debug!(
            "Transform pipeline now {} (origin {:?}, scale {:?}, rotation {})",
            self.device_transform(),
            self.origin,
            self.scale,
            self.rotation
        );
    }

    /// Composes `m` onto the initial matrix; origin, scale and rotation are kept.
    pub fn transform(&mut self, m: &AffineTransform) {
        let mut current = self.initial.get();
        current.multiply(m);
        self.initial.set(current);
        self.update_pipeline();
    }

    /// Composes a rotation onto the initial matrix; the separate rotation is kept.
    pub fn rotate(&mut self, radians: f64) {
        let mut current = self.initial.get();
        current.rotate(radians);
        self.initial.set(current);
        self.update_pipeline();
    }

    /// Composes a scale onto the initial matrix; the separate scale is kept.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let mut current = self.initial.get();
        current.scale(sx, sy);
        self.initial.set(current);
        self.update_pipeline();
    }

    pub fn get_transformation(&self) -> Transformation {
        Transformation {
            matrix: self.initial.get(),
            origin_x: self.origin.0,
            origin_y: self.origin.1,
            scale_x: self.scale.0,
            scale_y: self.scale.1,
            rotation: self.rotation,
        }
    }

    /// Replaces every component of the transform at once.
    pub fn set_transformation(&mut self, t: &Transformation) {
        self.initial.set(t.matrix);
        self.origin = (t.origin_x, t.origin_y);
        self.scale = (t.scale_x, t.scale_y);
        self.rotation = t.rotation;
        self.update_pipeline();
    }

    pub fn initial_matrix(&self) -> AffineTransform {
        self.initial.get()
    }

    pub fn set_initial_matrix(&mut self, m: AffineTransform) {
        self.initial.set(m);
        self.update_pipeline();
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
        self.update_pipeline();
    }

    pub fn get_scale(&self) -> (f64, f64) {
        self.scale
    }

    pub fn set_scale(&mut self, sx: f64, sy: f64) {
        self.scale = (sx, sy);
        self.update_pipeline();
    }

    /// Counter-clockwise rotation in radians, as last set.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
        self.update_pipeline();
    }

    // =====================================================================
    // State
    // =====================================================================

    pub fn pen(&self) -> &Rc<Pen> {
        &self.pen
    }

    pub fn set_pen(&mut self, pen: Rc<Pen>) {
        self.pen = pen;
    }

    pub fn brush(&self) -> &Rc<Brush> {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: Rc<Brush>) {
        self.brush = brush;
    }

    pub fn font(&self) -> &Rc<Font> {
        &self.font
    }

    pub fn set_font(&mut self, font: Rc<Font>) {
        self.font = font;
    }

    pub fn pen_list(&mut self) -> &mut PenList {
        &mut self.pens
    }

    pub fn brush_list(&mut self) -> &mut BrushList {
        &mut self.brushes
    }

    pub fn font_list(&mut self) -> &mut FontList {
        &mut self.fonts
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Opacity applied to every primitive; must lie in `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), DrawError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(DrawError::InvalidAlpha(alpha));
        }
        self.alpha = alpha;
        Ok(())
    }

    pub fn smoothing(&self) -> SmoothingMode {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, mode: SmoothingMode) {
        if mode == SmoothingMode::Aligned {
            warn!("aligned smoothing is not supported; drawing as smoothed");
        }
        self.smoothing = mode;
    }

    pub fn text_foreground(&self) -> Color {
        self.text_foreground
    }

    pub fn set_text_foreground(&mut self, color: Color) {
        self.text_foreground = color;
    }

    pub fn text_background(&self) -> Color {
        self.text_background
    }

    pub fn set_text_background(&mut self, color: Color) {
        self.text_background = color;
    }

    pub fn text_mode(&self) -> TextMode {
        self.text_mode
    }

    pub fn set_text_mode(&mut self, mode: TextMode) {
        self.text_mode = mode;
    }

    // =====================================================================
    // Clipping and flushing
    // =====================================================================

    pub fn clipping_region(&self) -> Option<&Region> {
        self.clipping.as_ref()
    }

    /// Masks every later flush with `region`; `None` removes the mask.
    pub fn set_clipping_region(&mut self, region: Option<Region>) {
        self.clipping = region;
    }

    /// Clips to a device-space rectangle.
    pub fn set_clipping_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), DrawError> {
        let mut region = self.create_region()?;
        region.set_rectangle(x, y, width, height)?;
        self.clipping = Some(region);
        Ok(())
    }

    /// Holds drawing in the buffer until [`resume_flush`](Self::resume_flush).
    pub fn suspend_flush(&mut self) {
        self.flush_suspended = true;
    }

    pub fn resume_flush(&mut self) {
        self.flush_suspended = false;
    }

    pub fn is_flush_suspended(&self) -> bool {
        self.flush_suspended
    }

    /// Moves the buffer onto the visible surface, masked by the clipping region.
    ///
    /// Does nothing while flushing is suspended.
    pub fn flush(&self) -> Result<(), DrawError> {
        if self.flush_suspended {
            return Ok(());
        }

        let buffer = cairo::Context::new(&self.buffer)?;
        if let Some(region) = &self.clipping {
            let (x, y) = region.origin();
            buffer.set_operator(cairo::Operator::DestIn);
            buffer.set_source_surface(region.surface(), x, y)?;
            buffer.paint()?;
        }

        {
            let visible = cairo::Context::new(&self.visible)?;
            visible.set_source_surface(&self.buffer, 0.0, 0.0)?;
            visible.paint()?;
        }

        buffer.set_operator(cairo::Operator::Clear);
        buffer.paint()?;
        buffer.set_operator(cairo::Operator::Over);
        debug!("Flushed buffer (clipped: {})", self.clipping.is_some());
        Ok(())
    }

    /// Cairo context on the buffer with the current transform and smoothing.
    fn buffer_context(&self) -> Result<cairo::Context, DrawError> {
        let cr = cairo::Context::new(&self.buffer)?;
        cr.set_matrix(self.device_transform().to_cairo());
        if self.smoothing == SmoothingMode::Unsmoothed {
            cr.set_antialias(cairo::Antialias::None);
        }
        Ok(cr)
    }

    /// Runs `draw` on the buffer, applying the context alpha, then flushes.
    fn render<F>(&self, draw: F) -> Result<(), DrawError>
    where
        F: FnOnce(&mut cairo::Context) -> Result<(), DrawError>,
    {
        {
            let mut cr = self.buffer_context()?;
            let grouped = self.alpha < 1.0;
            if grouped {
                cr.push_group();
            }
            draw(&mut cr)?;
            if grouped {
                cr.pop_group_to_source()?;
                cr.paint_with_alpha(self.alpha)?;
            }
        }
        self.flush()
    }

    // =====================================================================
    // Fill and stroke
    // =====================================================================

    /// Fills `path` with the current brush.
    ///
    /// Source priority: the brush stipple, else its gradient, else its flat color.
    pub fn fill(&mut self, path: &PathModel, rule: FillRule) -> Result<(), DrawError> {
        let brush = Rc::clone(&self.brush);
        self.render(|cr| {
            if brush.is_transparent() {
                return Ok(());
            }
            path.make_canvas_path(cr);
            cr.set_fill_rule(rule.to_cairo());
            set_brush_source(cr, &brush)?;
            cr.fill()?;
            Ok(())
        })
    }

    /// Strokes `path` with the current pen. A transparent pen draws nothing.
    pub fn stroke(&mut self, path: &PathModel) -> Result<(), DrawError> {
        let pen = Rc::clone(&self.pen);
        if pen.style() == PenStyle::Transparent {
            return Ok(());
        }
        if pen.style().is_xor() {
            warn!("xor pen style '{}' is not supported; drawing solid", pen.style());
        }

        self.render(|cr| {
            path.make_canvas_path(cr);
            cr.set_line_cap(pen.cap().to_cairo());
            cr.set_line_join(pen.join().to_cairo());
            cr.set_line_width(pen.width());
            cr.set_dash(pen.style().dashes(), 0.0);

            if let Some(stipple) = pen.stipple() {
                cr.set_source(&stipple.pattern()?)?;
            } else if pen.style() == PenStyle::Hilite {
                pen.color().with_alpha(super::brush::HILITE_ALPHA).set_source(cr);
            } else {
                pen.color().set_source(cr);
            }
            cr.stroke()?;
            Ok(())
        })
    }

    fn fill_and_stroke(&mut self, path: &PathModel, rule: FillRule) -> Result<(), DrawError> {
        self.fill(path, rule)?;
        self.stroke(path)
    }

    // =====================================================================
    // Surface operations
    // =====================================================================

    /// Fills the whole surface with the background color.
    pub fn clear(&mut self) -> Result<(), DrawError> {
        let background = self.background;
        {
            let cr = cairo::Context::new(&self.buffer)?;
            background.set_source(&cr);
            cr.paint()?;
        }
        self.flush()
    }

    /// Resets both surfaces to fully transparent.
    pub fn erase(&mut self) -> Result<(), DrawError> {
        for surface in [&self.buffer, &self.visible] {
            let cr = cairo::Context::new(surface)?;
            cr.set_operator(cairo::Operator::Clear);
            cr.paint()?;
        }
        Ok(())
    }

    /// Copies a device rectangle of the visible surface to `(x2, y2)`.
    ///
    /// Fails when the destination corner lies inside the source rectangle.
    pub fn copy(&mut self, x: f64, y: f64, width: f64, height: f64, x2: f64, y2: f64) -> Result<(), DrawError> {
        if (x..=x + width).contains(&x2) && (y..=y + height).contains(&y2) {
            return Err(DrawError::OverlappingCopy);
        }
        {
            let cr = cairo::Context::new(&self.buffer)?;
            cr.set_source_surface(&self.visible, x2 - x, y2 - y)?;
            cr.rectangle(x2, y2, width, height);
            cr.fill()?;
        }
        self.flush()
    }

    // =====================================================================
    // Shapes
    // =====================================================================

    /// Arc of the ellipse inscribed in the rectangle; a pie wedge when the brush
    /// is not transparent.
    pub fn draw_arc(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        start: f64,
        end: f64,
    ) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.arc(x, y, width, height, start, end)?;
        if !self.brush.is_transparent() {
            path.line_to(x + width / 2.0, y + height / 2.0)?;
            self.fill(&path, FillRule::Winding)?;
        }
        self.stroke(&path)
    }

    pub fn draw_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.arc(x, y, width, height, 0.0, TAU)?;
        self.fill_and_stroke(&path, FillRule::Winding)
    }

    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.move_to(x1, y1);
        path.line_to(x2, y2)?;
        self.stroke(&path)
    }

    /// Connected lines through `points`, each shifted by `(dx, dy)`.
    pub fn draw_lines(&mut self, points: &[Point], dx: f64, dy: f64) -> Result<(), DrawError> {
        let Some(first) = points.first() else {
            return Ok(());
        };
        let mut path = PathModel::new();
        path.move_to(first.x + dx, first.y + dy);
        path.lines(&points[1..], dx, dy)?;
        self.stroke(&path)
    }

    /// Fills and strokes a shifted copy of `path`.
    pub fn draw_path(&mut self, path: &PathModel, dx: f64, dy: f64, rule: FillRule) -> Result<(), DrawError> {
        let mut shifted = path.clone();
        shifted.translate(dx, dy);
        self.fill_and_stroke(&shifted, rule)
    }

    /// A one-unit square outline at `(x, y)`.
    pub fn draw_point(&mut self, x: f64, y: f64) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.rectangle(x, y, 1.0, 1.0)?;
        self.stroke(&path)
    }

    pub fn draw_polygon(&mut self, points: &[Point], dx: f64, dy: f64, rule: FillRule) -> Result<(), DrawError> {
        let Some(first) = points.first() else {
            return Ok(());
        };
        let mut path = PathModel::new();
        path.move_to(first.x + dx, first.y + dy);
        path.lines(&points[1..], dx, dy)?;
        path.line_to(first.x + dx, first.y + dy)?;
        path.close()?;
        self.fill_and_stroke(&path, rule)
    }

    pub fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.rectangle(x, y, width, height)?;
        self.fill_and_stroke(&path, FillRule::Winding)
    }

    pub fn draw_rounded_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.rounded_rectangle(x, y, width, height, radius)?;
        self.fill_and_stroke(&path, FillRule::Winding)
    }

    /// Quadratic Bezier from `(x1, y1)` to `(x3, y3)` with control `(x2, y2)`.
    pub fn draw_spline(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<(), DrawError> {
        let mut path = PathModel::new();
        path.move_to(x1, y1);
        path.curve_to(
            x1 / 3.0 + 2.0 * x2 / 3.0,
            y1 / 3.0 + 2.0 * y2 / 3.0,
            2.0 * x2 / 3.0 + x3 / 3.0,
            2.0 * y2 / 3.0 + y3 / 3.0,
            x3,
            y3,
        )?;
        self.stroke(&path)
    }

    // =====================================================================
    // Bitmaps
    // =====================================================================

    /// Draws all of `source` at `(dest_x, dest_y)`.
    pub fn draw_bitmap(
        &mut self,
        source: &Bitmap,
        dest_x: f64,
        dest_y: f64,
        style: BitmapStyle,
        color: Option<Color>,
        mask: Option<&Bitmap>,
    ) -> Result<(), DrawError> {
        self.draw_bitmap_section(
            source,
            dest_x,
            dest_y,
            0.0,
            0.0,
            f64::from(source.width()),
            f64::from(source.height()),
            style,
            color,
            mask,
        )
    }

    /// Draws a section of `source`, optionally recolored and masked.
    ///
    /// A monochrome source with `color` is recolored: `opaque` recolors the
    /// non-black pixels, other styles the black ones, and `transparent` draws
    /// nothing. A `mask` must match the source size; a monochrome mask uses its
    /// inverted red channel as alpha, a mask with alpha copies it, and a color
    /// mask uses its inverted average intensity.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bitmap_section(
        &mut self,
        source: &Bitmap,
        dest_x: f64,
        dest_y: f64,
        src_x: f64,
        src_y: f64,
        src_width: f64,
        src_height: f64,
        style: BitmapStyle,
        color: Option<Color>,
        mask: Option<&Bitmap>,
    ) -> Result<(), DrawError> {
        if !source.is_ok() {
            return Err(DrawError::BitmapNotReady);
        }

        let mut pixels = source.clone();
        if let Some(color) = color.filter(|_| source.is_monochrome()) {
            if style == BitmapStyle::Transparent {
                return Ok(());
            }
            recolor_monochrome(&mut pixels, color, style);
        }

        if let Some(mask) = mask {
            if mask.width() != source.width() || mask.height() != source.height() {
                return Err(DrawError::MaskSizeMismatch {
                    src_width: source.width(),
                    src_height: source.height(),
                    mask_width: mask.width(),
                    mask_height: mask.height(),
                });
            }
            apply_mask(&mut pixels, mask);
        }

        let surface = pixels.to_surface()?;
        self.render(|cr| {
            cr.set_source_surface(&surface, dest_x - src_x, dest_y - src_y)?;
            cr.rectangle(dest_x, dest_y, src_width, src_height);
            cr.fill()?;
            Ok(())
        })
    }

    // =====================================================================
    // Text
    // =====================================================================

    /// Draws `text` with its top-left corner at `(x, y)`.
    ///
    /// The first `offset` characters are skipped. Ligatures are expanded unless
    /// `combine` is set. `angle` rotates counter-clockwise around `(x, y)`.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        combine: bool,
        offset: usize,
        angle: f64,
    ) -> Result<(), DrawError> {
        let text = text::prepare(text, offset, combine)?;
        let font = Rc::clone(&self.font);
        let solid = self.text_mode == TextMode::Solid;
        let (foreground, background) = (self.text_foreground, self.text_background);

        self.render(|cr| {
            cr.translate(x, y);
            if angle != 0.0 {
                cr.rotate(-angle);
            }
            let layout = text::layout(cr, &font, &text)?;
            let extent = text::extent_of(&layout);

            if solid && angle == 0.0 {
                background.set_source(cr);
                cr.rectangle(0.0, 0.0, extent.width, extent.height);
                cr.fill()?;
            }

            // Baseline sits `height` below the top edge.
            foreground.set_source(cr);
            cr.move_to(0.0, extent.descent);
            pangocairo::functions::show_layout(cr, &layout);

            if font.underline() {
                cr.new_path();
                cr.set_line_width(1.0);
                cr.set_dash(&[], 0.0);
                cr.move_to(0.0, extent.height + 2.0);
                cr.line_to(extent.width, extent.height + 2.0);
                cr.stroke()?;
            }
            Ok(())
        })
    }

    /// Size of `text` in `font` (the current font when `None`).
    pub fn text_extent(
        &self,
        text: &str,
        font: Option<&Font>,
        combine: bool,
        offset: usize,
    ) -> Result<TextExtent, DrawError> {
        let text = text::prepare(text, offset, combine)?;
        let cr = self.buffer_context()?;
        let layout = text::layout(&cr, font.unwrap_or(self.font.as_ref()), &text)?;
        Ok(text::extent_of(&layout))
    }

    /// Width of "M" in the current font.
    pub fn char_width(&self) -> Result<f64, DrawError> {
        Ok(self.text_extent("M", None, true, 0)?.width)
    }

    /// Height of "M" in the current font.
    pub fn char_height(&self) -> Result<f64, DrawError> {
        Ok(self.text_extent("M", None, true, 0)?.height)
    }

    /// True when the current font can render `c`.
    pub fn glyph_exists(&self, c: char) -> Result<bool, DrawError> {
        let cr = self.buffer_context()?;
        text::glyphs_exist(&cr, &self.font, c.encode_utf8(&mut [0; 4]))
    }
}

fn set_brush_source(cr: &cairo::Context, brush: &Brush) -> Result<(), DrawError> {
    let pattern_matrix = brush
        .transformation()
        .and_then(|t| t.to_cairo().try_invert().ok());

    if let Some(stipple) = brush.stipple() {
        let pattern = stipple.pattern()?;
        if let Some(m) = pattern_matrix {
            pattern.set_matrix(m);
        }
        cr.set_source(&pattern)?;
    } else if let Some(gradient) = brush.gradient() {
        let pattern = gradient.to_cairo();
        if let Some(m) = pattern_matrix {
            pattern.set_matrix(m);
        }
        cr.set_source(&pattern)?;
    } else {
        brush.flat_color().set_source(cr);
    }
    Ok(())
}

fn recolor_monochrome(bitmap: &mut Bitmap, color: Color, style: BitmapStyle) {
    let opaque = style == BitmapStyle::Opaque;
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let Some([r, g, b, a]) = bitmap.pixel(x, y) else {
                continue;
            };
            let black = r == 0 && g == 0 && b == 0;
            if black == opaque {
                continue;
            }
            bitmap.set_pixel(x, y, [color.red(), color.green(), color.blue(), a]);
        }
    }
}

fn apply_mask(bitmap: &mut Bitmap, mask: &Bitmap) {
    let alpha_of: fn([u8; 4]) -> u8 = if mask.is_monochrome() {
        |[r, _, _, _]| 255 - r
    } else if mask.has_alpha_channel() {
        |[_, _, _, a]| a
    } else if mask.is_color() {
        |[r, g, b, _]| 255 - ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
    } else {
        return;
    };

    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            if let (Some(mut px), Some(m)) = (bitmap.pixel(x, y), mask.pixel(x, y)) {
                px[3] = alpha_of(m);
                bitmap.set_pixel(x, y, px);
            }
        }
    }
}

fn device_extent(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

fn argb_surface(width: u32, height: u32) -> Result<cairo::ImageSurface, DrawError> {
    Ok(cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        device_extent(width),
        device_extent(height),
    )?)
}
