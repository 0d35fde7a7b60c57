//! Hatch templates and recolored stipple patterns.

use super::bitmap::Bitmap;
use super::color::Color;
use super::error::DrawError;

/// Side length of a hatch template in pixels.
pub const HATCH_SIZE: u32 = 16;
const HATCH_SPACING: i64 = 8;

keyword_enum! {
    /// Built-in hatch patterns for brushes.
    pub enum Hatch ("hatch") {
        BDiagonal => "bdiagonal-hatch",
        CrossDiag => "crossdiag-hatch",
        FDiagonal => "fdiagonal-hatch",
        Cross => "cross-hatch",
        Horizontal => "horizontal-hatch",
        Vertical => "vertical-hatch",
    }
}

impl Hatch {
    fn covers(self, x: i64, y: i64) -> bool {
        let on = |v: i64| v.rem_euclid(HATCH_SPACING) == 0;
        match self {
            Hatch::BDiagonal => on(x + y),
            Hatch::FDiagonal => on(x - y),
            Hatch::CrossDiag => on(x + y) || on(x - y),
            Hatch::Cross => on(x) || on(y),
            Hatch::Horizontal => on(y),
            Hatch::Vertical => on(x),
        }
    }

    /// Black lines on opaque white, tiling seamlessly.
    pub fn template(self) -> Bitmap {
        let mut pixels = Vec::with_capacity((HATCH_SIZE * HATCH_SIZE * 4) as usize);
        for y in 0..i64::from(HATCH_SIZE) {
            for x in 0..i64::from(HATCH_SIZE) {
                let v = if self.covers(x, y) { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        match Bitmap::from_rgba(HATCH_SIZE, HATCH_SIZE, pixels) {
            Some(bitmap) => bitmap,
            None => unreachable!("hatch buffer is sized from HATCH_SIZE"),
        }
    }
}

/// A repeating source bitmap for brushes and pens.
#[derive(Debug, Clone, PartialEq)]
pub struct Stipple {
    bitmap: Bitmap,
}

impl Stipple {
    /// Uses `bitmap` as-is.
    pub fn new(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }

    /// Black pixels of `template` take `color`; every other pixel becomes
    /// transparent.
    pub fn recolor(template: &Bitmap, color: Color) -> Self {
        let mut bitmap = template.clone();
        let fill = [
            color.red(),
            color.green(),
            color.blue(),
            (color.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ];
        for y in 0..bitmap.height() {
            for x in 0..bitmap.width() {
                let Some([r, g, b, a]) = template.pixel(x, y) else {
                    continue;
                };
                let out = if a > 0 && r == 0 && g == 0 && b == 0 {
                    fill
                } else {
                    [0, 0, 0, 0]
                };
                bitmap.set_pixel(x, y, out);
            }
        }
        Self { bitmap }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Repeating Cairo pattern over the stipple pixels.
    pub(crate) fn pattern(&self) -> Result<cairo::SurfacePattern, DrawError> {
        let surface = self.bitmap.to_surface()?;
        let pattern = cairo::SurfacePattern::create(&surface);
        pattern.set_extend(cairo::Extend::Repeat);
        Ok(pattern)
    }
}
