//! A drawing context whose surface is a bitmap.

use super::bitmap::{Bitmap, ImageFormat};
use super::color::Color;
use super::context::DrawingContext;
use super::error::DrawError;
use std::path::Path;

#[derive(Debug)]
pub struct BitmapDc {
    dc: DrawingContext,
}

impl BitmapDc {
    /// Context sized to `bitmap` and holding a copy of its pixels.
    pub fn from_bitmap(bitmap: &Bitmap) -> Result<Self, DrawError> {
        let mut dc = DrawingContext::new(bitmap.width(), bitmap.height())?;
        if bitmap.is_ok() {
            dc.replace_pixels(bitmap)?;
        }
        Ok(Self { dc })
    }

    pub fn dc(&self) -> &DrawingContext {
        &self.dc
    }

    pub fn dc_mut(&mut self) -> &mut DrawingContext {
        &mut self.dc
    }

    /// Snapshot of everything drawn so far.
    pub fn bitmap(&mut self) -> Result<Bitmap, DrawError> {
        self.dc.snapshot()
    }

    /// Resizes to `bitmap` and replaces the pixels with its contents.
    pub fn set_bitmap(&mut self, bitmap: &Bitmap) -> Result<(), DrawError> {
        let (width, height) = self.dc.size();
        if (width, height) != (bitmap.width(), bitmap.height()) {
            self.dc.resize(bitmap.width(), bitmap.height())?;
        } else {
            self.dc.erase()?;
        }
        if bitmap.is_ok() {
            self.dc.replace_pixels(bitmap)?;
        }
        Ok(())
    }

    /// Color at a device pixel, `None` outside the surface.
    pub fn pixel(&mut self, x: u32, y: u32) -> Result<Option<Color>, DrawError> {
        let snapshot = self.dc.snapshot()?;
        Ok(snapshot
            .pixel(x, y)
            .map(|[r, g, b, a]| Color::from_rgba8(r, g, b, f64::from(a) / 255.0)))
    }

    /// ARGB quads for a device rectangle; see [`Bitmap::get_argb_pixels`].
    pub fn argb_pixels(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        just_alpha: bool,
        premultiplied: bool,
    ) -> Result<Vec<u8>, DrawError> {
        let snapshot = self.dc.snapshot()?;
        Ok(snapshot.get_argb_pixels(x, y, width, height, just_alpha, premultiplied))
    }

    /// Writes ARGB quads into a device rectangle; see [`Bitmap::set_argb_pixels`].
    #[allow(clippy::too_many_arguments)]
    pub fn set_argb_pixels(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        argb: &[u8],
        just_alpha: bool,
        premultiplied: bool,
    ) -> Result<(), DrawError> {
        let mut snapshot = self.dc.snapshot()?;
        snapshot.set_argb_pixels(x, y, width, height, argb, just_alpha, premultiplied);
        self.dc.replace_pixels(&snapshot)
    }

    pub fn save_file(&mut self, path: &Path, format: ImageFormat, quality: u8) -> Result<(), DrawError> {
        self.dc.snapshot()?.save_file(path, format, quality)
    }
}
