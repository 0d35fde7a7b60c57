//! In-memory bitmaps, file codecs and asynchronous loading.
//!
//! Pixels are stored as straight (non-premultiplied) RGBA bytes. Conversion to and
//! from Cairo's premultiplied native-endian ARGB32 happens at the surface boundary.

use super::error::DrawError;
use futures::channel::oneshot;
use log::{debug, info, warn};
use std::fs::File;
use std::future::Future;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;

keyword_enum! {
    /// File formats accepted by [`Bitmap::save_file`].
    pub enum ImageFormat ("image format") {
        Png => "png",
        Jpeg => "jpeg",
        Bmp => "bmp",
        Xpm => "xpm",
        Xbm => "xbm",
    }
}

impl ImageFormat {
    /// Guesses the format from a file extension (`jpg` is accepted for JPEG).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" => Some(ImageFormat::Jpeg),
            other => other.parse().ok(),
        }
    }
}

keyword_enum! {
    /// How a monochrome source is recolored by `draw_bitmap`.
    #[derive(Default)]
    pub enum BitmapStyle ("bitmap style") {
        #[default]
        Solid => "solid",
        Opaque => "opaque",
        Xor => "xor",
        Transparent => "transparent",
    }
}

/// A width × height grid of straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    monochrome: bool,
    alpha: bool,
    ok: bool,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Blank (fully transparent) bitmap. `is_ok` stays false until pixels are loaded.
    pub fn new(width: u32, height: u32, monochrome: bool, alpha: bool) -> Self {
        Self {
            width,
            height,
            monochrome,
            alpha,
            ok: false,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Bitmap over existing RGBA bytes; the buffer length must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        let mut bitmap = Self {
            width,
            height,
            monochrome: false,
            alpha: false,
            ok: true,
            pixels,
        };
        bitmap.alpha = bitmap.has_alpha_channel();
        Some(bitmap)
    }

    /// Decodes PNG, JPEG or GIF bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DrawError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw()).ok_or(DrawError::BitmapNotReady)
    }

    fn open(path: &Path) -> Result<Self, DrawError> {
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw()).ok_or(DrawError::BitmapNotReady)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Monochrome flag given at construction.
    pub fn monochrome(&self) -> bool {
        self.monochrome
    }

    /// Alpha flag given at construction (or detected on load).
    pub fn alpha(&self) -> bool {
        self.alpha
    }

    /// True once pixel data was loaded successfully.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// `[r, g, b, a]` at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }

    // ---------------------------------------------------------------------
    // Content classification
    // ---------------------------------------------------------------------

    /// Any pixel with alpha below 255.
    pub fn has_alpha_channel(&self) -> bool {
        self.pixels.chunks_exact(4).any(|p| p[3] < 255)
    }

    /// Any pixel whose red, green and blue differ.
    pub fn is_color(&self) -> bool {
        self.pixels
            .chunks_exact(4)
            .any(|p| !(p[0] == p[1] && p[1] == p[2]))
    }

    /// Every byte (alpha included) is either 0 or 255.
    pub fn is_monochrome(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0 || b == 255)
    }

    /// 32 for color content, 1 otherwise.
    pub fn depth(&self) -> u32 {
        if self.is_color() { 32 } else { 1 }
    }

    /// Opaque grayscale bitmap whose gray level is the inverse of this bitmap's alpha.
    pub fn loaded_mask(&self) -> Bitmap {
        let mut mask = Bitmap::new(self.width, self.height, false, false);
        for (dst, src) in mask
            .pixels
            .chunks_exact_mut(4)
            .zip(self.pixels.chunks_exact(4))
        {
            let v = 255 - src[3];
            dst.copy_from_slice(&[v, v, v, 255]);
        }
        mask.ok = true;
        mask
    }

    // ---------------------------------------------------------------------
    // ARGB access
    // ---------------------------------------------------------------------

    /// Reads a rectangle as ARGB byte quads, row by row.
    ///
    /// With `just_alpha` only the alpha byte of each quad is filled in. With
    /// `premultiplied` the color bytes are scaled by alpha.
    pub fn get_argb_pixels(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        just_alpha: bool,
        premultiplied: bool,
    ) -> Vec<u8> {
        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for row in y..y + height {
            for col in x..x + width {
                let [r, g, b, a] = self.pixel(col, row).unwrap_or([0; 4]);
                if just_alpha {
                    out.extend_from_slice(&[a, 0, 0, 0]);
                } else if premultiplied {
                    out.extend_from_slice(&[a, premultiply(r, a), premultiply(g, a), premultiply(b, a)]);
                } else {
                    out.extend_from_slice(&[a, r, g, b]);
                }
            }
        }
        out
    }

    /// Writes ARGB byte quads into a rectangle, row by row.
    ///
    /// With `just_alpha` only the alpha bytes are used: a bitmap with an alpha
    /// channel takes them as alpha, one without becomes the inverse grayscale.
    /// With `premultiplied` the color bytes are capped at alpha and un-multiplied.
    pub fn set_argb_pixels(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        argb: &[u8],
        just_alpha: bool,
        premultiplied: bool,
    ) {
        let mut quads = argb.chunks_exact(4);
        for row in y..y + height {
            for col in x..x + width {
                let Some(q) = quads.next() else { return };
                let Some(i) = self.index(col, row) else {
                    continue;
                };
                let px = &mut self.pixels[i..i + 4];
                let a = q[0];
                if just_alpha {
                    if self.alpha {
                        px[3] = a;
                    } else {
                        let v = 255 - a;
                        px.copy_from_slice(&[v, v, v, 255]);
                    }
                } else if premultiplied {
                    px.copy_from_slice(&[
                        unpremultiply(q[1].min(a), a),
                        unpremultiply(q[2].min(a), a),
                        unpremultiply(q[3].min(a), a),
                        a,
                    ]);
                } else {
                    px.copy_from_slice(&[q[1], q[2], q[3], a]);
                }
            }
        }
        self.ok = true;
    }

    // ---------------------------------------------------------------------
    // Cairo surfaces
    // ---------------------------------------------------------------------

    /// Copies the pixels into a new premultiplied ARGB32 surface.
    pub fn to_surface(&self) -> Result<cairo::ImageSurface, DrawError> {
        let mut surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, self.width as i32, self.height as i32)?;
        let stride = surface.stride() as usize;
        {
            let mut data = surface.data()?;
            for (y, row) in self.pixels.chunks_exact(self.width.max(1) as usize * 4).enumerate() {
                for (x, p) in row.chunks_exact(4).enumerate() {
                    let a = p[3];
                    let word = (u32::from(a) << 24)
                        | (u32::from(premultiply(p[0], a)) << 16)
                        | (u32::from(premultiply(p[1], a)) << 8)
                        | u32::from(premultiply(p[2], a));
                    let offset = y * stride + x * 4;
                    data[offset..offset + 4].copy_from_slice(&word.to_ne_bytes());
                }
            }
        }
        Ok(surface)
    }

    /// Reads an ARGB32 surface back into straight RGBA.
    ///
    /// No context may still reference the surface.
    pub fn from_surface(surface: &mut cairo::ImageSurface) -> Result<Self, DrawError> {
        surface.flush();
        let width = surface.width().max(0) as u32;
        let height = surface.height().max(0) as u32;
        let stride = surface.stride() as usize;
        let data = surface.data()?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let offset = y * stride + x * 4;
                let word = u32::from_ne_bytes([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]);
                let a = (word >> 24) as u8;
                pixels.extend_from_slice(&[
                    unpremultiply((word >> 16) as u8, a),
                    unpremultiply((word >> 8) as u8, a),
                    unpremultiply(word as u8, a),
                    a,
                ]);
            }
        }
        drop(data);
        let mut bitmap = Self {
            width,
            height,
            monochrome: false,
            alpha: false,
            ok: true,
            pixels,
        };
        bitmap.alpha = bitmap.has_alpha_channel();
        Ok(bitmap)
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Starts loading an image file on a background thread.
    pub fn load_file(path: impl Into<PathBuf>) -> PendingBitmap {
        let path = path.into();
        let (tx, rx) = oneshot::channel();
        thread::spawn(move || {
            debug!("Loading bitmap from {}", path.display());
            let result = Self::open(&path).map_err(|e| {
                warn!("Failed to load bitmap {}: {}", path.display(), e);
                e.to_string()
            });
            let _ = tx.send(result);
        });
        PendingBitmap::new(rx)
    }

    /// Starts loading a `file://` URL; other schemes fail the pending load.
    pub fn load_url(url: &str) -> PendingBitmap {
        let path = url::Url::parse(url)
            .map_err(|e| format!("Invalid URL '{}': {}", url, e))
            .and_then(|u| {
                u.to_file_path()
                    .map_err(|_| format!("Cannot convert URL to path: {}", url))
            });
        match path {
            Ok(path) => Self::load_file(path),
            Err(msg) => {
                warn!("{}", msg);
                PendingBitmap::failed(msg)
            }
        }
    }

    /// Encodes the bitmap to `path`.
    ///
    /// PNG goes through Cairo; JPEG through the `image` encoder at `quality`
    /// (1-100), composited over white. Other formats fail with
    /// [`DrawError::UnsupportedFormat`].
    pub fn save_file(&self, path: &Path, format: ImageFormat, quality: u8) -> Result<(), DrawError> {
        match format {
            ImageFormat::Png => {
                let surface = self.to_surface()?;
                let mut file = File::create(path)?;
                surface.write_to_png(&mut file)?;
            }
            ImageFormat::Jpeg => {
                let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
                for p in self.pixels.chunks_exact(4) {
                    let a = u32::from(p[3]);
                    for c in &p[..3] {
                        rgb.push(((u32::from(*c) * a + 255 * (255 - a)) / 255) as u8);
                    }
                }
                let image = image::RgbImage::from_raw(self.width, self.height, rgb)
                    .ok_or(DrawError::BitmapNotReady)?;
                let writer = BufWriter::new(File::create(path)?);
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
                encoder.encode_image(&image)?;
            }
            other => return Err(DrawError::UnsupportedFormat(other.to_string())),
        }
        info!("Saved {} bitmap to {}", format, path.display());
        Ok(())
    }
}

pub(crate) fn premultiply(c: u8, a: u8) -> u8 {
    ((u32::from(c) * u32::from(a) + 127) / 255) as u8
}

pub(crate) fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        0
    } else {
        ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
    }
}

type LoadResult = Result<Bitmap, String>;

/// A bitmap load in flight.
///
/// Resolves exactly once. Poll it with [`try_ready`](Self::try_ready), or `.await`
/// it. A failed load never becomes ready.
#[derive(Debug)]
pub struct PendingBitmap {
    rx: Option<oneshot::Receiver<LoadResult>>,
    outcome: Option<LoadResult>,
}

impl PendingBitmap {
    fn new(rx: oneshot::Receiver<LoadResult>) -> Self {
        Self {
            rx: Some(rx),
            outcome: None,
        }
    }

    fn failed(msg: String) -> Self {
        Self {
            rx: None,
            outcome: Some(Err(msg)),
        }
    }

    fn poll_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(rx) = self.rx.as_mut() {
            match rx.try_recv() {
                Ok(Some(result)) => self.outcome = Some(result),
                Ok(None) => return,
                Err(oneshot::Canceled) => {
                    self.outcome = Some(Err("loader exited before finishing".to_string()))
                }
            }
            self.rx = None;
        }
    }

    /// The loaded bitmap, once available.
    pub fn try_ready(&mut self) -> Option<&Bitmap> {
        self.poll_outcome();
        self.outcome.as_ref()?.as_ref().ok()
    }

    pub fn is_ready(&mut self) -> bool {
        self.try_ready().is_some()
    }

    /// The failure message, if the load finished unsuccessfully.
    pub fn failure(&mut self) -> Option<&str> {
        self.poll_outcome();
        self.outcome.as_ref()?.as_ref().err().map(String::as_str)
    }
}

impl Future for PendingBitmap {
    type Output = Result<Bitmap, DrawError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = this.outcome.take() {
            return Poll::Ready(outcome.map_err(DrawError::Load));
        }
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(Err(DrawError::BitmapNotReady));
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(result) => {
                this.rx = None;
                Poll::Ready(match result {
                    Ok(loaded) => loaded.map_err(DrawError::Load),
                    Err(oneshot::Canceled) => {
                        Err(DrawError::Load("loader exited before finishing".to_string()))
                    }
                })
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests;
