//! Text layout and measurement through Pango.
//!
//! Layouts are created at 72 dpi so font sizes map one-to-one onto user units.

use super::error::DrawError;
use super::font::Font;

/// Resolution used for every layout.
pub const TEXT_DPI: f64 = 72.0;

/// Expands typographic ligatures into their plain letters.
pub fn remove_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB00}' => out.push_str("ff"),
            '\u{0133}' => out.push_str("ij"),
            '\u{00E6}' => out.push_str("ae"),
            '\u{00C6}' => out.push_str("AE"),
            '\u{0153}' => out.push_str("oe"),
            '\u{0152}' => out.push_str("OE"),
            '\u{1D6B}' => out.push_str("ue"),
            '\u{FB06}' => out.push_str("st"),
            other => out.push(other),
        }
    }
    out
}

/// Drops the first `offset` characters, then optionally expands ligatures.
pub(crate) fn prepare(text: &str, offset: usize, combine: bool) -> Result<String, DrawError> {
    let len = text.chars().count();
    if offset > len {
        return Err(DrawError::InvalidOffset { offset, len });
    }
    let rest: String = text.chars().skip(offset).collect();
    Ok(if combine { rest } else { remove_ligatures(&rest) })
}

/// Size of a laid-out string in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
    /// Distance from the baseline to the bottom of the line.
    pub descent: f64,
    /// Space between the top of the line and the top of the ink.
    pub space: f64,
}

/// A layout for `text` in `font` bound to `cr`'s current transform.
pub(crate) fn layout(cr: &cairo::Context, font: &Font, text: &str) -> Result<pango::Layout, DrawError> {
    let context = pangocairo::functions::create_context(cr);
    pangocairo::functions::context_set_resolution(&context, TEXT_DPI);

    let mut options = cairo::FontOptions::new()?;
    options.set_antialias(font.smoothing().to_cairo());
    pangocairo::functions::context_set_font_options(&context, Some(&options));

    let layout = pango::Layout::new(&context);
    layout.set_font_description(Some(&font.description()));
    layout.set_text(text);
    Ok(layout)
}

pub(crate) fn extent_of(layout: &pango::Layout) -> TextExtent {
    let (ink, logical) = layout.extents();
    let scale = f64::from(pango::SCALE);
    let height = f64::from(logical.height()) / scale;
    let baseline = f64::from(layout.baseline()) / scale;
    TextExtent {
        width: f64::from(logical.width()) / scale,
        height,
        descent: height - baseline,
        space: (f64::from(ink.y() - logical.y()) / scale).max(0.0),
    }
}

/// True when every character of `text` has a glyph in `font`.
pub(crate) fn glyphs_exist(cr: &cairo::Context, font: &Font, text: &str) -> Result<bool, DrawError> {
    let layout = layout(cr, font, text)?;
    Ok(layout.unknown_glyphs_count() == 0)
}
