//! RGBA color type, predefined colors and name resolution.

use std::collections::HashMap;
use std::fmt;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum). The 0-255
/// accessors and [`Color::to_rgba_string`] expose the integer exchange format.
///
/// # Examples
///
/// ```
/// use vecdraw::draw::Color;
/// let orange = Color::from_rgb8(255, 128, 0);
/// assert_eq!(orange.red(), 255);
/// assert_eq!(orange.to_rgba_string(), "rgba(255,128,0,1)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 0-255 channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 1.0)
    }

    /// Color from 0-255 channels plus a 0.0-1.0 alpha.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a,
        }
    }

    pub fn red(&self) -> u8 {
        channel_to_u8(self.r)
    }

    pub fn green(&self) -> u8 {
        channel_to_u8(self.g)
    }

    pub fn blue(&self) -> u8 {
        channel_to_u8(self.b)
    }

    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// True when every channel lies within its valid range.
    pub fn is_ok(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    /// `rgba(r,g,b,a)` with integer channels and a real alpha.
    pub fn to_rgba_string(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.red(),
            self.green(),
            self.blue(),
            self.a
        )
    }

    /// True for pure black, ignoring alpha.
    pub fn is_black(&self) -> bool {
        self.red() == 0 && self.green() == 0 && self.blue() == 0
    }

    pub(crate) fn set_source(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rgba_string())
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color (R=1.0, G=0.0, B=0.0)
pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Predefined green color (R=0.0, G=1.0, B=0.0)
pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Predefined blue color (R=0.0, G=0.0, B=1.0)
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

/// Predefined white color (R=1.0, G=1.0, B=1.0)
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Predefined black color (R=0.0, G=0.0, B=0.0)
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Fully transparent black.
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

// ============================================================================
// Name Resolution
// ============================================================================

/// Lookup service from color names to RGB values.
pub trait ColorResolver {
    fn find_color(&self, name: &str) -> Option<Color>;
}

/// Built-in color names plus any names registered at runtime.
///
/// Lookups ignore case and spaces, so `"Dark Green"` and `"darkgreen"` match.
#[derive(Debug, Default, Clone)]
pub struct ColorDatabase {
    custom: HashMap<String, Color>,
}

impl ColorDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a name; registered names shadow built-in ones.
    pub fn insert(&mut self, name: &str, color: Color) {
        self.custom.insert(crate::util::normalize_color_name(name), color);
    }
}

impl ColorResolver for ColorDatabase {
    fn find_color(&self, name: &str) -> Option<Color> {
        self.custom
            .get(&crate::util::normalize_color_name(name))
            .copied()
            .or_else(|| crate::util::name_to_color(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_string_uses_integer_channels() {
        let c = Color::from_rgba8(12, 34, 56, 0.5);
        assert_eq!(c.to_rgba_string(), "rgba(12,34,56,0.5)");
        assert_eq!(WHITE.to_rgba_string(), "rgba(255,255,255,1)");
    }

    #[test]
    fn channel_accessors_round_trip_through_u8() {
        let c = Color::from_rgb8(1, 128, 254);
        assert_eq!((c.red(), c.green(), c.blue()), (1, 128, 254));
    }

    #[test]
    fn validity_checks_every_channel() {
        assert!(BLACK.is_ok());
        assert!(!Color::new(1.2, 0.0, 0.0, 1.0).is_ok());
        assert!(!Color::new(0.0, 0.0, 0.0, -0.1).is_ok());
    }

    #[test]
    fn database_prefers_registered_names() {
        let mut db = ColorDatabase::new();
        assert_eq!(db.find_color("Dark Green"), Some(Color::from_rgb8(0, 100, 0)));
        db.insert("Brand Blue", Color::from_rgb8(10, 20, 200));
        assert_eq!(db.find_color("brandblue"), Some(Color::from_rgb8(10, 20, 200)));
        assert!(db.find_color("no such color").is_none());
    }
}
