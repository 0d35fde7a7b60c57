//! Font descriptors and the font registry.

use std::rc::Rc;

keyword_enum! {
    /// Generic font family; an explicit face name overrides it.
    #[derive(Default)]
    pub enum FontFamily ("font family") {
        #[default]
        Default => "default",
        Decorative => "decorative",
        Roman => "roman",
        Script => "script",
        Swiss => "swiss",
        Modern => "modern",
        Symbol => "symbol",
        System => "system",
    }
}

impl FontFamily {
    /// Fontconfig alias used for this family.
    pub fn pango_family(self) -> &'static str {
        match self {
            FontFamily::Default | FontFamily::Swiss | FontFamily::System => "Sans",
            FontFamily::Decorative => "Fantasy",
            FontFamily::Roman => "Serif",
            FontFamily::Script => "Cursive",
            FontFamily::Modern => "Monospace",
            FontFamily::Symbol => "Symbol",
        }
    }
}

keyword_enum! {
    #[derive(Default)]
    pub enum FontStyle ("font style") {
        #[default]
        Normal => "normal",
        Slant => "slant",
        Italic => "italic",
        Oblique => "oblique",
    }
}

keyword_enum! {
    #[derive(Default)]
    pub enum FontWeight ("font weight") {
        #[default]
        Normal => "normal",
        Light => "light",
        Bold => "bold",
    }
}

keyword_enum! {
    #[derive(Default)]
    pub enum FontSmoothing ("font smoothing") {
        #[default]
        Default => "default",
        PartlySmoothed => "partly-smoothed",
        Smoothed => "smoothed",
        Unsmoothed => "unsmoothed",
    }
}

impl FontSmoothing {
    pub fn to_cairo(self) -> cairo::Antialias {
        match self {
            FontSmoothing::Default => cairo::Antialias::Default,
            FontSmoothing::PartlySmoothed => cairo::Antialias::Gray,
            FontSmoothing::Smoothed => cairo::Antialias::Subpixel,
            FontSmoothing::Unsmoothed => cairo::Antialias::None,
        }
    }
}

/// Font request for text rendering.
///
/// Describes which font to use: size, family or explicit face name, style, weight
/// and decoration. `pixels` makes `size` a pixel size instead of points; text is
/// laid out at 72 dpi, so both come out the same on an unscaled context.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    size: f64,
    family: FontFamily,
    face: Option<String>,
    style: FontStyle,
    weight: FontWeight,
    underline: bool,
    smoothing: FontSmoothing,
    pixels: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self::new(18.0, FontFamily::Default, FontStyle::Normal, FontWeight::Normal)
    }
}

impl Font {
    pub fn new(size: f64, family: FontFamily, style: FontStyle, weight: FontWeight) -> Self {
        Self {
            size,
            family,
            face: None,
            style,
            weight,
            underline: false,
            smoothing: FontSmoothing::Default,
            pixels: false,
        }
    }

    /// Uses the named installed face instead of the family alias.
    pub fn with_face(mut self, face: impl Into<String>) -> Self {
        self.face = Some(face.into());
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_smoothing(mut self, smoothing: FontSmoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_pixels(mut self, pixels: bool) -> Self {
        self.pixels = pixels;
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn family(&self) -> FontFamily {
        self.family
    }

    pub fn face(&self) -> Option<&str> {
        self.face.as_deref()
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    pub fn underline(&self) -> bool {
        self.underline
    }

    pub fn smoothing(&self) -> FontSmoothing {
        self.smoothing
    }

    pub fn pixels(&self) -> bool {
        self.pixels
    }

    /// Converts this font to a Pango font description string.
    ///
    /// Format: "Family Style Weight Size"
    /// Example: "Sans Bold 18" or "Monospace Italic 24px"
    pub fn to_pango_string(&self) -> String {
        let family = self.face.as_deref().unwrap_or(self.family.pango_family());
        let mut parts = vec![family.to_string()];

        // `slant` has no Pango counterpart
        match self.style {
            FontStyle::Normal => {}
            FontStyle::Slant => parts.push("Italic".to_string()),
            other => parts.push(capitalize_first(other.as_str())),
        }

        if self.weight != FontWeight::Normal {
            parts.push(capitalize_first(self.weight.as_str()));
        }

        let size = self.size.round() as i32;
        parts.push(if self.pixels {
            format!("{}px", size)
        } else {
            format!("{}", size)
        });

        parts.join(" ")
    }

    pub(crate) fn description(&self) -> pango::FontDescription {
        pango::FontDescription::from_string(&self.to_pango_string())
    }
}

/// Capitalizes the first letter of a string.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Find-or-create registry of shared fonts.
#[derive(Debug, Default)]
pub struct FontList {
    fonts: Vec<Rc<Font>>,
}

impl FontList {
    pub fn new() -> Self {
        Self::default()
    }

    /// `underline`, `smoothing` and `pixels` left as `None` match any stored value.
    pub fn find_or_create(
        &mut self,
        size: f64,
        family: FontFamily,
        style: FontStyle,
        weight: FontWeight,
        underline: Option<bool>,
        smoothing: Option<FontSmoothing>,
        pixels: Option<bool>,
    ) -> Rc<Font> {
        let found = self.fonts.iter().find(|f| {
            f.size == size
                && f.family == family
                && f.style == style
                && f.weight == weight
                && f.face.is_none()
                && underline.is_none_or(|u| f.underline == u)
                && smoothing.is_none_or(|s| f.smoothing == s)
                && pixels.is_none_or(|p| f.pixels == p)
        });
        if let Some(font) = found {
            return Rc::clone(font);
        }

        let font = Rc::new(
            Font::new(size, family, style, weight)
                .with_underline(underline.unwrap_or(false))
                .with_smoothing(smoothing.unwrap_or_default())
                .with_pixels(pixels.unwrap_or(false)),
        );
        self.fonts.push(Rc::clone(&font));
        font
    }

    /// Returns the stored font equal to `font`, storing it first if needed.
    pub fn intern(&mut self, font: Font) -> Rc<Font> {
        if let Some(found) = self.fonts.iter().find(|f| f.as_ref() == &font) {
            return Rc::clone(found);
        }
        let font = Rc::new(font);
        self.fonts.push(Rc::clone(&font));
        font
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pango_string_default() {
        let font = Font::default();
        assert_eq!(font.to_pango_string(), "Sans 18");
    }

    #[test]
    fn test_pango_string_italic() {
        let font = Font::new(24.0, FontFamily::Modern, FontStyle::Slant, FontWeight::Normal);
        assert_eq!(font.to_pango_string(), "Monospace Italic 24");
    }

    #[test]
    fn test_pango_string_custom() {
        let font = Font::new(16.0, FontFamily::Roman, FontStyle::Normal, FontWeight::Light)
            .with_face("JetBrains Mono")
            .with_pixels(true);
        assert_eq!(font.to_pango_string(), "JetBrains Mono Light 16px");
    }

    #[test]
    fn test_unknown_weight_is_rejected() {
        let err = "heavy".parse::<FontWeight>().unwrap_err();
        assert_eq!(err.to_string(), "invalid font weight: heavy");
    }

    #[test]
    fn test_registry_wildcards() {
        let mut list = FontList::new();
        let a = list.find_or_create(
            12.0,
            FontFamily::Swiss,
            FontStyle::Normal,
            FontWeight::Bold,
            Some(true),
            None,
            None,
        );
        let b = list.find_or_create(
            12.0,
            FontFamily::Swiss,
            FontStyle::Normal,
            FontWeight::Bold,
            None,
            None,
            None,
        );
        assert!(Rc::ptr_eq(&a, &b));
        assert!(b.underline());

        let c = list.find_or_create(
            12.0,
            FontFamily::Swiss,
            FontStyle::Normal,
            FontWeight::Bold,
            Some(false),
            None,
            None,
        );
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_intern_shares_faced_fonts() {
        let mut list = FontList::new();
        let face = || Font::default().with_face("DejaVu Serif");
        let a = list.intern(face());
        let b = list.intern(face());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(list.len(), 1);

        let plain = list.find_or_create(
            18.0,
            FontFamily::Default,
            FontStyle::Normal,
            FontWeight::Normal,
            None,
            None,
            None,
        );
        assert!(plain.face().is_none());
        assert_eq!(list.len(), 2);
    }
}
