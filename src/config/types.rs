//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::draw::{
    BrushStyle, Cap, DEFAULT_SIZE, FontFamily, FontSmoothing, FontStyle, FontWeight, Join,
    PenStyle, TextMode,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SurfaceConfig {
    /// Surface width in pixels (valid range: 1 - 16384)
    #[serde(default = "default_size")]
    pub width: u32,

    /// Surface height in pixels (valid range: 1 - 16384)
    #[serde(default = "default_size")]
    pub height: u32,

    /// Color painted by `clear`
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            background: default_background(),
        }
    }
}

/// Initial pen.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PenConfig {
    /// Stroke color - a color name or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_pen_color")]
    pub color: ColorSpec,

    /// Stroke width in user units (valid range: 0.0 - 255.0)
    #[serde(default = "default_pen_width")]
    pub width: f64,

    /// Stroke style, e.g. "solid", "dot", "long-dash", "transparent"
    #[serde(default)]
    pub style: PenStyle,

    /// Line cap: "round", "projecting" or "butt"
    #[serde(default)]
    pub cap: Cap,

    /// Line join: "round", "bevel" or "miter"
    #[serde(default)]
    pub join: Join,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            color: default_pen_color(),
            width: default_pen_width(),
            style: PenStyle::default(),
            cap: Cap::default(),
            join: Join::default(),
        }
    }
}

/// Initial brush.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BrushConfig {
    #[serde(default = "default_brush_color")]
    pub color: ColorSpec,

    /// Fill style, e.g. "solid", "transparent", "hilite", "cross-hatch"
    #[serde(default)]
    pub style: BrushStyle,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: default_brush_color(),
            style: BrushStyle::default(),
        }
    }
}

/// Initial font.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FontConfig {
    /// Font size in points at 72 dpi (valid range: 1.0 - 1024.0)
    #[serde(default = "default_font_size")]
    pub size: f64,

    /// Generic family: "default", "decorative", "roman", "script", "swiss",
    /// "modern", "symbol" or "system"
    #[serde(default)]
    pub family: FontFamily,

    /// Explicit face name (e.g. "JetBrains Mono"); overrides the family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,

    #[serde(default)]
    pub style: FontStyle,

    #[serde(default)]
    pub weight: FontWeight,

    #[serde(default)]
    pub underline: bool,

    #[serde(default)]
    pub smoothing: FontSmoothing,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: default_font_size(),
            family: FontFamily::default(),
            face: None,
            style: FontStyle::default(),
            weight: FontWeight::default(),
            underline: false,
            smoothing: FontSmoothing::default(),
        }
    }
}

/// Text colors and background mode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextConfig {
    /// "solid" paints the background box behind text, "transparent" does not
    #[serde(default)]
    pub mode: TextMode,

    #[serde(default = "default_text_foreground")]
    pub foreground: ColorSpec,

    #[serde(default = "default_text_background")]
    pub background: ColorSpec,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            mode: TextMode::default(),
            foreground: default_text_foreground(),
            background: default_text_background(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_background() -> ColorSpec {
    ColorSpec::named("white")
}

fn default_pen_color() -> ColorSpec {
    ColorSpec::named("black")
}

fn default_pen_width() -> f64 {
    1.0
}

fn default_brush_color() -> ColorSpec {
    ColorSpec::named("white")
}

fn default_font_size() -> f64 {
    18.0
}

fn default_text_foreground() -> ColorSpec {
    ColorSpec::named("black")
}

fn default_text_background() -> ColorSpec {
    ColorSpec::named("white")
}
