//! Drawing contexts, style resources and raster-backed regions (Cairo-based).
//!
//! This module defines everything that touches pixels:
//! - [`Color`] and [`ColorDatabase`]: RGBA colors and name lookup
//! - [`Pen`], [`Brush`], [`Font`] and their find-or-create registries
//! - [`Stipple`] and [`Gradient`]: fill and stroke sources
//! - [`Bitmap`] / [`PendingBitmap`]: pixel stores and asynchronous loading
//! - [`Region`]: boolean areas composed on monochrome surfaces
//! - [`DrawingContext`] and [`BitmapDc`]: the double-buffered drawing surface

/// Declares a closed set of keyword values.
///
/// Generates serde/schemars derives with the keyword as the serialized name,
/// an `ALL` table, `as_str`, `Display`, and a `FromStr` that reports
/// [`StyleError::InvalidValue`] naming the field.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $kw:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            schemars::JsonSchema
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $kw)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $kw),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::draw::StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($kw => Ok($name::$variant),)+
                    other => Err(crate::draw::StyleError::invalid($field, other)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod bitmap;
pub mod bitmap_dc;
pub mod brush;
pub mod color;
pub mod context;
pub mod error;
pub mod font;
pub mod gradient;
pub mod pen;
pub mod region;
pub mod stipple;
pub mod text;

// Re-export commonly used types at module level
pub use bitmap::{Bitmap, BitmapStyle, ImageFormat, PendingBitmap};
pub use bitmap_dc::BitmapDc;
pub use brush::{Brush, BrushList, BrushStyle};
pub use color::{BLACK, BLUE, Color, ColorDatabase, ColorResolver, GREEN, RED, TRANSPARENT, WHITE};
pub use context::{DEFAULT_SIZE, DrawingContext, SmoothingMode, TextMode, Transformation};
pub use error::{DrawError, StyleError};
pub use font::{Font, FontFamily, FontList, FontSmoothing, FontStyle, FontWeight};
pub use gradient::{ColorStop, Gradient, LinearGradient, RadialGradient};
pub use pen::{Cap, Join, Pen, PenList, PenStyle};
pub use region::{FillRule, Region};
pub use stipple::{Hatch, Stipple};
pub use text::{TextExtent, remove_ligatures};
