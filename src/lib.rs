//! Device-independent 2D vector drawing on top of Cairo.
//!
//! [`geometry`] holds the pure parts (affine transforms, the elliptical-arc
//! approximator and the path model); [`draw`] holds everything that touches
//! pixels (styles, bitmaps, regions, text and the drawing context); [`config`]
//! loads the default drawing state from TOML.

pub mod config;
pub mod draw;
pub mod geometry;
pub mod util;

pub use config::Config;
pub use draw::{
    Bitmap, BitmapDc, Brush, Color, DrawError, DrawingContext, FillRule, Font, Pen, Region,
};
pub use geometry::{AffineTransform, PathError, PathModel, Point};
