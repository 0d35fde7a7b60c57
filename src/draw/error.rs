//! Error types for styling and drawing operations.

use crate::geometry::PathError;
use thiserror::Error;

/// A categorical style value outside its enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl StyleError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        StyleError::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

/// Errors raised by drawing contexts, regions and bitmaps.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("both regions must belong to the same drawing context, or to none")]
    RegionMismatch,

    #[error("a region must be associated with a drawing context for this query")]
    RegionWithoutContext,

    #[error("mask must match the source size: source {src_width}x{src_height}, mask {mask_width}x{mask_height}")]
    MaskSizeMismatch {
        src_width: u32,
        src_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("source and destination rectangles overlap")]
    OverlappingCopy,

    #[error("text offset {offset} is past the end of a {len}-character string")]
    InvalidOffset { offset: usize, len: usize },

    #[error("alpha {0} is outside 0.0-1.0")]
    InvalidAlpha(f64),

    #[error("saving {0} images is not supported")]
    UnsupportedFormat(String),

    #[error("bitmap has not finished loading")]
    BitmapNotReady,

    #[error("bitmap load failed: {0}")]
    Load(String),
}
