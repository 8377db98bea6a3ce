//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides target sizes and crops) and the [`backend`](super::backend)
//! (which does the pixel work). Keeping them plain data lets unit tests drive
//! the operations against a recording mock.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding factor in `(0, 1]`, default 0.8.
//! - [`ResizeParams`]: Target dimensions, output format, quality.
//! - [`ThumbnailParams`]: Source crop rectangle, square output side, quality.

use super::calculations::CropRect;
use super::media_type::MediaType;

/// Lossy encoding quality as a factor in `(0, 1]`.
///
/// Values outside that range are a caller error. They are not rejected; the
/// conversion to an encoder percentage clamps them into `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(pub f32);

impl Quality {
    pub fn new(factor: f32) -> Self {
        Self(factor)
    }

    pub fn factor(self) -> f32 {
        self.0
    }

    /// Encoder quality on the 1–100 scale used by the JPEG encoder.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.8)
    }
}

/// Parameters for a resize + re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub format: MediaType,
    pub quality: Quality,
}

/// Parameters for a square thumbnail: crop `crop` out of the source, scale it
/// to `size × size`, encode as JPEG.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub crop: CropRect,
    pub size: u32,
    pub quality: Quality,
}
