//! Image preparation, pure Rust and in memory.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Compress** | scale-to-fit + Lanczos3 + re-encode in the source format |
//! | **Thumbnail** | centered square `crop_imm` + Lanczos3 → JPEG data URL |
//!
//! The module is split into:
//! - **Media types**: the upload allow-list
//! - **Assets**: input and derived values ([`ImageAsset`], [`CompressionResult`], [`ThumbnailAsset`])
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

mod asset;
pub mod backend;
mod calculations;
mod media_type;
pub mod operations;
mod params;
pub mod rust_backend;

pub use asset::{CompressionResult, ImageAsset, ThumbnailAsset};
pub use backend::{BatchItemError, Dimensions, ImageBackend, ImagingError};
pub use calculations::{
    CropRect, calculate_fit_dimensions, calculate_square_crop, compression_ratio,
};
pub use media_type::MediaType;
pub use operations::{
    BatchOutcome, BatchProgress, CompressOptions, DEFAULT_THUMBNAIL_SIZE, compress_image,
    compress_images, generate_thumbnail, is_valid_image_type, needs_compression,
};
pub use params::Quality;
pub use rust_backend::RustBackend;
