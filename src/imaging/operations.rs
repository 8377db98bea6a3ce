//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take
//! options, compute parameters, call the backend, and package the result.

use super::asset::{CompressionResult, ImageAsset, ThumbnailAsset};
use super::backend::{BatchItemError, Dimensions, ImageBackend, ImagingError};
use super::calculations::{calculate_fit_dimensions, calculate_square_crop, megabytes_to_bytes};
use super::media_type::MediaType;
use super::params::{Quality, ResizeParams, ThumbnailParams};
use crate::config::CompressionConfig;
use log::{debug, warn};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Default square thumbnail side in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;

/// Thumbnails are always JPEG at this quality, whatever the source type.
pub const THUMBNAIL_QUALITY: Quality = Quality(0.8);

/// How aggressively to compress.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressOptions {
    /// Files above this many megabytes need compression.
    pub max_size_mb: f64,
    /// Bound on the longer side after resizing.
    pub max_width_or_height: u32,
    pub quality: Quality,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::from(&CompressionConfig::default())
    }
}

impl From<&CompressionConfig> for CompressOptions {
    fn from(config: &CompressionConfig) -> Self {
        Self {
            max_size_mb: config.max_size_mb,
            max_width_or_height: config.max_width_or_height,
            quality: Quality::new(config.quality),
        }
    }
}

/// True when the asset is larger than `max_size_mb` megabytes.
pub fn needs_compression(asset: &ImageAsset, max_size_mb: f64) -> bool {
    asset.size() as f64 > megabytes_to_bytes(max_size_mb)
}

/// True when the declared media type is JPEG, PNG, or WebP (any casing).
pub fn is_valid_image_type(asset: &ImageAsset) -> bool {
    asset.parsed_media_type().is_some()
}

fn require_media_type(asset: &ImageAsset) -> Result<MediaType> {
    asset
        .parsed_media_type()
        .ok_or_else(|| ImagingError::UnsupportedType(asset.media_type.clone()))
}

/// Resize to fit `options.max_width_or_height` and re-encode in the asset's
/// own media type.
///
/// Never upscales. The returned asset keeps the original name and declared
/// media type and carries its new dimensions.
pub fn compress_image(
    backend: &impl ImageBackend,
    asset: &ImageAsset,
    options: &CompressOptions,
) -> Result<CompressionResult> {
    let format = require_media_type(asset)?;
    let source = backend.identify(asset)?;
    let (width, height) = calculate_fit_dimensions(source.as_tuple(), options.max_width_or_height);

    let bytes = backend.resize(
        asset,
        &ResizeParams {
            width,
            height,
            format,
            quality: options.quality,
        },
    )?;
    if bytes.is_empty() {
        return Err(ImagingError::encode(&asset.name, "encoder produced no output"));
    }

    debug!(
        "compressed {} {}x{} -> {}x{} ({} -> {} bytes)",
        asset.name,
        source.width,
        source.height,
        width,
        height,
        asset.size(),
        bytes.len()
    );

    let compressed = ImageAsset {
        name: asset.name.clone(),
        media_type: asset.media_type.clone(),
        bytes,
        dimensions: Some(Dimensions { width, height }),
    };
    Ok(CompressionResult::new(asset.size(), compressed))
}

/// Plan a thumbnail without executing it.
pub fn plan_thumbnail(source: Dimensions, size: u32) -> ThumbnailParams {
    ThumbnailParams {
        crop: calculate_square_crop(source.as_tuple()),
        size,
        quality: THUMBNAIL_QUALITY,
    }
}

/// Center-crop to a square and scale to `size × size`, as an inline JPEG.
///
/// The declared media type must be on the allow-list, whatever the bytes are.
pub fn generate_thumbnail(
    backend: &impl ImageBackend,
    asset: &ImageAsset,
    size: u32,
) -> Result<ThumbnailAsset> {
    require_media_type(asset)?;
    let source = backend.identify(asset)?;
    let bytes = backend.thumbnail(asset, &plan_thumbnail(source, size))?;
    if bytes.is_empty() {
        return Err(ImagingError::encode(&asset.name, "encoder produced no output"));
    }
    Ok(ThumbnailAsset::from_encoded(
        &bytes,
        MediaType::Jpeg,
        Dimensions {
            width: size,
            height: size,
        },
    ))
}

/// Progress reported after each batch item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchProgress<'a> {
    /// Share of the batch finished, `(index + 1) / total × 100`.
    pub percent: f64,
    /// Name of the item that just finished.
    pub current: &'a str,
    pub index: usize,
    pub total: usize,
}

/// Outcome of [`compress_images`]: exactly one result per input, in input
/// order, plus the failures that were replaced by passthrough results.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: Vec<CompressionResult>,
    pub failures: Vec<BatchItemError>,
}

impl BatchOutcome {
    pub fn is_degraded(&self, index: usize) -> bool {
        self.failures.iter().any(|f| f.index == index)
    }
}

/// Compress assets one at a time.
///
/// A failing item does not stop the batch: its slot holds the original asset
/// with 0% savings and the error is recorded in [`BatchOutcome::failures`].
pub fn compress_images(
    backend: &impl ImageBackend,
    assets: &[ImageAsset],
    options: &CompressOptions,
    mut on_progress: impl FnMut(BatchProgress<'_>),
) -> BatchOutcome {
    let total = assets.len();
    let mut outcome = BatchOutcome {
        results: Vec::with_capacity(total),
        failures: Vec::new(),
    };

    for (index, asset) in assets.iter().enumerate() {
        match compress_image(backend, asset, options) {
            Ok(result) => outcome.results.push(result),
            Err(source) => {
                warn!("Failed to compress {}: {}", asset.name, source);
                outcome
                    .results
                    .push(CompressionResult::passthrough(asset.clone()));
                outcome.failures.push(BatchItemError {
                    index,
                    name: asset.name.clone(),
                    source,
                });
            }
        }

        on_progress(BatchProgress {
            percent: (index + 1) as f64 / total as f64 * 100.0,
            current: &asset.name,
            index,
            total,
        });
    }

    outcome
}
