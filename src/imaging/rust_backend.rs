//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` with content sniffing |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Square crop | `image::DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1–100) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, quality ignored) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless only, quality ignored) |
//!
//! The format is sniffed from the bytes rather than trusted from the declared
//! media type, the same way a browser decodes an `<img>`. The declared type
//! only decides the output encoding.

use super::asset::ImageAsset;
use super::backend::{Dimensions, ImageBackend, ImagingError};
use super::media_type::MediaType;
use super::params::{Quality, ResizeParams, ThumbnailParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader with the sniffed format, falling back to the declared type when the
/// magic bytes are not recognized.
fn reader(asset: &ImageAsset) -> Result<ImageReader<Cursor<&[u8]>>, ImagingError> {
    let mut reader = ImageReader::new(Cursor::new(asset.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| ImagingError::decode(&asset.name, e))?;
    if reader.format().is_none() {
        if let Some(declared) = asset.parsed_media_type() {
            reader.set_format(declared.image_format());
        }
    }
    Ok(reader)
}

/// Decode the asset's bytes into a raster.
fn load_image(asset: &ImageAsset) -> Result<DynamicImage, ImagingError> {
    reader(asset)?
        .decode()
        .map_err(|e| ImagingError::decode(&asset.name, e))
}

/// Encode a raster in `format`.
///
/// JPEG has no alpha channel, so the raster is flattened to RGB first. The
/// WebP encoder only accepts 8-bit RGB(A), so it gets RGBA.
fn encode_image(
    img: &DynamicImage,
    format: MediaType,
    quality: Quality,
    name: &str,
) -> Result<Vec<u8>, ImagingError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ImagingError::encode(name, "zero-sized raster"));
    }

    let mut buf = Vec::new();
    let written = match format {
        MediaType::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality.percent())),
        MediaType::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        MediaType::Webp => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
    };
    written.map_err(|e| ImagingError::encode(name, e))?;

    if buf.is_empty() {
        return Err(ImagingError::encode(name, "encoder produced no output"));
    }
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, asset: &ImageAsset) -> Result<Dimensions, ImagingError> {
        let (width, height) = reader(asset)?
            .into_dimensions()
            .map_err(|e| ImagingError::decode(&asset.name, e))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, asset: &ImageAsset, params: &ResizeParams) -> Result<Vec<u8>, ImagingError> {
        let img = load_image(asset)?;
        if params.width == 0 || params.height == 0 {
            return Err(ImagingError::encode(&asset.name, "zero-sized raster"));
        }
        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::Lanczos3)
        };
        encode_image(&resized, params.format, params.quality, &asset.name)
    }

    fn thumbnail(
        &self,
        asset: &ImageAsset,
        params: &ThumbnailParams,
    ) -> Result<Vec<u8>, ImagingError> {
        let img = load_image(asset)?;
        let crop = params.crop;
        if params.size == 0 || crop.side == 0 {
            return Err(ImagingError::encode(&asset.name, "zero-sized raster"));
        }
        let square = img
            .crop_imm(crop.x, crop.y, crop.side, crop.side)
            .resize_exact(params.size, params.size, FilterType::Lanczos3);
        encode_image(&square, MediaType::Jpeg, params.quality, &asset.name)
    }
}
