//! Shared test utilities for the school-gallery test suite.
//!
//! Provides record builders for catalog and gateway tests and small
//! synthetic images for backend tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let albums = vec![
//!     album("g", "Graduation Ceremony 2024", "graduation", 45),
//!     album_on("s", "Science Fair", "academic", "2024-03-20"),
//! ];
//! let asset = ImageAsset::new("a.jpg", "image/jpeg", jpeg_bytes(64, 48));
//! ```

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::catalog::{AlbumRecord, NewPhoto, PhotoRecord};

// =========================================================================
// Timestamps
// =========================================================================

/// Parse an RFC 3339 timestamp. Panics on malformed input.
pub fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .unwrap_or_else(|e| panic!("bad test timestamp {timestamp:?}: {e}"))
        .with_timezone(&Utc)
}

// =========================================================================
// Record builders
// =========================================================================

/// Album with no optional fields, created 2024-01-15.
pub fn album(id: &str, title: &str, category: &str, photo_count: u32) -> AlbumRecord {
    let created = at("2024-01-15T10:00:00Z");
    AlbumRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        cover_image_url: None,
        category: category.to_string(),
        event_date: None,
        location: None,
        photographer: None,
        photo_count,
        created_at: created,
        updated_at: created,
    }
}

/// Album with an event date and ten photos.
pub fn album_on(id: &str, title: &str, category: &str, event_date: &str) -> AlbumRecord {
    AlbumRecord {
        event_date: Some(event_date.to_string()),
        ..album(id, title, category, 10)
    }
}

pub fn photo(id: &str, album_id: &str, file_size: u64, created_at: &str) -> PhotoRecord {
    let created = at(created_at);
    PhotoRecord {
        id: id.to_string(),
        album_id: album_id.to_string(),
        filename: format!("{album_id}/{id}.jpg"),
        original_filename: format!("{id}.jpg"),
        url: format!("/storage/photos/{album_id}/{id}.jpg"),
        thumbnail_url: None,
        alt_text: None,
        caption: None,
        file_size,
        width: None,
        height: None,
        upload_date: created,
        created_at: created,
    }
}

/// Photo payload pointing at `url`.
pub fn new_photo(album_id: &str, url: &str) -> NewPhoto {
    let filename = url.rsplit('/').next().unwrap_or(url);
    NewPhoto {
        album_id: album_id.to_string(),
        filename: format!("{album_id}/{filename}"),
        original_filename: filename.to_string(),
        url: url.to_string(),
        file_size: 1,
        ..Default::default()
    }
}

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(gradient(width, height))
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 90))
        .unwrap();
    buf
}

/// PNG with a transparent left half.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, alpha])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_with_encoder(PngEncoder::new(&mut buf))
        .unwrap();
    buf
}

pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(gradient(width, height)).to_rgba8();
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_with_encoder(WebPEncoder::new_lossless(&mut buf))
        .unwrap();
    buf
}
