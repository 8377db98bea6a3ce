//! End-to-end image preparation with real encoded images.
//!
//! Everything runs through the public API with [`RustBackend`], so these tests
//! exercise actual decoding, resampling and encoding.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use school_gallery::catalog::NewAlbum;
use school_gallery::gateway::{MemoryGateway, RecordGateway};
use school_gallery::imaging::{
    CompressOptions, ImageAsset, ImagingError, Quality, RustBackend, compress_image,
    compress_images, generate_thumbnail,
};
use school_gallery::upload::{UploadQueue, UploadStatus};

fn noisy(width: u32, height: u32) -> DynamicImage {
    // Pseudo-random texture so encoders cannot shrink it to nothing.
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = x.wrapping_mul(2_654_435_761).wrapping_add(y.wrapping_mul(40_503));
        Rgb([(v >> 3) as u8, (v >> 11) as u8, (v >> 19) as u8])
    }))
}

fn jpeg(name: &str, width: u32, height: u32) -> ImageAsset {
    let mut buf = Vec::new();
    noisy(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 95))
        .unwrap();
    ImageAsset::new(name, "image/jpeg", buf)
}

fn png(name: &str, width: u32, height: u32) -> ImageAsset {
    let mut buf = Vec::new();
    noisy(width, height)
        .write_with_encoder(PngEncoder::new(&mut buf))
        .unwrap();
    ImageAsset::new(name, "image/png", buf)
}

fn decoded_dims(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

fn options(max_side: u32) -> CompressOptions {
    CompressOptions {
        max_width_or_height: max_side,
        ..Default::default()
    }
}

// =============================================================================
// compress_image
// =============================================================================

#[test]
fn small_image_keeps_its_dimensions() {
    let backend = RustBackend::new();
    let result = compress_image(&backend, &jpeg("small.jpg", 320, 240), &options(1920)).unwrap();
    assert_eq!(decoded_dims(&result.asset.bytes), (320, 240));
}

#[test]
fn landscape_longer_side_maps_to_bound() {
    let backend = RustBackend::new();
    let result = compress_image(&backend, &jpeg("wide.jpg", 1000, 600), &options(400)).unwrap();

    assert_eq!(decoded_dims(&result.asset.bytes), (400, 240));
    assert_eq!(
        image::guess_format(&result.asset.bytes).unwrap(),
        ImageFormat::Jpeg
    );
}

#[test]
fn portrait_png_stays_png() {
    let backend = RustBackend::new();
    let result = compress_image(&backend, &png("tall.png", 300, 900), &options(300)).unwrap();

    assert_eq!(decoded_dims(&result.asset.bytes), (100, 300));
    assert_eq!(
        image::guess_format(&result.asset.bytes).unwrap(),
        ImageFormat::Png
    );
    assert_eq!(result.asset.media_type, "image/png");
}

#[test]
fn downscaled_jpeg_shrinks() {
    let backend = RustBackend::new();
    let source = jpeg("big.jpg", 1600, 1200);
    let opts = CompressOptions {
        max_width_or_height: 400,
        quality: Quality::new(0.6),
        ..Default::default()
    };
    let result = compress_image(&backend, &source, &opts).unwrap();

    assert_eq!(result.original_size, source.size());
    assert!(result.compressed_size < result.original_size);
    assert!(result.compression_ratio > 0.0 && result.compression_ratio <= 100.0);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let backend = RustBackend::new();
    let asset = ImageAsset::new("fake.jpg", "image/jpeg", b"definitely not a jpeg".to_vec());
    let result = compress_image(&backend, &asset, &CompressOptions::default());
    assert!(matches!(result, Err(ImagingError::Decode { .. })));
}

// =============================================================================
// generate_thumbnail
// =============================================================================

#[test]
fn thumbnails_are_square_for_any_aspect() {
    let backend = RustBackend::new();
    for (w, h) in [(800, 300), (300, 800), (256, 256), (50, 20)] {
        let thumb = generate_thumbnail(&backend, &png("src.png", w, h), 120).unwrap();
        let bytes = thumb.decode_bytes().unwrap();
        assert_eq!(decoded_dims(&bytes), (120, 120), "source {w}x{h}");
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        assert!(thumb.data_url.starts_with("data:image/jpeg;base64,"));
    }
}

// =============================================================================
// compress_images
// =============================================================================

#[test]
fn batch_keeps_order_and_isolates_the_bad_file() {
    let backend = RustBackend::new();
    let broken = ImageAsset::new("broken.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let inputs = vec![
        jpeg("one.jpg", 900, 600),
        broken.clone(),
        png("three.png", 200, 500),
    ];

    let mut progress = Vec::new();
    let outcome = compress_images(&backend, &inputs, &options(300), |p| {
        progress.push((p.percent.round() as u32, p.current.to_string()));
    });

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(decoded_dims(&outcome.results[0].asset.bytes), (300, 200));
    assert_eq!(outcome.results[1].asset, broken);
    assert_eq!(outcome.results[1].compression_ratio, 0.0);
    assert_eq!(decoded_dims(&outcome.results[2].asset.bytes), (120, 300));

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(
        progress,
        vec![
            (33, "one.jpg".to_string()),
            (67, "broken.png".to_string()),
            (100, "three.png".to_string()),
        ]
    );
}

// =============================================================================
// upload queue against the in-memory gateway
// =============================================================================

#[test]
fn upload_flow_compresses_stores_and_sets_cover() {
    let backend = RustBackend::new();
    let gateway = MemoryGateway::default();
    let album = gateway
        .create_album(NewAlbum {
            title: "Sports Day 2024".into(),
            category: "sports".into(),
            event_date: Some("2024-02-14".into()),
            ..Default::default()
        })
        .unwrap();

    // A tiny size limit forces the first file through compression.
    let opts = CompressOptions {
        max_size_mb: 0.01,
        max_width_or_height: 256,
        ..Default::default()
    };
    let mut queue = UploadQueue::new(opts, 64);
    queue.enqueue(&backend, jpeg("relay.jpg", 1024, 768)).unwrap();
    queue.enqueue(&backend, png("medal.png", 40, 40)).unwrap();
    assert!(!queue.items()[0].compressed);
    assert!(queue.items()[1].compressed);

    assert_eq!(queue.compress_pending(&backend), 1);
    let summary = queue.upload_pending(&gateway, &album.id);
    assert_eq!(summary.uploaded, 2);
    assert_eq!(summary.failed, 0);
    assert!(queue.items().iter().all(|i| i.status == UploadStatus::Completed));

    let photos = gateway.fetch_photos_for_album(&album.id).unwrap();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].width, Some(256));
    assert_eq!(photos[0].height, Some(192));

    let stored = gateway.file(&photos[0].filename).unwrap();
    assert_eq!(decoded_dims(&stored), (256, 192));

    let album = gateway.fetch_album_by_id(&album.id).unwrap().unwrap();
    assert_eq!(album.photo_count, 2);
    assert_eq!(album.cover_image_url, Some(photos[0].url.clone()));

    assert_eq!(queue.clear_completed(), 2);
    assert!(queue.is_empty());
}
