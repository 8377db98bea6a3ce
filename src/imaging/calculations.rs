//! Pure calculation functions for image dimensions and sizes.
//!
//! All functions here are pure and testable without any I/O or images.

/// Bytes in one megabyte as the upload limits count them (1024²).
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Scale `source` down so that neither side exceeds `max_side`.
///
/// Aspect ratio is preserved; the larger side maps exactly to `max_side` and
/// the other side is rounded to the nearest pixel. Sources that already fit
/// are returned unchanged, so this never upscales.
///
/// # Examples
/// ```
/// # use school_gallery::imaging::calculate_fit_dimensions;
/// assert_eq!(calculate_fit_dimensions((4000, 3000), 1920), (1920, 1440));
/// assert_eq!(calculate_fit_dimensions((800, 600), 1920), (800, 600));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), max_side: u32) -> (u32, u32) {
    let (src_w, src_h) = source;

    if src_w <= max_side && src_h <= max_side {
        return source;
    }

    if src_w > src_h {
        // Landscape: width is the bound
        let h = (max_side as f64 * src_h as f64 / src_w as f64).round() as u32;
        (max_side, h)
    } else {
        // Portrait or square: height is the bound
        let w = (max_side as f64 * src_w as f64 / src_h as f64).round() as u32;
        (w, max_side)
    }
}

/// A rectangle inside the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// Centered square crop whose side is the shorter source dimension.
///
/// The thumbnail is drawn from this crop so it is never stretched.
pub fn calculate_square_crop(source: (u32, u32)) -> CropRect {
    let (src_w, src_h) = source;
    let side = src_w.min(src_h);
    CropRect {
        x: (src_w - side) / 2,
        y: (src_h - side) / 2,
        side,
    }
}

/// Percentage saved going from `original` to `compressed` bytes.
///
/// Zero-byte originals report 0 rather than NaN or infinity.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - compressed as f64) / original as f64 * 100.0
}

/// Byte limit for a megabyte budget.
pub fn megabytes_to_bytes(mb: f64) -> f64 {
    mb * BYTES_PER_MB
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_leaves_small_images_alone() {
        assert_eq!(calculate_fit_dimensions((800, 600), 1920), (800, 600));
        assert_eq!(calculate_fit_dimensions((1920, 1920), 1920), (1920, 1920));
    }

    #[test]
    fn fit_landscape_width_hits_bound() {
        // 4000x3000 → 1920 x 1440
        assert_eq!(calculate_fit_dimensions((4000, 3000), 1920), (1920, 1440));
    }

    #[test]
    fn fit_portrait_height_hits_bound() {
        // 3000x4000 → 1440 x 1920
        assert_eq!(calculate_fit_dimensions((3000, 4000), 1920), (1440, 1920));
    }

    #[test]
    fn fit_square_over_bound() {
        assert_eq!(calculate_fit_dimensions((2500, 2500), 1920), (1920, 1920));
    }

    #[test]
    fn fit_one_side_over_bound() {
        // Only the height exceeds: 1000x2000 → 960x1920
        assert_eq!(calculate_fit_dimensions((1000, 2000), 1920), (960, 1920));
    }

    #[test]
    fn fit_rounds_to_nearest_pixel() {
        // 3000x2001 → 1920 x 1280.64 → 1281
        assert_eq!(calculate_fit_dimensions((3000, 2001), 1920), (1920, 1281));
        // 3000x1999 → 1920 x 1279.36 → 1279
        assert_eq!(calculate_fit_dimensions((3000, 1999), 1920), (1920, 1279));
    }

    #[test]
    fn fit_preserves_aspect_within_rounding() {
        for &(w, h) in &[(5000, 1234), (1234, 5000), (2049, 2048), (7777, 3333)] {
            let (fw, fh) = calculate_fit_dimensions((w, h), 1920);
            assert_eq!(fw.max(fh), 1920);
            // Short side is within half a pixel of the exact scaled value
            let exact = 1920.0 * w.min(h) as f64 / w.max(h) as f64;
            assert!(
                (fw.min(fh) as f64 - exact).abs() <= 0.5,
                "{w}x{h} → {fw}x{fh}"
            );
        }
    }

    // =========================================================================
    // calculate_square_crop tests
    // =========================================================================

    #[test]
    fn crop_landscape_centers_horizontally() {
        assert_eq!(
            calculate_square_crop((800, 600)),
            CropRect {
                x: 100,
                y: 0,
                side: 600
            }
        );
    }

    #[test]
    fn crop_portrait_centers_vertically() {
        assert_eq!(
            calculate_square_crop((600, 900)),
            CropRect {
                x: 0,
                y: 150,
                side: 600
            }
        );
    }

    #[test]
    fn crop_square_is_whole_image() {
        assert_eq!(
            calculate_square_crop((300, 300)),
            CropRect {
                x: 0,
                y: 0,
                side: 300
            }
        );
    }

    // =========================================================================
    // compression_ratio tests
    // =========================================================================

    #[test]
    fn ratio_of_halving_is_fifty() {
        assert_eq!(compression_ratio(1000, 500), 50.0);
    }

    #[test]
    fn ratio_zero_original_is_zero() {
        assert_eq!(compression_ratio(0, 0), 0.0);
        assert_eq!(compression_ratio(0, 100), 0.0);
    }

    #[test]
    fn ratio_never_exceeds_hundred() {
        assert_eq!(compression_ratio(1000, 0), 100.0);
        assert!(compression_ratio(10, 30) < 0.0);
    }

    #[test]
    fn megabytes_use_binary_units() {
        assert_eq!(megabytes_to_bytes(1.0), 1_048_576.0);
        assert_eq!(megabytes_to_bytes(0.5), 524_288.0);
    }
}
