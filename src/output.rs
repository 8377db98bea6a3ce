//! CLI output formatting for every command.
//!
//! # Entity Display Contract
//!
//! Every listed entity (image, album) follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + name (+ optional detail)
//! 2. **Context lines**: indented `Category:`, `Date:`, error detail, etc.
//!
//! # Output Format
//!
//! ## Compress
//!
//! ```text
//! 001 assembly.jpg: 3.2 MB → 412.5 KB (87.41% saved)
//! 002 broken.png: kept original
//!     Failed to decode broken.png: unexpected end of file
//!
//! Compressed 1 of 2 images, saved 2.8 MB
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 Graduation Ceremony 2024 (45 photos)
//!     Category: Graduation
//!     Date: 2024-06-15
//!
//! 1 result for "graduation"
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::catalog::SearchResult;
use crate::config::CatalogConfig;
use crate::imaging::{BatchOutcome, ImageAsset, ThumbnailAsset};
use crate::stats::CatalogStats;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + name, with optional detail.
///
/// ```text
/// 001 Sports Day (67 photos)
/// 001 assembly.jpg
/// ```
fn entity_header(index: usize, name: &str, count: Option<u32>) -> String {
    match count {
        Some(1) => format!("{} {} (1 photo)", format_index(index), name),
        Some(n) => format!("{} {} ({} photos)", format_index(index), name, n),
        None => format!("{} {}", format_index(index), name),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Human-readable byte size in 1024 steps, at most two decimals.
///
/// ```
/// use school_gallery::output::format_file_size;
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

// ============================================================================
// compress / thumbnail / check
// ============================================================================

pub fn format_compression_report(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, result) in outcome.results.iter().enumerate() {
        let name = &result.asset.name;
        match outcome.failures.iter().find(|f| f.index == i) {
            Some(failure) => {
                lines.push(format!("{} {}: kept original", format_index(i + 1), name));
                lines.push(format!("{}{}", indent(1), failure.source));
            }
            None => lines.push(format!(
                "{} {}: {} → {} ({}% saved)",
                format_index(i + 1),
                name,
                format_file_size(result.original_size),
                format_file_size(result.compressed_size),
                format_percent(result.compression_ratio)
            )),
        }
    }

    let total = outcome.results.len();
    let compressed = total - outcome.failures.len();
    let saved: i64 = outcome.results.iter().map(|r| r.saved_bytes()).sum();
    lines.push(String::new());
    let summary = format!(
        "Compressed {} of {}",
        compressed,
        plural(total, "image", "images")
    );
    if saved >= 0 {
        lines.push(format!("{summary}, saved {}", format_file_size(saved as u64)));
    } else {
        lines.push(format!(
            "{summary}, grew by {}",
            format_file_size(saved.unsigned_abs())
        ));
    }
    lines
}

fn format_percent(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

pub fn print_compression_report(outcome: &BatchOutcome) {
    for line in format_compression_report(outcome) {
        println!("{}", line);
    }
}

/// One line per generated thumbnail.
pub fn format_thumbnail_line(index: usize, name: &str, thumbnail: &ThumbnailAsset) -> String {
    format!(
        "{} {}: {}x{} {} ({} data URL)",
        format_index(index),
        name,
        thumbnail.dimensions.width,
        thumbnail.dimensions.height,
        thumbnail.media_type,
        format_file_size(thumbnail.data_url.len() as u64)
    )
}

/// Validity and size verdict for one candidate upload.
pub fn format_check_line(index: usize, asset: &ImageAsset, valid: bool, needs: bool) -> String {
    let verdict = match (valid, needs) {
        (false, _) => format!("unsupported type {:?}", asset.media_type),
        (true, true) => "needs compression".to_string(),
        (true, false) => "ready".to_string(),
    };
    format!(
        "{} {} ({}): {}",
        format_index(index),
        asset.name,
        format_file_size(asset.size()),
        verdict
    )
}

// ============================================================================
// search
// ============================================================================

pub fn format_search_results(
    results: &[SearchResult],
    query: &str,
    catalog: &CatalogConfig,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, result) in results.iter().enumerate() {
        lines.push(entity_header(i + 1, &result.title, Some(result.photo_count)));
        lines.push(format!(
            "{}Category: {}",
            indent(1),
            catalog.category_label(&result.category)
        ));
        if !result.date.is_empty() {
            lines.push(format!("{}Date: {}", indent(1), result.date));
        }
        if !result.description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&result.description, 60)
            ));
        }
    }
    if !results.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} for {:?}",
        plural(results.len(), "result", "results"),
        query.trim()
    ));
    lines
}

pub fn print_search_results(results: &[SearchResult], query: &str, catalog: &CatalogConfig) {
    for line in format_search_results(results, query, catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// stats
// ============================================================================

pub fn format_stats(stats: &CatalogStats) -> Vec<String> {
    vec![
        format!("Albums: {}", stats.total_albums),
        format!("Photos: {}", stats.total_photos),
        format!(
            "Storage: {:.1} GB ({})",
            stats.storage_gb(),
            format_file_size(stats.total_storage_bytes)
        ),
        format!("Recent uploads (7 days): {}", stats.recent_uploads),
    ]
}

pub fn print_stats(stats: &CatalogStats) {
    for line in format_stats(stats) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FilterCriteria};
    use crate::imaging::{
        BatchItemError, CompressionResult, Dimensions, ImagingError, MediaType,
    };
    use crate::test_helpers::album;

    // =========================================================================
    // helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn entity_header_counts() {
        assert_eq!(entity_header(1, "Gala", Some(1)), "001 Gala (1 photo)");
        assert_eq!(entity_header(2, "Gala", Some(12)), "002 Gala (12 photos)");
        assert_eq!(entity_header(3, "a.jpg", None), "003 a.jpg");
    }

    #[test]
    fn truncate_desc_respects_char_boundaries() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("abcdef", 3), "abc...");
        assert_eq!(truncate_desc("ééééé", 2), "éé...");
    }

    // =========================================================================
    // format_file_size
    // =========================================================================

    #[test]
    fn file_size_units() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(2_621_440), "2.5 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn file_size_rounds_to_two_decimals() {
        // 1234 / 1024 = 1.205...
        assert_eq!(format_file_size(1234), "1.21 KB");
    }

    #[test]
    fn file_size_stays_in_gb() {
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    // =========================================================================
    // compress
    // =========================================================================

    fn result(name: &str, original: usize, compressed: usize) -> CompressionResult {
        let asset = ImageAsset::new(name, "image/jpeg", vec![0; compressed]);
        CompressionResult::new(original as u64, asset)
    }

    #[test]
    fn compression_report_lists_each_item() {
        let outcome = BatchOutcome {
            results: vec![
                result("a.jpg", 4096, 1024),
                CompressionResult::passthrough(ImageAsset::new("b.png", "image/png", vec![0; 2048])),
            ],
            failures: vec![BatchItemError {
                index: 1,
                name: "b.png".into(),
                source: ImagingError::decode("b.png", "bad header"),
            }],
        };

        let lines = format_compression_report(&outcome);
        assert_eq!(lines[0], "001 a.jpg: 4 KB → 1 KB (75% saved)");
        assert_eq!(lines[1], "002 b.png: kept original");
        assert_eq!(lines[2], "    Failed to decode b.png: bad header");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Compressed 1 of 2 images, saved 3 KB");
    }

    #[test]
    fn compression_report_notes_growth() {
        let outcome = BatchOutcome {
            results: vec![result("tiny.png", 100, 300)],
            failures: vec![],
        };
        let lines = format_compression_report(&outcome);
        assert_eq!(lines[0], "001 tiny.png: 100 Bytes → 300 Bytes (-200% saved)");
        assert_eq!(lines.last().unwrap(), "Compressed 1 of 1 image, grew by 200 Bytes");
    }

    #[test]
    fn thumbnail_line() {
        let thumb = ThumbnailAsset::from_encoded(
            &[1, 2, 3],
            MediaType::Jpeg,
            Dimensions {
                width: 200,
                height: 200,
            },
        );
        let line = format_thumbnail_line(1, "a.png", &thumb);
        assert!(line.starts_with("001 a.png: 200x200 image/jpeg ("));
    }

    #[test]
    fn check_lines() {
        let asset = ImageAsset::new("a.gif", "image/gif", vec![0; 10]);
        assert_eq!(
            format_check_line(1, &asset, false, false),
            "001 a.gif (10 Bytes): unsupported type \"image/gif\""
        );
        let asset = ImageAsset::new("b.jpg", "image/jpeg", vec![0; 2048]);
        assert_eq!(
            format_check_line(2, &asset, true, true),
            "002 b.jpg (2 KB): needs compression"
        );
        assert_eq!(format_check_line(3, &asset, true, false), "003 b.jpg (2 KB): ready");
    }

    // =========================================================================
    // search
    // =========================================================================

    #[test]
    fn search_results_show_labels_and_dates() {
        let mut grad = album("g", "Graduation Ceremony 2024", "graduation", 45);
        grad.event_date = Some("2024-06-15".into());
        let results = Catalog::default().search(&[grad], "graduation", &FilterCriteria::default());

        let lines = format_search_results(&results, " graduation ", &CatalogConfig::default());
        assert_eq!(
            lines,
            vec![
                "001 Graduation Ceremony 2024 (45 photos)",
                "    Category: Graduation",
                "    Date: 2024-06-15",
                "",
                "1 result for \"graduation\"",
            ]
        );
    }

    #[test]
    fn no_results_line() {
        let lines = format_search_results(&[], "chess", &CatalogConfig::default());
        assert_eq!(lines, vec!["0 results for \"chess\""]);
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut record = album("a", "Art Week", "cultural", 3);
        record.description = Some("x".repeat(80));
        let results = Catalog::default().search(&[record], "art", &FilterCriteria::default());
        let lines = format_search_results(&results, "art", &CatalogConfig::default());
        assert_eq!(lines[2], format!("    Description: {}...", "x".repeat(60)));
    }

    // =========================================================================
    // stats
    // =========================================================================

    #[test]
    fn stats_lines() {
        let stats = CatalogStats {
            total_albums: 3,
            total_photos: 120,
            total_storage_bytes: 1536 * 1024 * 1024,
            recent_uploads: 4,
        };
        assert_eq!(
            format_stats(&stats),
            vec![
                "Albums: 3",
                "Photos: 120",
                "Storage: 1.5 GB (1.5 GB)",
                "Recent uploads (7 days): 4",
            ]
        );
    }
}
