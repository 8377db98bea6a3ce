//! Application configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a sparse user file placed in the config directory (the
//! current directory unless `--config-dir` says otherwise).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! max_size_mb = 1.0           # Files above this need compression
//! max_width_or_height = 1920  # Longer side after resizing
//! quality = 0.8               # Lossy quality factor, (0, 1]
//!
//! [thumbnails]
//! size = 200                  # Square side in pixels
//!
//! [catalog]
//! placeholder_cover = "/school-album.jpg"
//! max_photo_count = 100       # Upper end of the photo-count filter slider
//!
//! [[catalog.categories]]
//! value = "graduation"
//! label = "Graduation"
//! # ... one table per category
//!
//! [storage]
//! public_base_url = "/storage/photos"
//! ```
//!
//! ## Category Enumeration
//!
//! `[[catalog.categories]]` is the one place the album categories are
//! listed. The filter panel, the CLI, and album validation all read it from
//! here. Arrays replace the stock list wholesale rather than merging.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML encode error: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Upload compression limits.
    pub compression: CompressionConfig,
    /// Preview thumbnail settings.
    pub thumbnails: ThumbnailsConfig,
    /// Category enumeration and display defaults for the catalog.
    pub catalog: CatalogConfig,
    /// Where stored files are published.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.compression.max_size_mb > 0.0) {
            return Err(ConfigError::Validation(
                "compression.max_size_mb must be positive".into(),
            ));
        }
        if self.compression.max_width_or_height == 0 {
            return Err(ConfigError::Validation(
                "compression.max_width_or_height must be non-zero".into(),
            ));
        }
        if !(self.compression.quality > 0.0 && self.compression.quality <= 1.0) {
            return Err(ConfigError::Validation(
                "compression.quality must be in (0, 1]".into(),
            ));
        }
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        if self.catalog.categories.is_empty() {
            return Err(ConfigError::Validation(
                "catalog.categories must not be empty".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for category in &self.catalog.categories {
            if category.value.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "catalog.categories values must not be blank".into(),
                ));
            }
            if !seen.insert(category.value.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate category {:?}",
                    category.value
                )));
            }
        }
        Ok(())
    }
}

/// Upload compression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Files larger than this (in MB of 1024² bytes) get compressed.
    pub max_size_mb: f64,
    /// Bound on the longer side; smaller images are never upscaled.
    pub max_width_or_height: u32,
    /// Lossy quality factor in `(0, 1]`.
    pub quality: f32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 1.0,
            max_width_or_height: 1920,
            quality: 0.8,
        }
    }
}

/// Preview thumbnail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Side of the square thumbnail in pixels.
    pub size: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { size: 200 }
    }
}

/// One selectable album category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryOption {
    /// Value stored on album records.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

impl CategoryOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Catalog display and filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Cover shown for albums that have none yet.
    pub placeholder_cover: String,
    /// Upper end of the photo-count filter range offered to visitors.
    pub max_photo_count: u32,
    /// The album category enumeration.
    pub categories: Vec<CategoryOption>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            placeholder_cover: "/school-album.jpg".to_string(),
            max_photo_count: 100,
            categories: vec![
                CategoryOption::new("graduation", "Graduation"),
                CategoryOption::new("sports", "Sports"),
                CategoryOption::new("cultural", "Cultural"),
                CategoryOption::new("academic", "Academic"),
                CategoryOption::new("celebration", "Celebrations"),
                CategoryOption::new("orientation", "Orientation"),
            ],
        }
    }
}

impl CatalogConfig {
    pub fn is_known_category(&self, value: &str) -> bool {
        self.categories.iter().any(|c| c.value == value)
    }

    /// Display label for a category value, falling back to the value itself.
    pub fn category_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
            .unwrap_or(value)
    }
}

/// Public file storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Prefix joined with a storage key to form a file's public URL.
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_base_url: "/storage/photos".to_string(),
        }
    }
}

// =============================================================================
// Layered loading: stock defaults, then the user's config.toml
// =============================================================================

/// Stock defaults as a TOML table, the bottom layer every user file is merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Layer `overlay` over `base`.
///
/// Tables combine key by key, recursing into nested tables. Any other value
/// in the overlay, arrays such as `[[catalog.categories]]` included, wins
/// outright. Base keys the overlay never mentions survive.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(layer)) => {
            for (key, value) in layer {
                let combined = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, combined);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse `dir/config.toml` without interpreting it.
///
/// A missing file is `Ok(None)`; a file that is not TOML is an error.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join("config.toml");
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&text)?))
}

/// Apply `overlay` (if any) to `base` and turn the result into a checked [`AppConfig`].
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let value = match overlay {
        Some(layer) => merge_toml(base, layer),
        None => base,
    };
    let config: AppConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// The effective configuration for `dir`: stock defaults with the directory's
/// `config.toml` layered on top, unknown keys rejected, values validated.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# School Gallery Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Upload compression
# ---------------------------------------------------------------------------
[compression]
# Files larger than this many megabytes (1 MB = 1024 * 1024 bytes) are
# resized and re-encoded before upload.
max_size_mb = 1.0

# Longer side after resizing. Smaller images keep their dimensions.
max_width_or_height = 1920

# Lossy encoding quality factor, greater than 0 and at most 1.
quality = 0.8

# ---------------------------------------------------------------------------
# Preview thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Side of the square, center-cropped JPEG preview in pixels.
size = 200

# ---------------------------------------------------------------------------
# Catalog
# ---------------------------------------------------------------------------
[catalog]
# Cover image shown for albums without one.
placeholder_cover = "/school-album.jpg"

# Upper end of the photo-count range offered in the filter panel.
max_photo_count = 100

# Album categories. This list replaces the defaults entirely when set.
[[catalog.categories]]
value = "graduation"
label = "Graduation"

[[catalog.categories]]
value = "sports"
label = "Sports"

[[catalog.categories]]
value = "cultural"
label = "Cultural"

[[catalog.categories]]
value = "academic"
label = "Academic"

[[catalog.categories]]
value = "celebration"
label = "Celebrations"

[[catalog.categories]]
value = "orientation"
label = "Orientation"

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Prefix for public file URLs: <public_base_url>/<album id>/<file key>
public_base_url = "/storage/photos"
"##
}
