//! Album and photo records as the backend stores them.
//!
//! Optional columns are `Option` fields; nothing is defaulted here. The
//! display defaults (placeholder cover, empty description) are applied once,
//! in the search projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One album row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    pub category: String,
    /// Free-form date of the event. Usually `YYYY-MM-DD`, but anything that
    /// starts with a calendar date or is an RFC 3339 timestamp is understood.
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photographer: Option<String>,
    /// Denormalized count of the album's photos.
    #[serde(default)]
    pub photo_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One photo row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub album_id: String,
    /// Storage key, `{album_id}/{file key}.{ext}`.
    pub filename: String,
    pub original_filename: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub upload_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an album.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAlbum {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photographer: Option<String>,
}

/// Partial album update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub category: Option<String>,
    pub event_date: Option<String>,
    pub location: Option<String>,
    pub photographer: Option<String>,
}

impl AlbumUpdate {
    /// An update that only sets the cover.
    pub fn cover(url: impl Into<String>) -> Self {
        Self {
            cover_image_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy every present field onto `album`.
    pub fn apply_to(&self, album: &mut AlbumRecord) {
        if let Some(title) = &self.title {
            album.title = title.clone();
        }
        if let Some(category) = &self.category {
            album.category = category.clone();
        }
        let optional = [
            (&self.description, &mut album.description),
            (&self.cover_image_url, &mut album.cover_image_url),
            (&self.event_date, &mut album.event_date),
            (&self.location, &mut album.location),
            (&self.photographer, &mut album.photographer),
        ];
        for (value, slot) in optional {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
    }
}

/// Payload for creating a photo row after its file was stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPhoto {
    pub album_id: String,
    pub filename: String,
    pub original_filename: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}
