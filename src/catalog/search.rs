//! Free-text search combined with the structured filters.

use super::filter::FilterCriteria;
use super::record::AlbumRecord;
use crate::config::CatalogConfig;
use serde::{Deserialize, Serialize};

/// Cover used when an album has none.
pub const DEFAULT_PLACEHOLDER_COVER: &str = "/school-album.jpg";

/// What a result points at. Only albums are searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Album,
}

/// Display-ready projection of a matched album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub photo_count: u32,
    /// Event date as stored, or empty.
    pub date: String,
    /// Lower-cased category.
    pub category: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
}

/// Search front end holding the display defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    placeholder_cover: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_COVER)
    }
}

impl From<&CatalogConfig> for Catalog {
    fn from(config: &CatalogConfig) -> Self {
        Self::new(config.placeholder_cover.clone())
    }
}

impl Catalog {
    pub fn new(placeholder_cover: impl Into<String>) -> Self {
        Self {
            placeholder_cover: placeholder_cover.into(),
        }
    }

    pub fn placeholder_cover(&self) -> &str {
        &self.placeholder_cover
    }

    /// Albums matching `query` and every dimension of `criteria`, in input
    /// order.
    ///
    /// A blank query means search is not active and yields nothing; the
    /// unfiltered catalog goes through [`browse`](super::browse) instead.
    pub fn search(
        &self,
        albums: &[AlbumRecord],
        query: &str,
        criteria: &FilterCriteria,
    ) -> Vec<SearchResult> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        albums
            .iter()
            .filter(|a| text_matches(a, &needle) && criteria.matches(a))
            .map(|a| self.project(a))
            .collect()
    }

    /// Apply the display defaults to one album.
    pub fn project(&self, album: &AlbumRecord) -> SearchResult {
        SearchResult {
            id: album.id.clone(),
            title: album.title.clone(),
            description: album.description.clone().unwrap_or_default(),
            cover_image: album
                .cover_image_url
                .clone()
                .unwrap_or_else(|| self.placeholder_cover.clone()),
            photo_count: album.photo_count,
            date: album.event_date.clone().unwrap_or_default(),
            category: album.category.to_lowercase(),
            kind: ResultKind::Album,
        }
    }
}

/// [`Catalog::search`] with the stock placeholder cover.
pub fn search(albums: &[AlbumRecord], query: &str, criteria: &FilterCriteria) -> Vec<SearchResult> {
    Catalog::default().search(albums, query, criteria)
}

/// `needle` must already be trimmed and lower-cased.
fn text_matches(album: &AlbumRecord, needle: &str) -> bool {
    let haystack = [
        Some(album.title.as_str()),
        album.description.as_deref(),
        Some(album.category.as_str()),
        album.location.as_deref(),
        album.photographer.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();
    haystack.contains(needle)
}
