//! Catalog totals for the admin dashboard.

use crate::catalog::{AlbumRecord, PhotoRecord};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Photos created within this many days count as recent.
pub const RECENT_UPLOAD_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_albums: usize,
    /// Sum of the albums' `photo_count`.
    pub total_photos: u64,
    /// Sum of the photos' `file_size`.
    pub total_storage_bytes: u64,
    pub recent_uploads: usize,
}

impl CatalogStats {
    /// Storage in GiB, the unit the dashboard shows.
    pub fn storage_gb(&self) -> f64 {
        self.total_storage_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

pub fn catalog_stats(
    albums: &[AlbumRecord],
    photos: &[PhotoRecord],
    now: DateTime<Utc>,
) -> CatalogStats {
    let cutoff = now - Duration::days(RECENT_UPLOAD_DAYS);
    CatalogStats {
        total_albums: albums.len(),
        total_photos: albums.iter().map(|a| u64::from(a.photo_count)).sum(),
        total_storage_bytes: photos.iter().map(|p| p.file_size).sum(),
        recent_uploads: photos.iter().filter(|p| p.created_at >= cutoff).count(),
    }
}
