//! Boundary toward the backend that stores albums, photos, files and users.
//!
//! [`RecordGateway`] and [`AuthGateway`] describe what the application needs
//! from the backend. Two policies sit on top of them as free functions so
//! they can be tested against any implementation:
//!
//! - [`assign_cover_if_absent`]: the first photo of an album becomes its cover,
//!   and an existing cover is never replaced.
//! - [`require_admin`]: only an active administrator with a verified email
//!   may manage albums.
//!
//! [`MemoryGateway`] and [`MemoryAuth`] keep everything in process.

mod auth;
mod cover;
mod memory;

pub use auth::{AccessError, AdminUser, AuthGateway, Session, require_admin};
pub use cover::{assign_cover_if_absent, record_photo};
pub use memory::{MemoryAuth, MemoryGateway};

use crate::catalog::{AlbumRecord, AlbumUpdate, NewAlbum, NewPhoto, PhotoRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Invalid record: {0}")]
    Invalid(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl GatewayError {
    pub fn album_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "album",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Backend-side album filter.
///
/// Unlike [`FilterCriteria`](crate::catalog::FilterCriteria) this is
/// single-valued and evaluated by the backend:
///
/// - `category` of `"all"` (or `None`) is unrestricted.
/// - `year` keeps albums whose event date falls in that year; albums without
///   an event date are excluded.
/// - `month` narrows the year to one month and is ignored without a year.
/// - `search` is a case-insensitive substring over title, description and
///   location.
///
/// Results are newest first by creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumQuery {
    pub category: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub search: Option<String>,
}

/// A file accepted by [`RecordGateway::store_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Storage key, `{album_id}/{file key}.{ext}`.
    pub key: String,
    /// Publicly resolvable URL of the file.
    pub url: String,
}

/// Album, photo, and file persistence.
pub trait RecordGateway {
    fn fetch_albums(&self, query: &AlbumQuery) -> Result<Vec<AlbumRecord>>;

    fn fetch_album_by_id(&self, id: &str) -> Result<Option<AlbumRecord>>;

    /// Photos of one album, oldest first.
    fn fetch_photos_for_album(&self, album_id: &str) -> Result<Vec<PhotoRecord>>;

    fn create_album(&self, data: NewAlbum) -> Result<AlbumRecord>;

    /// Apply `update` and bump `updated_at`. `None` when the album is absent.
    fn update_album(&self, id: &str, update: &AlbumUpdate) -> Result<Option<AlbumRecord>>;

    /// Delete the album's photos, then the album. `false` when absent.
    fn delete_album(&self, id: &str) -> Result<bool>;

    /// Insert a photo row. Does not touch the album's cover; see
    /// [`record_photo`].
    fn create_photo(&self, data: NewPhoto) -> Result<PhotoRecord>;

    fn delete_photo(&self, id: &str) -> Result<bool>;

    /// Store file bytes under the album and return where they can be fetched.
    fn store_file(&self, bytes: &[u8], file_name: &str, album_id: &str) -> Result<StoredFile>;
}
