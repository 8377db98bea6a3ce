//! In-process gateways.
//!
//! Behave like the hosted backend for everything the application relies on:
//! generated ids, `photo_count` kept in step with photo rows, photos removed
//! before their album, content-addressed storage keys, and hashed passwords.

use super::auth::{AdminUser, AuthGateway, Session};
use super::{AlbumQuery, GatewayError, RecordGateway, Result, StoredFile};
use crate::catalog::{
    AlbumRecord, AlbumUpdate, NewAlbum, NewPhoto, PhotoRecord, parse_event_date,
};
use crate::config::AppConfig;
use chrono::{DateTime, Datelike, Utc};
use log::debug;
use sha2::{Digest, Sha256};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Hex digits of the content hash used in storage keys.
const FILE_KEY_LEN: usize = 16;

#[derive(Default)]
struct Tables {
    albums: Vec<AlbumRecord>,
    photos: Vec<PhotoRecord>,
    files: BTreeMap<String, Vec<u8>>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn album_mut(&mut self, id: &str) -> Option<&mut AlbumRecord> {
        self.albums.iter_mut().find(|a| a.id == id)
    }
}

/// [`RecordGateway`] over in-memory tables.
pub struct MemoryGateway {
    public_base_url: String,
    categories: Option<BTreeSet<String>>,
    tables: RefCell<Tables>,
    clock: Cell<Option<DateTime<Utc>>>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new("/storage/photos")
    }
}

impl MemoryGateway {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            categories: None,
            tables: RefCell::new(Tables::default()),
            clock: Cell::new(None),
        }
    }

    /// Gateway using the configured storage URL that only accepts the
    /// configured categories.
    pub fn from_config(config: &AppConfig) -> Self {
        let categories = config
            .catalog
            .categories
            .iter()
            .map(|c| c.value.clone())
            .collect();
        Self {
            categories: Some(categories),
            ..Self::new(config.storage.public_base_url.clone())
        }
    }

    /// Pin the clock used for timestamps. `None` returns to wall time.
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        self.clock.set(now);
    }

    /// Bytes stored under `key`.
    pub fn file(&self, key: &str) -> Option<Vec<u8>> {
        self.tables.borrow().files.get(key).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.tables.borrow().files.len()
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.get().unwrap_or_else(Utc::now)
    }

    fn check_category(&self, category: &str) -> Result<()> {
        if category.trim().is_empty() {
            return Err(GatewayError::Invalid("album category is required".into()));
        }
        match &self.categories {
            Some(known) if !known.contains(category) => Err(GatewayError::Invalid(format!(
                "unknown category {category:?}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Does `album` satisfy the backend-side query?
fn query_matches(album: &AlbumRecord, query: &AlbumQuery) -> bool {
    if let Some(category) = query.category.as_deref() {
        if category != "all" && album.category != category {
            return false;
        }
    }

    if let Some(year) = query.year.as_deref() {
        let Some(date) = album.event_date.as_deref().and_then(parse_event_date) else {
            return false;
        };
        if date.year().to_string() != year {
            return false;
        }
        if let Some(month) = query.month.as_deref().and_then(crate::catalog::normalize_month) {
            if format!("{:02}", date.month()) != month {
                return false;
            }
        }
    }

    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        let hit = [
            Some(album.title.as_str()),
            album.description.as_deref(),
            album.location.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }

    true
}

impl RecordGateway for MemoryGateway {
    fn fetch_albums(&self, query: &AlbumQuery) -> Result<Vec<AlbumRecord>> {
        let tables = self.tables.borrow();
        let mut albums: Vec<AlbumRecord> = tables
            .albums
            .iter()
            .filter(|a| query_matches(a, query))
            .cloned()
            .collect();
        albums.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(albums)
    }

    fn fetch_album_by_id(&self, id: &str) -> Result<Option<AlbumRecord>> {
        Ok(self.tables.borrow().albums.iter().find(|a| a.id == id).cloned())
    }

    fn fetch_photos_for_album(&self, album_id: &str) -> Result<Vec<PhotoRecord>> {
        let tables = self.tables.borrow();
        let mut photos: Vec<PhotoRecord> = tables
            .photos
            .iter()
            .filter(|p| p.album_id == album_id)
            .cloned()
            .collect();
        photos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(photos)
    }

    fn create_album(&self, data: NewAlbum) -> Result<AlbumRecord> {
        if data.title.trim().is_empty() {
            return Err(GatewayError::Invalid("album title is required".into()));
        }
        self.check_category(&data.category)?;

        let now = self.now();
        let mut tables = self.tables.borrow_mut();
        let album = AlbumRecord {
            id: tables.next_id("album"),
            title: data.title,
            description: data.description,
            cover_image_url: data.cover_image_url,
            category: data.category,
            event_date: data.event_date,
            location: data.location,
            photographer: data.photographer,
            photo_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.albums.push(album.clone());
        debug!("created album {} ({})", album.id, album.title);
        Ok(album)
    }

    fn update_album(&self, id: &str, update: &AlbumUpdate) -> Result<Option<AlbumRecord>> {
        if let Some(category) = update.category.as_deref() {
            self.check_category(category)?;
        }
        let now = self.now();
        let mut tables = self.tables.borrow_mut();
        let Some(album) = tables.album_mut(id) else {
            return Ok(None);
        };
        update.apply_to(album);
        album.updated_at = now;
        Ok(Some(album.clone()))
    }

    fn delete_album(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.borrow_mut();
        if !tables.albums.iter().any(|a| a.id == id) {
            return Ok(false);
        }
        tables.photos.retain(|p| p.album_id != id);
        tables.albums.retain(|a| a.id != id);
        debug!("deleted album {id}");
        Ok(true)
    }

    fn create_photo(&self, data: NewPhoto) -> Result<PhotoRecord> {
        let now = self.now();
        let mut tables = self.tables.borrow_mut();
        let photo_id = tables.next_id("photo");
        let album = tables
            .album_mut(&data.album_id)
            .ok_or_else(|| GatewayError::album_not_found(&data.album_id))?;
        album.photo_count += 1;

        let photo = PhotoRecord {
            id: photo_id,
            album_id: data.album_id,
            filename: data.filename,
            original_filename: data.original_filename,
            url: data.url,
            thumbnail_url: data.thumbnail_url,
            alt_text: data.alt_text,
            caption: data.caption,
            file_size: data.file_size,
            width: data.width,
            height: data.height,
            upload_date: now,
            created_at: now,
        };
        tables.photos.push(photo.clone());
        Ok(photo)
    }

    fn delete_photo(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.borrow_mut();
        let Some(index) = tables.photos.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let photo = tables.photos.remove(index);
        if let Some(album) = tables.album_mut(&photo.album_id) {
            album.photo_count = album.photo_count.saturating_sub(1);
        }
        Ok(true)
    }

    fn store_file(&self, bytes: &[u8], file_name: &str, album_id: &str) -> Result<StoredFile> {
        if album_id.trim().is_empty() {
            return Err(GatewayError::Invalid("album id is required".into()));
        }
        if bytes.is_empty() {
            return Err(GatewayError::Storage(format!("{file_name} is empty")));
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "bin".to_string());
        let digest = format!("{:x}", Sha256::digest(bytes));
        let key = format!("{album_id}/{}.{ext}", &digest[..FILE_KEY_LEN]);
        let url = format!("{}/{key}", self.public_base_url.trim_end_matches('/'));

        self.tables
            .borrow_mut()
            .files
            .insert(key.clone(), bytes.to_vec());
        debug!("stored {file_name} as {key} ({} bytes)", bytes.len());
        Ok(StoredFile { key, url })
    }
}

struct Account {
    user_id: String,
    password_digest: Vec<u8>,
    email_verified: bool,
}

fn password_digest(password: &str) -> Vec<u8> {
    Sha256::digest(password.as_bytes()).to_vec()
}

/// [`AuthGateway`] over an in-memory account table and allow-list.
///
/// Emails are compared case-insensitively.
#[derive(Default)]
pub struct MemoryAuth {
    accounts: RefCell<HashMap<String, Account>>,
    admins: RefCell<Vec<AdminUser>>,
    session: RefCell<Option<Session>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its user id.
    pub fn add_user(&self, email: &str, password: &str, email_verified: bool) -> String {
        let mut accounts = self.accounts.borrow_mut();
        let user_id = format!("user-{}", accounts.len() + 1);
        accounts.insert(
            email.to_lowercase(),
            Account {
                user_id: user_id.clone(),
                password_digest: password_digest(password),
                email_verified,
            },
        );
        user_id
    }

    pub fn add_admin(&self, admin: AdminUser) {
        self.admins.borrow_mut().push(admin);
    }
}

impl AuthGateway for MemoryAuth {
    fn session(&self) -> Result<Option<Session>> {
        Ok(self.session.borrow().clone())
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let accounts = self.accounts.borrow();
        let account = accounts
            .get(&email.to_lowercase())
            .filter(|a| a.password_digest == password_digest(password))
            .ok_or_else(|| GatewayError::Auth("invalid login credentials".into()))?;

        let session = Session {
            user_id: account.user_id.clone(),
            email: Some(email.to_string()),
            email_verified: account.email_verified,
        };
        *self.session.borrow_mut() = Some(session.clone());
        Ok(session)
    }

    fn sign_out(&self) -> Result<()> {
        self.session.borrow_mut().take();
        Ok(())
    }

    fn find_admin(&self, email: &str) -> Result<Option<AdminUser>> {
        Ok(self
            .admins
            .borrow()
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
