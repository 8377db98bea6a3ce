//! Upload queue: prepare images, then store and record them one by one.
//!
//! The queue is a plain value owned by the caller. Each step takes what it
//! needs (a backend, a gateway) as arguments and updates per-item state, so
//! one bad file never blocks the others.
//!
//! ```text
//! enqueue ──► Pending ──compress_pending──► Pending (compressed)
//!                │                    └───► Failed
//!                └──────upload_pending────► Completed | Failed
//! ```

use crate::catalog::NewPhoto;
use crate::gateway::{GatewayError, RecordGateway, record_photo};
use crate::imaging::{
    CompressOptions, CompressionResult, ImageAsset, ImageBackend, ImagingError, ThumbnailAsset,
    compress_image, generate_thumbnail, is_valid_image_type, needs_compression,
};
use log::{info, warn};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Compressing,
    Uploading,
    Completed,
    Failed,
}

/// One queued file.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub id: u64,
    /// The file as selected.
    pub original: ImageAsset,
    /// Present once compression succeeded.
    pub compression: Option<CompressionResult>,
    /// Square JPEG preview.
    pub thumbnail: ThumbnailAsset,
    /// False while the original is over the size limit and not yet compressed.
    pub compressed: bool,
    pub status: UploadStatus,
    /// 0 to 100.
    pub progress: u8,
    pub error: Option<UploadError>,
    /// Public URL once uploaded.
    pub url: Option<String>,
}

impl UploadItem {
    /// What will be uploaded: the compressed asset if there is one.
    pub fn asset(&self) -> &ImageAsset {
        self.compression
            .as_ref()
            .map(|c| &c.asset)
            .unwrap_or(&self.original)
    }

    fn fail(&mut self, error: UploadError) {
        warn!("{}: {}", self.original.name, error);
        self.status = UploadStatus::Failed;
        self.error = Some(error);
    }
}

/// Counts from one [`UploadQueue::upload_pending`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
}

/// Size totals across the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueueTotals {
    pub original_size: u64,
    pub current_size: u64,
    /// Percentage saved overall; 0 for an empty queue.
    pub savings_percent: f64,
}

#[derive(Debug, Clone)]
pub struct UploadQueue {
    options: CompressOptions,
    thumbnail_size: u32,
    items: Vec<UploadItem>,
    next_id: u64,
}

impl UploadQueue {
    pub fn new(options: CompressOptions, thumbnail_size: u32) -> Self {
        Self {
            options,
            thumbnail_size,
            items: Vec::new(),
            next_id: 0,
        }
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a file and build its preview.
    ///
    /// Unsupported types are refused and nothing is queued; so is a file
    /// whose preview cannot be decoded. Returns the new item's id.
    pub fn enqueue(
        &mut self,
        backend: &impl ImageBackend,
        asset: ImageAsset,
    ) -> Result<u64, UploadError> {
        if !is_valid_image_type(&asset) {
            return Err(ImagingError::UnsupportedType(asset.media_type.clone()).into());
        }
        let thumbnail = generate_thumbnail(backend, &asset, self.thumbnail_size)?;

        self.next_id += 1;
        let compressed = !needs_compression(&asset, self.options.max_size_mb);
        self.items.push(UploadItem {
            id: self.next_id,
            original: asset,
            compression: None,
            thumbnail,
            compressed,
            status: UploadStatus::Pending,
            progress: 0,
            error: None,
            url: None,
        });
        Ok(self.next_id)
    }

    pub fn remove(&mut self, id: u64) -> Option<UploadItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Compress every pending item that is over the size limit.
    ///
    /// Returns how many were compressed. A failure marks only that item.
    pub fn compress_pending(&mut self, backend: &impl ImageBackend) -> usize {
        let mut done = 0;
        for item in self
            .items
            .iter_mut()
            .filter(|i| !i.compressed && i.status == UploadStatus::Pending)
        {
            item.status = UploadStatus::Compressing;
            match compress_image(backend, &item.original, &self.options) {
                Ok(result) => {
                    item.compression = Some(result);
                    item.compressed = true;
                    item.status = UploadStatus::Pending;
                    item.progress = 100;
                    done += 1;
                }
                Err(e) => item.fail(e.into()),
            }
        }
        done
    }

    /// Store and record every pending item into `album_id`.
    ///
    /// Each item is stored, then recorded as a photo (which may make it the
    /// album cover). Items fail independently; the run never aborts.
    pub fn upload_pending(&mut self, gateway: &impl RecordGateway, album_id: &str) -> UploadSummary {
        let mut summary = UploadSummary::default();
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.status == UploadStatus::Pending)
        {
            item.status = UploadStatus::Uploading;
            item.progress = 0;
            match upload_one(gateway, album_id, item) {
                Ok(url) => {
                    item.url = Some(url);
                    item.status = UploadStatus::Completed;
                    item.progress = 100;
                    summary.uploaded += 1;
                }
                Err(e) => {
                    item.fail(e);
                    summary.failed += 1;
                }
            }
        }
        info!(
            "uploaded {} photo(s) to album {album_id}, {} failed",
            summary.uploaded, summary.failed
        );
        summary
    }

    /// Drop completed items, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.status != UploadStatus::Completed);
        before - self.items.len()
    }

    pub fn totals(&self) -> QueueTotals {
        let original_size: u64 = self.items.iter().map(|i| i.original.size()).sum();
        let current_size: u64 = self.items.iter().map(|i| i.asset().size()).sum();
        let savings_percent = if original_size > 0 {
            (original_size as f64 - current_size as f64) / original_size as f64 * 100.0
        } else {
            0.0
        };
        QueueTotals {
            original_size,
            current_size,
            savings_percent,
        }
    }
}

fn upload_one(
    gateway: &impl RecordGateway,
    album_id: &str,
    item: &mut UploadItem,
) -> Result<String, UploadError> {
    let asset = item.asset();
    let stored = gateway.store_file(&asset.bytes, &asset.name, album_id)?;
    let data = NewPhoto {
        album_id: album_id.to_string(),
        filename: stored.key,
        original_filename: item.original.name.clone(),
        url: stored.url.clone(),
        thumbnail_url: None,
        alt_text: None,
        caption: None,
        file_size: asset.size(),
        width: asset.dimensions.map(|d| d.width),
        height: asset.dimensions.map(|d| d.height),
    };
    item.progress = 75;
    record_photo(gateway, data)?;
    Ok(stored.url)
}
