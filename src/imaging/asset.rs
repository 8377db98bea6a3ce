//! Values flowing through the pipeline.
//!
//! An [`ImageAsset`] is created when a user selects a file and is never
//! mutated afterwards: compression yields a new asset inside a
//! [`CompressionResult`], thumbnailing yields a [`ThumbnailAsset`].

use super::backend::Dimensions;
use super::calculations::compression_ratio;
use super::media_type::MediaType;
use base64::{Engine as _, engine::general_purpose};

/// Raw image bytes plus what the uploader declared about them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// Original file name, used in progress reports and storage keys.
    pub name: String,
    /// Media type as declared by the uploader (not sniffed).
    pub media_type: String,
    pub bytes: Vec<u8>,
    /// Known pixel dimensions. `None` until the asset has been decoded.
    pub dimensions: Option<Dimensions>,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
            dimensions: None,
        }
    }

    /// Byte size of the payload.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The declared type, if it is one the pipeline accepts.
    pub fn parsed_media_type(&self) -> Option<MediaType> {
        MediaType::parse(&self.media_type)
    }
}

/// A re-encoded asset and how much it saved.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub asset: ImageAsset,
    pub original_size: u64,
    pub compressed_size: u64,
    /// Percentage reduction. Negative when re-encoding grew the file,
    /// exactly 0 when the original was empty.
    pub compression_ratio: f64,
}

impl CompressionResult {
    pub fn new(original_size: u64, asset: ImageAsset) -> Self {
        let compressed_size = asset.size();
        Self {
            compression_ratio: compression_ratio(original_size, compressed_size),
            asset,
            original_size,
            compressed_size,
        }
    }

    /// The original asset carried through untouched, 0% savings.
    pub fn passthrough(asset: ImageAsset) -> Self {
        let size = asset.size();
        Self {
            asset,
            original_size: size,
            compressed_size: size,
            compression_ratio: 0.0,
        }
    }

    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}

/// Square preview image, carried inline as a `data:` URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailAsset {
    pub dimensions: Dimensions,
    pub media_type: MediaType,
    pub data_url: String,
}

impl ThumbnailAsset {
    pub fn from_encoded(bytes: &[u8], media_type: MediaType, dimensions: Dimensions) -> Self {
        let data_url = format!(
            "data:{};base64,{}",
            media_type.mime(),
            general_purpose::STANDARD.encode(bytes)
        );
        Self {
            dimensions,
            media_type,
            data_url,
        }
    }

    /// Decode the payload of the data URL back into bytes.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_url.split_once(";base64,")?;
        general_purpose::STANDARD.decode(payload).ok()
    }
}
