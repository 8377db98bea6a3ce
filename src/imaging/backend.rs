//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, resize, and thumbnail. All of them work on in-memory
//! assets and return encoded bytes; nothing here touches the filesystem.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::asset::ImageAsset;
use super::params::{ResizeParams, ThumbnailParams};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImagingError {
    /// The bytes could not be interpreted as an image.
    #[error("Failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },
    /// The raster could not be serialized back to bytes.
    #[error("Failed to encode {name}: {reason}")]
    Encode { name: String, reason: String },
    /// The declared media type is not in the allow-list.
    #[error("Unsupported image type: {0:?}")]
    UnsupportedType(String),
}

impl ImagingError {
    pub fn decode(name: &str, reason: impl ToString) -> Self {
        Self::Decode {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(name: &str, reason: impl ToString) -> Self {
        Self::Encode {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A single item that failed inside a batch, with the item's identity.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("item {index} ({name}): {source}")]
pub struct BatchItemError {
    pub index: usize,
    pub name: String,
    #[source]
    pub source: ImagingError,
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations hold no state shared between calls, but the pipeline still
/// drives one operation at a time; nothing requires a backend to be `Sync`.
pub trait ImageBackend {
    /// Decode enough of the asset to report its pixel dimensions.
    fn identify(&self, asset: &ImageAsset) -> Result<Dimensions, ImagingError>;

    /// Resize to exactly `params.width × params.height` and encode.
    fn resize(&self, asset: &ImageAsset, params: &ResizeParams) -> Result<Vec<u8>, ImagingError>;

    /// Crop `params.crop`, scale to a `params.size` square, encode as JPEG.
    fn thumbnail(
        &self,
        asset: &ImageAsset,
        params: &ThumbnailParams,
    ) -> Result<Vec<u8>, ImagingError>;
}
