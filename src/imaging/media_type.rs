//! Accepted upload formats.
//!
//! Only three encodings are accepted into the pipeline. The declared media
//! type of an asset is matched case-insensitively; `image/jpg` is accepted as
//! an alias for `image/jpeg` because browsers and older uploaders emit it.

use image::ImageFormat;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
}

const ALLOWED: &[(&str, MediaType)] = &[
    ("image/jpeg", MediaType::Jpeg),
    ("image/jpg", MediaType::Jpeg),
    ("image/png", MediaType::Png),
    ("image/webp", MediaType::Webp),
];

impl MediaType {
    /// Parse a declared media type. Returns `None` for anything outside the
    /// allow-list (including `image/gif`, `image/tiff`, …).
    pub fn parse(declared: &str) -> Option<Self> {
        let declared = declared.trim();
        ALLOWED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(declared))
            .map(|(_, media)| *media)
    }

    /// Map a file extension to its media type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Canonical MIME string.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}
