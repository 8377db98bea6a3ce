//! Album catalog: records, structured filters, and free-text search.
//!
//! Everything here is pure and works over an album list the caller already
//! fetched. Nothing errors; input that cannot match simply does not match.
//!
//! ```
//! use school_gallery::catalog::{FilterCriteria, search};
//! # let albums: Vec<school_gallery::catalog::AlbumRecord> = Vec::new();
//! let criteria = FilterCriteria::default()
//!     .with_categories(["sports"])
//!     .with_photo_count_range(50, 100);
//! let results = search(&albums, "sports day", &criteria);
//! # assert!(results.is_empty());
//! ```

mod filter;
mod record;
mod search;

pub use filter::{
    FilterCriteria, MONTHS, album_date, browse, normalize_month, parse_event_date, year_options,
};
pub use record::{AlbumRecord, AlbumUpdate, NewAlbum, NewPhoto, PhotoRecord};
pub use search::{Catalog, DEFAULT_PLACEHOLDER_COVER, ResultKind, SearchResult, search};
