//! # School Gallery
//!
//! The core of a school photo-album site: preparing photos before they are
//! uploaded, and finding albums once they are.
//!
//! # Architecture
//!
//! Two pure components sit between the UI and the backend:
//!
//! ```text
//! selected files ─► imaging (validate, compress, thumbnail) ─► upload queue ─► gateway
//! fetched albums ─► catalog (search, filter)                ─► display-ready results
//! ```
//!
//! The backend itself (relational store, object storage, auth) is reached only
//! through the [`gateway`] traits, so everything here runs and tests without a
//! network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Media type allow-list, scale-to-fit compression, square thumbnails, batch compression |
//! | [`catalog`] | Album and photo records, structured filters, free-text search |
//! | [`gateway`] | Record and auth gateway traits, cover policy, admin check, in-memory implementation |
//! | [`upload`] | Per-file upload queue driving compress → store → record |
//! | [`stats`] | Dashboard totals over albums and photos |
//! | [`config`] | `config.toml` loading, validation, merging over stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Sequential Batches
//!
//! Batch compression and uploads handle one file at a time, in input order.
//! Memory use stays bounded by the largest single image, and progress is a
//! simple count. A failing file degrades to a passthrough result or a failed
//! queue item; it never aborts the batch.
//!
//! ## Search Never Fails
//!
//! [`catalog::search`] takes whatever the backend returned. Missing optional
//! fields are treated as empty, an unparseable event date falls back to the
//! creation date, and impossible filters simply match nothing.
//!
//! ## Cover as an Explicit Step
//!
//! The first uploaded photo becomes the album cover through
//! [`gateway::assign_cover_if_absent`], which is idempotent and never replaces
//! an existing cover. [`gateway::record_photo`] runs it after every insert.
//!
//! ## One Category List
//!
//! Album categories are defined once, in `[catalog].categories`, and read from
//! there by the CLI, the filter labels, and the configured gateway.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod imaging;
pub mod output;
pub mod stats;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;
