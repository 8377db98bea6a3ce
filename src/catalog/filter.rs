//! Structured album filters: category, year, month, photo count.
//!
//! Every dimension is OR within its set and AND across dimensions. An empty
//! set places no restriction on its dimension.

use super::record::AlbumRecord;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Zero-padded month values with their display labels.
pub const MONTHS: [(&str, &str); 12] = [
    ("01", "January"),
    ("02", "February"),
    ("03", "March"),
    ("04", "April"),
    ("05", "May"),
    ("06", "June"),
    ("07", "July"),
    ("08", "August"),
    ("09", "September"),
    ("10", "October"),
    ("11", "November"),
    ("12", "December"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    /// Four-digit years, e.g. `"2024"`.
    pub years: BTreeSet<String>,
    /// Zero-padded months, `"01"` to `"12"`. Anything else matches nothing.
    pub months: BTreeSet<String>,
    /// Inclusive `(min, max)` bounds on `photo_count`.
    pub photo_count_range: (u32, u32),
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            categories: BTreeSet::new(),
            years: BTreeSet::new(),
            months: BTreeSet::new(),
            photo_count_range: (0, u32::MAX),
        }
    }
}

impl FilterCriteria {
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years<I, S>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.years = years.into_iter().map(Into::into).collect();
        self
    }

    /// Months are normalized to two digits. Values that are not a month
    /// (`"13"`, `"march"`) are kept trimmed, so they still restrict and match
    /// no album.
    pub fn with_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.months = months
            .into_iter()
            .map(|m| {
                let m = m.as_ref();
                normalize_month(m).unwrap_or_else(|| m.trim().to_string())
            })
            .collect();
        self
    }

    pub fn with_photo_count_range(mut self, min: u32, max: u32) -> Self {
        self.photo_count_range = (min, max);
        self
    }

    /// True when no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty()
            && self.years.is_empty()
            && self.months.is_empty()
            && self.photo_count_range == (0, u32::MAX)
    }

    /// Does `album` pass every structured dimension?
    pub fn matches(&self, album: &AlbumRecord) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&album.category) {
            return false;
        }

        if !self.years.is_empty() || !self.months.is_empty() {
            let date = album_date(album);
            if !self.years.is_empty() && !self.years.contains(&date.format("%Y").to_string()) {
                return false;
            }
            if !self.months.is_empty() && !self.months.contains(&date.format("%m").to_string()) {
                return false;
            }
        }

        let (min, max) = self.photo_count_range;
        (min..=max).contains(&album.photo_count)
    }
}

/// Two-digit form of a month number: `"3"` → `"03"`. `None` outside 1..=12.
pub fn normalize_month(value: &str) -> Option<String> {
    let month: u32 = value.trim().parse().ok()?;
    (1..=12).contains(&month).then(|| format!("{month:02}"))
}

/// Read a calendar date out of a free-form event date.
///
/// Accepts RFC 3339 timestamps and anything that begins with `YYYY-MM-DD`.
pub fn parse_event_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// The date filters see: the event date when it parses, else the creation day.
pub fn album_date(album: &AlbumRecord) -> NaiveDate {
    album
        .event_date
        .as_deref()
        .and_then(parse_event_date)
        .unwrap_or_else(|| album.created_at.date_naive())
}

/// Distinct years present in `albums`, newest first.
pub fn year_options(albums: &[AlbumRecord]) -> Vec<String> {
    let years: BTreeSet<String> = albums
        .iter()
        .map(|a| album_date(a).format("%Y").to_string())
        .collect();
    years.into_iter().rev().collect()
}

/// Structured filters only, with no text query. Input order is preserved.
pub fn browse<'a>(albums: &'a [AlbumRecord], criteria: &FilterCriteria) -> Vec<&'a AlbumRecord> {
    albums.iter().filter(|a| criteria.matches(a)).collect()
}
