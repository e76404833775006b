//! VOD metadata carried through the mirroring pipeline

use chrono::{Local, NaiveDate};

/// One finished broadcast as reported by the source platform.
///
/// `id` is the sole identity key: two records with the same id are the same
/// VOD even if the title has since been edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vod {
    /// Platform-assigned stable identifier.
    pub id: String,
    /// Free-text title, may contain arbitrary Unicode.
    pub title: String,
    /// ISO-8601 creation timestamp, when the platform reports one.
    pub created_at: Option<String>,
    /// Display name of the broadcaster, when available.
    pub owner: Option<String>,
}

impl Vod {
    /// Date the broadcast was recorded, falling back to today when the
    /// platform omitted the timestamp.
    pub fn recorded_date(&self) -> NaiveDate {
        self.created_at
            .as_deref()
            .and_then(parse_iso_date)
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Parse the date portion of an ISO-8601 timestamp like
/// `2025-12-18T20:01:02Z`.
fn parse_iso_date(timestamp: &str) -> Option<NaiveDate> {
    let date_part = timestamp.split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
