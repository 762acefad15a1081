// src/sale_date.rs
//! Sale-date derivation: a listing only has a sale date once its auction
//! has concluded, and only if the scraped end time is a real instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state parsed from the raw status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Active,
    Sold,
    Ended,
}

impl AuctionStatus {
    /// Case-insensitive; anything that is not a concluded marker counts as active.
    pub fn parse(raw: Option<&str>) -> Self {
        let upper = raw.unwrap_or_default().trim().to_ascii_uppercase();
        match upper.as_str() {
            "SOLD" => AuctionStatus::Sold,
            "ENDED" => AuctionStatus::Ended,
            _ => AuctionStatus::Active,
        }
    }

    pub fn is_concluded(self) -> bool {
        matches!(self, AuctionStatus::Sold | AuctionStatus::Ended)
    }
}

/// End time as scrapers hand it over: an instant, epoch millis, or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEndTime {
    At(DateTime<Utc>),
    EpochMillis(i64),
    Text(String),
}

impl RawEndTime {
    /// Resolve to an instant; `None` when the value does not denote a valid time.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            RawEndTime::At(at) => Some(*at),
            RawEndTime::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
            RawEndTime::Text(s) => parse_timestamp(s),
        }
    }
}

impl From<DateTime<Utc>> for RawEndTime {
    fn from(at: DateTime<Utc>) -> Self {
        RawEndTime::At(at)
    }
}

impl From<&str> for RawEndTime {
    fn from(s: &str) -> Self {
        RawEndTime::Text(s.to_string())
    }
}

impl From<String> for RawEndTime {
    fn from(s: String) -> Self {
        RawEndTime::Text(s)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse the textual timestamp shapes seen across platforms.
/// Offsets are honoured; naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Definitive sale timestamp: present only for a concluded status with a valid end time.
pub fn derive_sale_date(
    end_time: Option<&RawEndTime>,
    status: Option<&str>,
) -> Option<DateTime<Utc>> {
    if !AuctionStatus::parse(status).is_concluded() {
        return None;
    }
    end_time?.to_instant()
}
