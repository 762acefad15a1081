// src/types.rs
//! Domain types shared by the transforms: platform ids, condition classes,
//! country codes and the raw / normalized listing records.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::currency::{CurrencyCode, MultiCurrencyPrice};
use crate::sale_date::{AuctionStatus, RawEndTime};

/// Closed set of supported auction platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    BringATrailer,
    CarsAndBids,
    CollectingCars,
}

impl Platform {
    pub const ALL: [Platform; 3] = [
        Platform::BringATrailer,
        Platform::CarsAndBids,
        Platform::CollectingCars,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::BringATrailer => "BRING_A_TRAILER",
            Platform::CarsAndBids => "CARS_AND_BIDS",
            Platform::CollectingCars => "COLLECTING_CARS",
        }
    }

    /// Dense index into per-platform arrays.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    /// Accepts the canonical ids case-insensitively, with `-` or space for `_`.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| anyhow!("unknown platform `{}`", s.trim()))
    }
}

/// Coarse authenticity / modification class of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionClass {
    Original,
    Restored,
    Modified,
    Unknown,
}

impl ConditionClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionClass::Original => "original",
            ConditionClass::Restored => "restored",
            ConditionClass::Modified => "modified",
            ConditionClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConditionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-letter uppercase country code (ISO 3166-1 alpha-2 style).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    pub(crate) const fn from_static(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let t = raw.trim();
        match t.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(anyhow!("invalid country code `{t}` (expected 2 letters)")),
        }
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for CountryCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CountryCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One scraped listing as handed over by a platform scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub platform: Platform,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form, case-insensitive ("active", "SOLD", "ended", ...).
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub end_time: Option<RawEndTime>,
    #[serde(default)]
    pub current_bid: Option<f64>,
    /// Price as displayed by the platform, e.g. "£95,000".
    #[serde(default)]
    pub raw_price_text: Option<String>,
}

impl RawListing {
    pub fn new(platform: Platform, title: impl Into<String>) -> Self {
        Self {
            platform,
            title: title.into(),
            description: None,
            location: None,
            status: None,
            end_time: None,
            current_bid: None,
            raw_price_text: None,
        }
    }
}

/// Trim and body-style designations extracted from a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimAndBodyStyle {
    pub trim: Option<String>,
    pub body_style: Option<String>,
}

/// Canonical, typed view of a listing produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedListing {
    pub condition: ConditionClass,
    pub country_code: Option<CountryCode>,
    pub trim: Option<String>,
    pub body_style: Option<String>,
    pub buyers_premium_percent: f64,
    pub sale_date: Option<DateTime<Utc>>,
    pub status: AuctionStatus,
    pub currency: CurrencyCode,
    pub prices: MultiCurrencyPrice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_loosely() {
        assert_eq!(
            "bring_a_trailer".parse::<Platform>().unwrap(),
            Platform::BringATrailer
        );
        assert_eq!(
            " Cars-And-Bids ".parse::<Platform>().unwrap(),
            Platform::CarsAndBids
        );
        assert!("EBAY_MOTORS".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_index_matches_all_order() {
        for (i, p) in Platform::ALL.into_iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn country_code_validates() {
        assert_eq!(CountryCode::parse("gb").unwrap(), "GB");
        assert!(CountryCode::parse("USA").is_err());
        assert!(CountryCode::parse("U1").is_err());
        assert!(CountryCode::parse("").is_err());
    }

    #[test]
    fn raw_listing_deserializes_scraper_shape() {
        let json = r#"{
            "platform": "COLLECTING_CARS",
            "title": "1973 BMW 3.0 CSL",
            "location": "London, UK",
            "status": "sold",
            "endTime": "2025-06-15T18:00:00Z"
        }"#;
        let raw: RawListing = serde_json::from_str(json).unwrap();
        assert_eq!(raw.platform, Platform::CollectingCars);
        assert!(raw.description.is_none());
        assert!(raw.end_time.is_some());
        assert!(raw.current_bid.is_none());
    }
}
