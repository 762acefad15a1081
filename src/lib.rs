// src/lib.rs
//! Normalization layer for scraped vehicle-auction listings.
//!
//! Five pure transforms (condition class, country, trim/body style, buyer's
//! premium, sale date) composed by [`Normalizer::normalize`]. The free
//! functions below run against the process-wide default tables.

pub mod condition;
pub mod config;
pub mod currency;
pub mod geo;
pub mod ingest;
pub mod pipeline;
pub mod premium;
pub mod sale_date;
pub mod text;
pub mod trim;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::currency::{CurrencyCode, ExchangeRates, MultiCurrencyPrice};
pub use crate::pipeline::{default_normalizer, Normalizer};
pub use crate::sale_date::{AuctionStatus, RawEndTime};
pub use crate::types::{
    ConditionClass, CountryCode, NormalizedListing, Platform, RawListing, TrimAndBodyStyle,
};

use chrono::{DateTime, Utc};

pub fn classify_condition(text: Option<&str>) -> ConditionClass {
    default_normalizer().classify_condition(text)
}

pub fn resolve_country(location: Option<&str>) -> Option<CountryCode> {
    default_normalizer().resolve_country(location)
}

pub fn extract_trim_and_body_style(title: &str, description: Option<&str>) -> TrimAndBodyStyle {
    default_normalizer().extract_trim_and_body_style(title, description)
}

pub fn buyers_premium_percent(platform: Platform) -> f64 {
    default_normalizer().buyers_premium_percent(platform)
}

pub fn derive_sale_date(
    end_time: Option<&RawEndTime>,
    status: Option<&str>,
) -> Option<DateTime<Utc>> {
    sale_date::derive_sale_date(end_time, status)
}

pub fn detect_currency(platform: Platform, raw_price_text: Option<&str>) -> CurrencyCode {
    default_normalizer().detect_currency(platform, raw_price_text)
}

pub fn normalize_price(amount: Option<f64>, currency: CurrencyCode) -> MultiCurrencyPrice {
    default_normalizer().normalize_price(amount, currency)
}

pub fn normalize(raw: &RawListing) -> NormalizedListing {
    default_normalizer().normalize(raw)
}
