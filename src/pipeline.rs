// src/pipeline.rs
//! Normalization pipeline: one `RawListing` in, one `NormalizedListing` out.
//!
//! `Normalizer` owns the compiled tables and is immutable after construction,
//! so a single instance is shared freely across threads and tasks.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::{Lazy, OnceCell};
use std::sync::Arc;
use tracing::info;

use crate::condition::ConditionClassifier;
use crate::config::NormalizerConfig;
use crate::currency::{self, CurrencyCode, ExchangeRates, MultiCurrencyPrice};
use crate::geo::GeoResolver;
use crate::premium::PremiumTable;
use crate::sale_date::{self, AuctionStatus, RawEndTime};
use crate::trim::TrimExtractor;
use crate::types::{
    ConditionClass, CountryCode, NormalizedListing, Platform, RawListing, TrimAndBodyStyle,
};

// Dev logging gate: NORMALIZER_DEV_LOG=1 AND dev env
// (debug build or NORMALIZER_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("NORMALIZER_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("NORMALIZER_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short, stable id for a listing so logs never carry scraped text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn dev_log_listing(raw: &RawListing, out: &NormalizedListing) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(&raw.title);
    info!(
        target: "normalizer",
        %id,
        platform = %raw.platform,
        condition = %out.condition,
        country = ?out.country_code.map(|c| c.to_string()),
        trim = ?out.trim,
        body_style = ?out.body_style,
        status = ?out.status,
        has_sale_date = out.sale_date.is_some(),
        "normalized listing"
    );
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "normalize_listings_total",
            "Listings passed through the normalizer."
        );
        describe_counter!(
            "normalize_condition_total",
            "Normalized listings by condition class."
        );
        describe_counter!(
            "normalize_country_unresolved_total",
            "Listings whose location did not resolve to a country."
        );
    });
}

fn record(out: &NormalizedListing) {
    ensure_metrics_described();
    counter!("normalize_listings_total").increment(1);
    counter!("normalize_condition_total", "class" => out.condition.as_str()).increment(1);
    if out.country_code.is_none() {
        counter!("normalize_country_unresolved_total").increment(1);
    }
}

/// Compiled, validated tables plus the per-listing composition.
#[derive(Debug, Clone)]
pub struct Normalizer {
    condition: ConditionClassifier,
    geo: GeoResolver,
    trims: TrimExtractor,
    premiums: PremiumTable,
    rates: ExchangeRates,
}

impl Normalizer {
    /// Validate and compile every table. Any gap or inconsistency is an error.
    pub fn from_config(cfg: &NormalizerConfig) -> Result<Self> {
        let rates = if cfg.currency.rates.is_empty() {
            ExchangeRates::default()
        } else {
            ExchangeRates::from_map(&cfg.currency.rates).context("currency rates")?
        };
        Ok(Self {
            condition: ConditionClassifier::from_config(&cfg.condition)
                .context("condition signals")?,
            geo: GeoResolver::from_config(&cfg.geo).context("geo tables")?,
            trims: TrimExtractor::from_config(&cfg.patterns).context("pattern library")?,
            premiums: PremiumTable::from_config(&cfg.platforms).context("platform table")?,
            rates,
        })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Self::from_config(&NormalizerConfig::from_toml_str(toml_str)?)
    }

    /// Tables from `$NORMALIZER_CONFIG_PATH`, else the embedded defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&NormalizerConfig::load_default()?)
    }

    pub fn classify_condition(&self, text: Option<&str>) -> ConditionClass {
        self.condition.classify(text)
    }

    pub fn condition_classifier(&self) -> &ConditionClassifier {
        &self.condition
    }

    pub fn resolve_country(&self, location: Option<&str>) -> Option<CountryCode> {
        self.geo.resolve(location)
    }

    pub fn extract_trim_and_body_style(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> TrimAndBodyStyle {
        self.trims.extract(title, description)
    }

    pub fn trim_extractor(&self) -> &TrimExtractor {
        &self.trims
    }

    pub fn buyers_premium_percent(&self, platform: Platform) -> f64 {
        self.premiums.buyers_premium_percent(platform)
    }

    pub fn derive_sale_date(
        &self,
        end_time: Option<&RawEndTime>,
        status: Option<&str>,
    ) -> Option<DateTime<Utc>> {
        sale_date::derive_sale_date(end_time, status)
    }

    pub fn detect_currency(
        &self,
        platform: Platform,
        raw_price_text: Option<&str>,
    ) -> CurrencyCode {
        currency::detect_with_home(raw_price_text, self.premiums.home_currency(platform))
    }

    pub fn normalize_price(
        &self,
        amount: Option<f64>,
        currency: CurrencyCode,
    ) -> MultiCurrencyPrice {
        currency::normalize_price(amount, currency, &self.rates)
    }

    /// Normalize one listing. Total: never fails, absent signals become neutral values.
    /// Every call is counted in the `normalize_*` metrics.
    pub fn normalize(&self, raw: &RawListing) -> NormalizedListing {
        let description = raw.description.as_deref();
        let TrimAndBodyStyle { trim, body_style } =
            self.trims.extract(&raw.title, description);
        let currency = self.detect_currency(raw.platform, raw.raw_price_text.as_deref());

        let out = NormalizedListing {
            condition: self.condition.classify(description),
            country_code: self.geo.resolve(raw.location.as_deref()),
            trim,
            body_style,
            buyers_premium_percent: self.premiums.buyers_premium_percent(raw.platform),
            sale_date: sale_date::derive_sale_date(raw.end_time.as_ref(), raw.status.as_deref()),
            status: AuctionStatus::parse(raw.status.as_deref()),
            currency,
            prices: self.normalize_price(raw.current_bid, currency),
        };

        record(&out);
        dev_log_listing(raw, &out);
        out
    }

    /// Sequential batch; output order follows input order.
    pub fn normalize_batch(&self, raws: &[RawListing]) -> Vec<NormalizedListing> {
        raws.iter().map(|r| self.normalize(r)).collect()
    }

    /// Partition a batch across blocking tasks. Output order follows input order.
    pub async fn normalize_concurrent(
        self: Arc<Self>,
        raws: Vec<RawListing>,
        workers: usize,
    ) -> Result<Vec<NormalizedListing>> {
        if raws.is_empty() {
            return Ok(Vec::new());
        }
        let chunk_size = raws.len().div_ceil(workers.max(1));

        let mut handles = Vec::new();
        let mut rest = raws;
        while !rest.is_empty() {
            let tail = rest.split_off(chunk_size.min(rest.len()));
            let chunk = std::mem::replace(&mut rest, tail);
            let me = Arc::clone(&self);
            handles.push(tokio::task::spawn_blocking(move || me.normalize_batch(&chunk)));
        }

        let mut out = Vec::new();
        for h in handles {
            out.extend(h.await.context("normalize worker panicked")?);
        }
        Ok(out)
    }
}

static DEFAULT_NORMALIZER: Lazy<Normalizer> = Lazy::new(|| {
    Normalizer::from_toml_str(crate::config::DEFAULT_CONFIG_TOML)
        .expect("embedded normalizer config must be valid")
});

/// Process-wide normalizer built from the embedded tables on first use.
pub fn default_normalizer() -> &'static Normalizer {
    &DEFAULT_NORMALIZER
}
