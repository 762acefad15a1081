// src/currency.rs
//! Currency detection and multi-currency price normalization.
//!
//! Platforms quote prices in their home currency; the displayed price text
//! (when present) overrides that default. Prices are then converted into
//! USD / EUR / GBP with a fixed rate table and rounded to cents.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 3] = [CurrencyCode::Usd, CurrencyCode::Eur, CurrencyCode::Gbp];

    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| anyhow!("unknown currency `{}`", s.trim()))
    }
}

/// Conversion factors: `rate(from, to)` units of `to` per unit of `from`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates {
    table: [[f64; 3]; 3],
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            table: [
                // to: USD   EUR   GBP
                [1.0, 0.92, 0.79],  // from USD
                [1.09, 1.0, 0.86],  // from EUR
                [1.27, 1.16, 1.0],  // from GBP
            ],
        }
    }
}

impl ExchangeRates {
    /// Build from a `from -> (to -> rate)` map; every pair must be present and positive.
    pub fn from_map(map: &HashMap<String, HashMap<String, f64>>) -> Result<Self> {
        let mut table = [[0.0; 3]; 3];
        let mut seen = [[false; 3]; 3];
        for (from_key, row) in map {
            let from = from_key.parse::<CurrencyCode>()?;
            for (to_key, &rate) in row {
                let to = to_key.parse::<CurrencyCode>()?;
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(anyhow!("exchange rate {from}->{to} must be positive, got {rate}"));
                }
                table[from.index()][to.index()] = rate;
                seen[from.index()][to.index()] = true;
            }
        }
        for from in CurrencyCode::ALL {
            for to in CurrencyCode::ALL {
                if !seen[from.index()][to.index()] {
                    return Err(anyhow!("missing exchange rate {from}->{to}"));
                }
            }
        }
        Ok(Self { table })
    }

    pub fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> f64 {
        self.table[from.index()][to.index()]
    }
}

/// A price expressed in all supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiCurrencyPrice {
    pub price_usd: Option<f64>,
    pub price_eur: Option<f64>,
    pub price_gbp: Option<f64>,
    pub original_currency: CurrencyCode,
}

/// Currency of a listing price: explicit symbol in the price text wins,
/// otherwise the platform's home currency.
pub fn detect_with_home(raw_price_text: Option<&str>, home_currency: CurrencyCode) -> CurrencyCode {
    if let Some(text) = raw_price_text {
        if text.contains('\u{00A3}') {
            return CurrencyCode::Gbp;
        }
        if text.contains('\u{20AC}') || text.to_ascii_uppercase().contains("EUR") {
            return CurrencyCode::Eur;
        }
        if text.contains('$') {
            return CurrencyCode::Usd;
        }
    }
    home_currency
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Convert `amount` (in `currency`) into USD / EUR / GBP, rounded to 2 decimals.
pub fn normalize_price(
    amount: Option<f64>,
    currency: CurrencyCode,
    rates: &ExchangeRates,
) -> MultiCurrencyPrice {
    let convert = |to: CurrencyCode| {
        amount
            .filter(|a| a.is_finite())
            .map(|a| round_cents(a * rates.rate(currency, to)))
    };
    MultiCurrencyPrice {
        price_usd: convert(CurrencyCode::Usd),
        price_eur: convert(CurrencyCode::Eur),
        price_gbp: convert(CurrencyCode::Gbp),
        original_currency: currency,
    }
}
