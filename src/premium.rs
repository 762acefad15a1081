// src/premium.rs
//! Buyer's premium per platform.
//!
//! The table must cover every `Platform`; a gap is a configuration defect and
//! is reported when the table is built, never on a per-listing lookup.

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::config::PlatformCfg;
use crate::currency::CurrencyCode;
use crate::types::Platform;

/// Fully populated platform table (premium + home currency).
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumTable {
    percents: [f64; Platform::ALL.len()],
    currencies: [CurrencyCode; Platform::ALL.len()],
}

/// Percentages are kept at one decimal place.
fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

impl PremiumTable {
    pub fn from_config(platforms: &HashMap<String, PlatformCfg>) -> Result<Self> {
        let mut percents: [Option<f64>; Platform::ALL.len()] = [None; Platform::ALL.len()];
        let mut currencies = [CurrencyCode::Usd; Platform::ALL.len()];

        for (key, cfg) in platforms {
            let platform: Platform = key.parse()?;
            let pct = cfg.buyers_premium_percent;
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(anyhow!(
                    "buyer's premium for {platform} must be within 0..=100, got {pct}"
                ));
            }
            percents[platform.index()] = Some(round_tenth(pct));
            currencies[platform.index()] = cfg.currency;
        }

        let mut table = [0.0; Platform::ALL.len()];
        for platform in Platform::ALL {
            table[platform.index()] = percents[platform.index()]
                .ok_or_else(|| anyhow!("platform {platform} has no buyer's premium entry"))?;
        }

        Ok(Self {
            percents: table,
            currencies,
        })
    }

    pub fn buyers_premium_percent(&self, platform: Platform) -> f64 {
        self.percents[platform.index()]
    }

    pub fn home_currency(&self, platform: Platform) -> CurrencyCode {
        self.currencies[platform.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pct: f64) -> PlatformCfg {
        PlatformCfg {
            buyers_premium_percent: pct,
            currency: CurrencyCode::Usd,
        }
    }

    fn full() -> HashMap<String, PlatformCfg> {
        HashMap::from([
            ("BRING_A_TRAILER".to_string(), entry(5.0)),
            ("CARS_AND_BIDS".to_string(), entry(4.5)),
            ("COLLECTING_CARS".to_string(), entry(10.0)),
        ])
    }

    #[test]
    fn lookup_by_platform() {
        let t = PremiumTable::from_config(&full()).unwrap();
        assert_eq!(t.buyers_premium_percent(Platform::CarsAndBids), 4.5);
    }

    #[test]
    fn missing_platform_is_a_config_defect() {
        let mut cfg = full();
        cfg.remove("COLLECTING_CARS");
        let err = PremiumTable::from_config(&cfg).unwrap_err().to_string();
        assert!(err.contains("COLLECTING_CARS"), "{err}");
    }

    #[test]
    fn unknown_platform_key_is_rejected() {
        let mut cfg = full();
        cfg.insert("EBAY_MOTORS".into(), entry(3.0));
        assert!(PremiumTable::from_config(&cfg).is_err());
    }

    #[test]
    fn out_of_range_premium_is_rejected() {
        let mut cfg = full();
        cfg.insert("CARS_AND_BIDS".into(), entry(150.0));
        assert!(PremiumTable::from_config(&cfg).is_err());
    }

    #[test]
    fn rounds_to_one_decimal() {
        let mut cfg = full();
        cfg.insert("CARS_AND_BIDS".into(), entry(4.549));
        let t = PremiumTable::from_config(&cfg).unwrap();
        assert_eq!(t.buyers_premium_percent(Platform::CarsAndBids), 4.5);
    }
}
