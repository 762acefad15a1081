// src/geo.rs
//! Free-text location → country code.
//!
//! Locations look like "City, Region", "City, Country" or a bare place name.
//! Resolution order, all on exact (folded) tokens, never substrings:
//! 1. trailing segment after a comma is a US state → `US`
//! 2. trailing segment after a comma is a Canadian province → `CA`
//! 3. trailing segment is a country name / alias → that country
//! 4. whole string (no comma) is a known place name → its country
//!
//! Anything else resolves to `None`.

use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};

use crate::config::GeoCfg;
use crate::text;
use crate::types::CountryCode;

const US: CountryCode = CountryCode::from_static(*b"US");
const CA: CountryCode = CountryCode::from_static(*b"CA");

#[derive(Debug, Clone)]
pub struct GeoResolver {
    us_regions: HashSet<String>,
    ca_regions: HashSet<String>,
    countries: HashMap<String, CountryCode>,
    places: HashMap<String, CountryCode>,
}

fn fold_keys(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .map(|s| text::fold(s))
        .filter(|s| !s.is_empty())
        .collect()
}

fn compile_table(
    label: &str,
    table: &HashMap<String, String>,
) -> Result<HashMap<String, CountryCode>> {
    table
        .iter()
        .map(|(name, code)| {
            let cc = CountryCode::parse(code)
                .with_context(|| format!("geo {label} entry `{name}`"))?;
            Ok((text::fold(name), cc))
        })
        .collect()
}

impl GeoResolver {
    pub fn from_config(cfg: &GeoCfg) -> Result<Self> {
        Ok(Self {
            us_regions: fold_keys(&cfg.us_regions),
            ca_regions: fold_keys(&cfg.ca_regions),
            countries: compile_table("countries", &cfg.countries)?,
            places: compile_table("places", &cfg.places)?,
        })
    }

    pub fn resolve(&self, location: Option<&str>) -> Option<CountryCode> {
        let folded = text::fold_opt(location)?;
        let segments: Vec<&str> = folded
            .split(',')
            .map(|s| s.trim().trim_end_matches('.'))
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => None,
            [only] if !folded.contains(',') => self
                .countries
                .get(*only)
                .or_else(|| self.places.get(*only))
                .copied(),
            [.., last] => {
                if self.us_regions.contains(*last) {
                    Some(US)
                } else if self.ca_regions.contains(*last) {
                    Some(CA)
                } else {
                    self.countries.get(*last).copied()
                }
            }
        }
    }
}
