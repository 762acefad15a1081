// src/config.rs
//! Static lookup tables, loaded from TOML.
//!
//! The shipped tables live in `config/normalizer.toml` and are embedded at
//! compile time. `NORMALIZER_CONFIG_PATH` points at a replacement file.
//! Tables are validated when a `Normalizer` is built from them; after that
//! they are read-only.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::currency::CurrencyCode;

pub const ENV_NORMALIZER_CONFIG_PATH: &str = "NORMALIZER_CONFIG_PATH";

/// Embedded default tables.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/normalizer.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    pub platforms: HashMap<String, PlatformCfg>,
    pub condition: ConditionCfg,
    pub geo: GeoCfg,
    pub patterns: PatternsCfg,
    #[serde(default)]
    pub currency: CurrencyCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformCfg {
    pub buyers_premium_percent: f64,
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::Usd
}

/// Phrase → weight, one map per condition class.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionCfg {
    #[serde(default)]
    pub original: HashMap<String, u32>,
    #[serde(default)]
    pub restored: HashMap<String, u32>,
    #[serde(default)]
    pub modified: HashMap<String, u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoCfg {
    #[serde(default)]
    pub us_regions: Vec<String>,
    #[serde(default)]
    pub ca_regions: Vec<String>,
    /// Country names and aliases → code.
    #[serde(default)]
    pub countries: HashMap<String, String>,
    /// Stand-alone place names (whole location string) → code.
    #[serde(default)]
    pub places: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternsCfg {
    #[serde(default)]
    pub trim: Vec<PatternEntry>,
    #[serde(default)]
    pub body_style: Vec<PatternEntry>,
}

/// Either `"GT3 RS"` or `{ canonical = "Coupe", matches = ["Coupé"] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternEntry {
    Plain(String),
    Detailed {
        canonical: String,
        #[serde(default)]
        matches: Vec<String>,
    },
}

impl PatternEntry {
    pub fn canonical(&self) -> &str {
        match self {
            PatternEntry::Plain(s) => s,
            PatternEntry::Detailed { canonical, .. } => canonical,
        }
    }

    pub fn alternatives(&self) -> &[String] {
        match self {
            PatternEntry::Plain(_) => &[],
            PatternEntry::Detailed { matches, .. } => matches,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrencyCfg {
    /// from → (to → rate). Empty means built-in rates.
    #[serde(default)]
    pub rates: HashMap<String, HashMap<String, f64>>,
}

impl NormalizerConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: NormalizerConfig = toml::from_str(toml_str)?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading normalizer config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing normalizer config {}", path.display()))
    }

    /// `$NORMALIZER_CONFIG_PATH` if set (must exist), else the embedded tables.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_NORMALIZER_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{ENV_NORMALIZER_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                ));
            }
            return Self::load_from(&pb);
        }
        Self::embedded()
    }

    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG_TOML).context("parsing embedded normalizer config")
    }
}
