// src/ingest/file.rs
//! Listings from a JSON file: either one array or one object per line.
//!
//! Records are decoded one at a time. A record that does not fit
//! `RawListing` is rejected on its own; the rest of the file still counts.

use anyhow::{Context, Result};
use metrics::counter;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::ingest::types::ListingSource;
use crate::types::RawListing;

pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A record that could not be decoded. `position` is the 1-based line
/// (JSON lines) or array element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub position: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedListings {
    pub listings: Vec<RawListing>,
    pub rejected: Vec<RejectedRecord>,
}

impl ParsedListings {
    fn push(&mut self, position: usize, decoded: serde_json::Result<RawListing>) {
        match decoded {
            Ok(raw) => self.listings.push(raw),
            Err(e) => self.rejected.push(RejectedRecord {
                position,
                reason: e.to_string(),
            }),
        }
    }
}

/// Parse a JSON array, falling back to JSON lines (blank lines skipped).
/// Only a file that is not a JSON array at all fails as a whole.
pub fn parse_listings(content: &str) -> Result<ParsedListings> {
    let mut out = ParsedListings::default();

    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        let items: Vec<Value> = serde_json::from_str(trimmed).context("parsing listing array")?;
        for (i, item) in items.into_iter().enumerate() {
            out.push(i + 1, serde_json::from_value::<RawListing>(item));
        }
        return Ok(out);
    }

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        out.push(i + 1, serde_json::from_str::<RawListing>(line));
    }
    Ok(out)
}

#[async_trait::async_trait]
impl ListingSource for JsonFileSource {
    async fn fetch_listings(&self) -> Result<Vec<RawListing>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading listings from {}", self.path.display()))?;
        let parsed = parse_listings(&content)
            .with_context(|| format!("parsing listings in {}", self.path.display()))?;

        for r in &parsed.rejected {
            tracing::warn!(
                source = self.name(),
                path = %self.path.display(),
                position = r.position,
                reason = %r.reason,
                "rejected listing record"
            );
            counter!("ingest_records_rejected_total", "source" => self.name()).increment(1);
        }
        Ok(parsed.listings)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}
