//! Batch normalizer binary.
//! Reads raw listings (JSON array or JSON lines) from the file given as the
//! first argument and prints one normalized record per line.

use anyhow::{anyhow, Result};
use auction_listing_normalizer::ingest::file::JsonFileSource;
use auction_listing_normalizer::ingest::run_once;
use auction_listing_normalizer::ingest::types::ListingSource;
use auction_listing_normalizer::Normalizer;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so stdout stays pure JSON lines.
/// NORMALIZER_LOG_FORMAT=json switches to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("auction_listing_normalizer=info,normalizer=info,warn"));

    let json = std::env::var("NORMALIZER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputRecord<'a> {
    platform: auction_listing_normalizer::Platform,
    title: &'a str,
    #[serde(flatten)]
    normalized: &'a auction_listing_normalizer::NormalizedListing,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: auction-listing-normalizer <listings.json>"))?;

    // Startup assertion: every table must validate before any listing is touched.
    let normalizer = Normalizer::from_env()?;

    let sources: Vec<Box<dyn ListingSource>> = vec![Box::new(JsonFileSource::new(&path))];
    let pairs = run_once(&sources, &normalizer).await;
    info!(count = pairs.len(), %path, "normalized listings");

    for (raw, normalized) in &pairs {
        let rec = OutputRecord {
            platform: raw.platform,
            title: &raw.title,
            normalized,
        };
        println!("{}", serde_json::to_string(&rec)?);
    }
    Ok(())
}
