// src/ingest/mod.rs
pub mod file;
pub mod types;

use crate::ingest::types::ListingSource;
use crate::pipeline::Normalizer;
use crate::types::{NormalizedListing, RawListing};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up once an exporter is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_source_errors_total",
            "Listing source fetch/parse errors."
        );
        describe_counter!(
            "ingest_records_rejected_total",
            "Single records a source could not decode."
        );
        describe_gauge!("ingest_last_run_ts", "Unix ts when ingest last ran.");
    });
}

/// Fetch from every source once and normalize what came back.
/// A failing source is logged and skipped; the others still contribute.
/// Returns raw/normalized pairs in source order.
pub async fn run_once(
    sources: &[Box<dyn ListingSource>],
    normalizer: &Normalizer,
) -> Vec<(RawListing, NormalizedListing)> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for s in sources {
        match s.fetch_listings().await {
            Ok(mut v) => {
                tracing::debug!(source = s.name(), count = v.len(), "fetched listings");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = s.name(), "listing source error");
                counter!("ingest_source_errors_total").increment(1);
            }
        }
    }

    let out: Vec<(RawListing, NormalizedListing)> = raw
        .into_iter()
        .map(|r| {
            let n = normalizer.normalize(&r);
            (r, n)
        })
        .collect();

    let now = chrono::Utc::now().timestamp().max(0);
    gauge!("ingest_last_run_ts").set(now as f64);

    out
}
