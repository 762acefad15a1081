// src/ingest/types.rs
use anyhow::Result;

use crate::types::RawListing;

/// Upstream collaborator handing over scraped listings.
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<RawListing>>;
    fn name(&self) -> &'static str;
}
