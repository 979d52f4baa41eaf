//! Detail enrichment
//!
//! Turns summaries into full details with bounded concurrency: ids are split
//! into consecutive chunks, each chunk is fetched concurrently, and a pacing
//! delay separates chunks to stay under the provider's rate limit. Items whose
//! fetch fails are dropped rather than replaced by placeholders.

use crate::config::{EnrichmentConfig, QuotaPolicy};
use crate::model::{CatalogDetail, CatalogSummary};
use crate::provider::CatalogProvider;
use crate::{CatalogError, Result};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches details for summaries in paced chunks
#[derive(Clone)]
pub struct DetailEnricher {
    provider: Arc<dyn CatalogProvider>,
    config: EnrichmentConfig,
}

impl DetailEnricher {
    pub fn new(provider: Arc<dyn CatalogProvider>, config: EnrichmentConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_quota_policy(mut self, policy: QuotaPolicy) -> Self {
        self.config.quota_policy = policy;
        self
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Enrich with the configured chunk size and pacing delay
    pub async fn enrich(&self, titles: &[CatalogSummary]) -> Result<Vec<CatalogDetail>> {
        self.enrich_details(titles, self.config.chunk_size, self.config.pacing_delay())
            .await
    }

    /// Details for `titles`, in input order, skipping failed fetches
    ///
    /// A `chunk_size` of zero is treated as one. The pacing delay is applied
    /// between chunks only, never after the last one.
    ///
    /// # Errors
    /// With [`QuotaPolicy::Propagate`], returns [`CatalogError::QuotaExceeded`]
    /// once a chunk containing a rate-limited fetch has completed; no further
    /// chunks are issued.
    pub async fn enrich_details(
        &self,
        titles: &[CatalogSummary],
        chunk_size: usize,
        pacing_delay: Duration,
    ) -> Result<Vec<CatalogDetail>> {
        let chunk_size = chunk_size.max(1);
        let mut details = Vec::with_capacity(titles.len());
        let mut dropped = 0usize;

        for (index, chunk) in titles.chunks(chunk_size).enumerate() {
            if index > 0 && !pacing_delay.is_zero() {
                tokio::time::sleep(pacing_delay).await;
            }

            let results = join_all(
                chunk
                    .iter()
                    .map(|title| self.provider.title_details(title.external_id)),
            )
            .await;

            let mut quota_hit = false;
            for (title, result) in chunk.iter().zip(results) {
                match result {
                    Ok(detail) => details.push(detail),
                    Err(e) => {
                        if e.is_quota() && self.config.quota_policy == QuotaPolicy::Propagate {
                            quota_hit = true;
                        }
                        dropped += 1;
                        warn!(
                            external_id = title.external_id,
                            error = %e,
                            "Detail fetch failed, dropping title"
                        );
                    }
                }
            }

            if quota_hit {
                warn!(
                    chunk = index,
                    enriched = details.len(),
                    "Quota exceeded during enrichment, stopping"
                );
                return Err(CatalogError::QuotaExceeded);
            }

            debug!(chunk = index, size = chunk.len(), "Enriched chunk");
        }

        info!(
            requested = titles.len(),
            enriched = details.len(),
            dropped,
            "Detail enrichment complete"
        );
        Ok(details)
    }
}
