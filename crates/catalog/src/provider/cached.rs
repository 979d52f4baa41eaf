//! Read-through cache in front of a catalog provider

use super::{CatalogProvider, ListQuery, ProviderError};
use crate::config::CacheConfig;
use crate::model::{CatalogDetail, CatalogSummary, SearchResult, TitleSource};
use async_trait::async_trait;
use cinevault_core::MediaKind;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Caches list and detail lookups of an inner provider
///
/// Only successful responses are stored, so a quota rejection is retried on
/// the next call. Concurrent misses for the same key share one upstream call.
/// Search and availability lookups are passed through.
pub struct CachedCatalogProvider {
    inner: Arc<dyn CatalogProvider>,
    lists: Cache<ListQuery, Vec<CatalogSummary>>,
    details: Cache<u64, CatalogDetail>,
}

impl CachedCatalogProvider {
    pub fn new(inner: Arc<dyn CatalogProvider>, config: &CacheConfig) -> Self {
        let lists = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.list_ttl_secs))
            .build();

        let details = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.detail_ttl_secs))
            .build();

        Self {
            inner,
            lists,
            details,
        }
    }

    /// Number of cached detail entries
    pub async fn detail_entries(&self) -> u64 {
        self.details.run_pending_tasks().await;
        self.details.entry_count()
    }
}

#[async_trait]
impl CatalogProvider for CachedCatalogProvider {
    async fn list_titles(&self, query: &ListQuery) -> Result<Vec<CatalogSummary>, ProviderError> {
        self.lists
            .try_get_with(query.clone(), self.inner.list_titles(query))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn title_details(&self, external_id: u64) -> Result<CatalogDetail, ProviderError> {
        self.details
            .try_get_with(external_id, self.inner.title_details(external_id))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<MediaKind>,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        self.inner.search(query, kind).await
    }

    async fn title_sources(
        &self,
        external_id: u64,
        region: &str,
    ) -> Result<Vec<TitleSource>, ProviderError> {
        self.inner.title_sources(external_id, region).await
    }
}
