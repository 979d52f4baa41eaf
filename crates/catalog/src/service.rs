//! Catalog service facade
//!
//! Wires the aggregator, the detail enricher and the provider into the three
//! operations the HTTP layer exposes: browse, search and title lookup.

use crate::aggregator::{Aggregator, CategoryKey};
use crate::config::CatalogConfig;
use crate::enrichment::DetailEnricher;
use crate::model::{CatalogPage, SearchResult, TitleWithSources};
use crate::provider::{CachedCatalogProvider, CatalogProvider, WatchmodeClient};
use crate::{CatalogError, Result};
use cinevault_core::MediaKind;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Default number of titles per browse request
pub const DEFAULT_BROWSE_LIMIT: usize = 50;

/// A request for one category page
#[derive(Debug, Clone, Deserialize)]
pub struct BrowseRequest {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, rename = "type")]
    pub media_kind: MediaKind,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_category() -> String {
    "all".to_string()
}

fn default_limit() -> usize {
    DEFAULT_BROWSE_LIMIT
}

impl BrowseRequest {
    pub fn new(category: impl Into<String>, media_kind: MediaKind, limit: usize) -> Self {
        Self {
            category: category.into(),
            media_kind,
            limit,
        }
    }
}

/// Entry point for catalog reads
pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    aggregator: Aggregator,
    enricher: DetailEnricher,
    sources_region: String,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn CatalogProvider>, config: &CatalogConfig) -> Self {
        Self {
            aggregator: Aggregator::new(provider.clone(), config.regions.clone()),
            enricher: DetailEnricher::new(provider.clone(), config.enrichment.clone()),
            sources_region: config.sources_region.clone(),
            provider,
        }
    }

    /// Build the service over Watchmode, with the response cache if enabled
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let client = WatchmodeClient::new(config.watchmode.clone())
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        let provider: Arc<dyn CatalogProvider> = if config.cache.enabled {
            Arc::new(CachedCatalogProvider::new(Arc::new(client), &config.cache))
        } else {
            Arc::new(client)
        };

        Ok(Self::new(provider, config))
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Aggregate a category, then enrich every title with its details
    #[instrument(
        skip_all,
        fields(category = %request.category, kind = %request.media_kind, limit = request.limit)
    )]
    pub async fn browse(&self, request: &BrowseRequest) -> Result<CatalogPage> {
        let key = CategoryKey::parse(&request.category, self.aggregator.regions())?;

        let summaries = self
            .aggregator
            .aggregate(&key, request.media_kind, request.limit)
            .await?;
        let titles = self.enricher.enrich(&summaries).await?;

        info!(summaries = summaries.len(), titles = titles.len(), "Browse complete");
        Ok(CatalogPage::new(titles))
    }

    /// Free-text search; a blank query returns nothing without a provider call
    pub async fn search(&self, query: &str, kind: Option<MediaKind>) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.provider.search(query, kind).await?)
    }

    /// Title details plus streaming sources for the configured region
    ///
    /// Sources are best effort: a failed lookup yields an empty list.
    pub async fn title(&self, external_id: u64) -> Result<TitleWithSources> {
        let detail = self
            .provider
            .title_details(external_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CatalogError::NotFound(external_id)
                } else {
                    CatalogError::from(e)
                }
            })?;

        let streaming_sources = match self
            .provider
            .title_sources(external_id, &self.sources_region)
            .await
        {
            Ok(sources) => sources,
            Err(e) => {
                warn!(
                    external_id,
                    region = %self.sources_region,
                    error = %e,
                    "Source lookup failed"
                );
                Vec::new()
            }
        };

        Ok(TitleWithSources {
            detail,
            streaming_sources,
        })
    }
}
