//! CineVault Catalog
//!
//! Builds deduplicated, detail-enriched catalog pages from a rate-limited
//! catalog provider, and serves them (together with playback resolution and
//! trailers) over HTTP.

pub mod aggregator;
pub mod category;
pub mod config;
pub mod enrichment;
pub mod handlers;
pub mod model;
pub mod provider;
pub mod service;

pub use aggregator::{dedup_by_external_id, Aggregator, CategoryKey};
pub use category::{CategoryFetcher, CategoryFilter, CategorySpec};
pub use config::{CacheConfig, CatalogConfig, EnrichmentConfig, QuotaPolicy, RegionBucket};
pub use enrichment::DetailEnricher;
pub use model::{
    CatalogDetail, CatalogPage, CatalogSummary, SearchResult, TitleSource, TitleWithSources,
};
pub use provider::{
    CachedCatalogProvider, CatalogProvider, ListQuery, ProviderError, SortOrder, WatchmodeClient,
    WatchmodeConfig,
};
pub use service::{BrowseRequest, CatalogService};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

/// Errors surfaced by the catalog layer
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The provider rejected a call for exceeding its rate limit
    #[error("Catalog provider quota exceeded")]
    QuotaExceeded,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Title not found: {0}")]
    NotFound(u64),

    #[error("Catalog provider error: {0}")]
    Provider(ProviderError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ProviderError> for CatalogError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::QuotaExceeded => CatalogError::QuotaExceeded,
            other => CatalogError::Provider(other),
        }
    }
}

impl From<::config::ConfigError> for CatalogError {
    fn from(err: ::config::ConfigError) -> Self {
        CatalogError::Config(err.to_string())
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::UnknownCategory(_) | CatalogError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            CatalogError::Provider(_) => StatusCode::BAD_GATEWAY,
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            CatalogError::QuotaExceeded => (
                "rate_limited",
                "The catalog provider is rate limiting requests, try again later".to_string(),
            ),
            CatalogError::NotFound(_) => ("not_found", self.to_string()),
            CatalogError::UnknownCategory(_) => ("unknown_category", self.to_string()),
            CatalogError::InvalidRequest(_) => ("invalid_request", self.to_string()),
            CatalogError::Provider(_) => (
                "upstream_error",
                "The catalog provider failed to respond".to_string(),
            ),
            CatalogError::Config(_) => ("internal_error", "Internal server error".to_string()),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": error,
            "message": message
        }))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
