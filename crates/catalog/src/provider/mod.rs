//! Catalog provider seam
//!
//! Everything above this module talks to the catalog through
//! [`CatalogProvider`]; the Watchmode client is the production implementation
//! and [`CachedCatalogProvider`] adds a read-through cache in front of any
//! provider.

use crate::model::{CatalogDetail, CatalogSummary, SearchResult, TitleSource};
use async_trait::async_trait;
use cinevault_core::MediaKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cached;
pub mod watchmode;

pub use cached::CachedCatalogProvider;
pub use watchmode::{WatchmodeClient, WatchmodeConfig};

/// Failure of a single provider call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// HTTP 429: the caller exceeded its allowed call rate
    #[error("provider quota exceeded")]
    QuotaExceeded,

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn is_quota(&self) -> bool {
        matches!(self, ProviderError::QuotaExceeded)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Status(404))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // request URLs carry the API key
        let err = err.without_url();
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Ordering requested from a list query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PopularityDesc,
    ReleaseDateDesc,
}

impl SortOrder {
    /// Watchmode `sort_by` value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity_desc",
            SortOrder::ReleaseDateDesc => "release_date_desc",
        }
    }
}

/// Provider-level list query; also the list cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub media_kind: MediaKind,
    /// ISO 639-1 original language
    pub language: Option<String>,
    /// Provider genre id
    pub genre: Option<u32>,
    pub sort: SortOrder,
    pub limit: usize,
}

impl ListQuery {
    pub fn new(media_kind: MediaKind, limit: usize) -> Self {
        Self {
            media_kind,
            language: None,
            genre: None,
            sort: SortOrder::default(),
            limit,
        }
    }
}

/// A source of catalog data
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Titles matching `query`, in provider order, at most `query.limit`
    async fn list_titles(&self, query: &ListQuery) -> Result<Vec<CatalogSummary>, ProviderError>;

    /// Full metadata for one title
    async fn title_details(&self, external_id: u64) -> Result<CatalogDetail, ProviderError>;

    /// Free-text title search, optionally restricted to one kind
    async fn search(
        &self,
        query: &str,
        kind: Option<MediaKind>,
    ) -> Result<Vec<SearchResult>, ProviderError>;

    /// Streaming availability of a title in `region`
    async fn title_sources(
        &self,
        external_id: u64,
        region: &str,
    ) -> Result<Vec<TitleSource>, ProviderError>;
}
