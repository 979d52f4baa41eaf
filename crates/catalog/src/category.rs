//! Category list fetching
//!
//! A category is a named filter over the provider's list query. Fetching one
//! is a single provider call; ordinary provider failures degrade to an empty
//! list so one bad category never blanks a page, while quota rejections are
//! propagated so callers can back off.

use crate::model::CatalogSummary;
use crate::provider::{CatalogProvider, ListQuery, SortOrder};
use crate::{CatalogError, Result};
use cinevault_core::MediaKind;
use std::sync::Arc;
use tracing::{debug, warn};

/// Filter applied to a list query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Original language (ISO 639-1)
    Language(String),
    /// Provider genre id
    Genre(u32),
    /// Newest releases first
    Recent,
    Unfiltered,
}

/// A category request: what to filter and which kind of title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategorySpec {
    pub filter: CategoryFilter,
    pub media_kind: MediaKind,
}

impl CategorySpec {
    pub fn new(filter: CategoryFilter, media_kind: MediaKind) -> Self {
        Self { filter, media_kind }
    }

    /// Provider query for this category, capped at `limit`
    pub fn to_query(&self, limit: usize) -> ListQuery {
        let mut query = ListQuery::new(self.media_kind, limit);
        match &self.filter {
            CategoryFilter::Language(code) => query.language = Some(code.clone()),
            CategoryFilter::Genre(id) => query.genre = Some(*id),
            CategoryFilter::Recent => query.sort = SortOrder::ReleaseDateDesc,
            CategoryFilter::Unfiltered => {}
        }
        query
    }
}

/// Fetches one category's title list
#[derive(Clone)]
pub struct CategoryFetcher {
    provider: Arc<dyn CatalogProvider>,
}

impl CategoryFetcher {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    /// At most `limit` summaries for `spec`, in provider order
    ///
    /// # Errors
    /// Only [`CatalogError::QuotaExceeded`]; every other provider failure
    /// yields an empty list.
    pub async fn fetch_category(
        &self,
        spec: &CategorySpec,
        limit: usize,
    ) -> Result<Vec<CatalogSummary>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query = spec.to_query(limit);
        match self.provider.list_titles(&query).await {
            Ok(mut titles) => {
                titles.truncate(limit);
                debug!(
                    filter = ?spec.filter,
                    kind = %spec.media_kind,
                    count = titles.len(),
                    "Fetched category"
                );
                Ok(titles)
            }
            Err(e) if e.is_quota() => Err(CatalogError::QuotaExceeded),
            Err(e) => {
                warn!(
                    filter = ?spec.filter,
                    kind = %spec.media_kind,
                    error = %e,
                    "Category fetch failed, returning empty list"
                );
                Ok(Vec::new())
            }
        }
    }
}
