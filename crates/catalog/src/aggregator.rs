//! Composite category aggregation
//!
//! The `all` category fans out to every region bucket concurrently, then
//! concatenates the results in bucket priority order, drops repeated ids
//! (first occurrence wins) and truncates to the requested limit.

use crate::category::{CategoryFetcher, CategoryFilter, CategorySpec};
use crate::config::{find_region, RegionBucket};
use crate::model::CatalogSummary;
use crate::provider::CatalogProvider;
use crate::{CatalogError, Result};
use cinevault_core::MediaKind;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// A browsable category as named by clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKey {
    /// Every region bucket combined
    All,
    /// One region bucket by name
    Region(String),
    Genre(u32),
    New,
    Unfiltered,
}

impl CategoryKey {
    /// Parse a client category name against the region table
    ///
    /// Accepts `all`, `new`, `unfiltered`, `genre:<id>` and any region name.
    pub fn parse(name: &str, regions: &[RegionBucket]) -> Result<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "" | "all" => Ok(CategoryKey::All),
            "new" => Ok(CategoryKey::New),
            "unfiltered" => Ok(CategoryKey::Unfiltered),
            other => {
                if let Some(id) = other.strip_prefix("genre:") {
                    return id
                        .parse()
                        .map(CategoryKey::Genre)
                        .map_err(|_| CatalogError::UnknownCategory(other.to_string()));
                }
                if let Some(bucket) = find_region(regions, other) {
                    return Ok(CategoryKey::Region(bucket.name.clone()));
                }
                Err(CatalogError::UnknownCategory(other.to_string()))
            }
        }
    }
}

/// Remove repeated external ids, keeping the first occurrence
pub fn dedup_by_external_id(titles: Vec<CatalogSummary>) -> Vec<CatalogSummary> {
    let mut seen = HashSet::with_capacity(titles.len());
    titles
        .into_iter()
        .filter(|t| seen.insert(t.external_id))
        .collect()
}

/// Builds category title lists, including the composite `all`
#[derive(Clone)]
pub struct Aggregator {
    fetcher: CategoryFetcher,
    regions: Arc<[RegionBucket]>,
}

impl Aggregator {
    pub fn new(provider: Arc<dyn CatalogProvider>, regions: Vec<RegionBucket>) -> Self {
        Self {
            fetcher: CategoryFetcher::new(provider),
            regions: regions.into(),
        }
    }

    pub fn regions(&self) -> &[RegionBucket] {
        &self.regions
    }

    /// Titles for `key`, at most `limit`, without repeated ids for `All`
    ///
    /// # Errors
    /// [`CatalogError::QuotaExceeded`] if any underlying fetch was rate
    /// limited; [`CatalogError::UnknownCategory`] for a region not in the
    /// table.
    pub async fn aggregate(
        &self,
        key: &CategoryKey,
        media_kind: MediaKind,
        limit: usize,
    ) -> Result<Vec<CatalogSummary>> {
        let filter = match key {
            CategoryKey::All => return self.aggregate_all(media_kind, limit).await,
            CategoryKey::Region(name) => {
                let bucket = find_region(&self.regions, name)
                    .ok_or_else(|| CatalogError::UnknownCategory(name.clone()))?;
                CategoryFilter::Language(bucket.language.clone())
            }
            CategoryKey::Genre(id) => CategoryFilter::Genre(*id),
            CategoryKey::New => CategoryFilter::Recent,
            CategoryKey::Unfiltered => CategoryFilter::Unfiltered,
        };

        self.fetcher
            .fetch_category(&CategorySpec::new(filter, media_kind), limit)
            .await
    }

    async fn aggregate_all(
        &self,
        media_kind: MediaKind,
        limit: usize,
    ) -> Result<Vec<CatalogSummary>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let fetches = self.regions.iter().map(|bucket| {
            let spec = CategorySpec::new(
                CategoryFilter::Language(bucket.language.clone()),
                media_kind,
            );
            let fetcher = &self.fetcher;
            async move { fetcher.fetch_category(&spec, bucket.all_limit).await }
        });

        // try_join_all keeps bucket order and fails on the first quota error
        let buckets = try_join_all(fetches).await?;
        let fetched: usize = buckets.iter().map(Vec::len).sum();

        let mut titles = dedup_by_external_id(buckets.into_iter().flatten().collect());
        let unique = titles.len();
        titles.truncate(limit);

        debug!(fetched, unique, "Merged region buckets");
        info!(kind = %media_kind, limit, returned = titles.len(), "Aggregated all regions");
        Ok(titles)
    }
}
