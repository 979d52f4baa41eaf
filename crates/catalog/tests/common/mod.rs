//! In-memory catalog provider for orchestration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cinevault_catalog::{
    CatalogDetail, CatalogProvider, CatalogSummary, ListQuery, ProviderError, SearchResult,
    TitleSource,
};
use cinevault_core::MediaKind;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Scripted provider with call accounting
#[derive(Default)]
pub struct FakeProvider {
    /// List responses keyed by language filter (`None` = unfiltered)
    lists: HashMap<Option<String>, Result<Vec<u64>, ProviderError>>,
    failing: HashSet<u64>,
    quota: HashSet<u64>,
    missing: HashSet<u64>,
    sources: Option<Result<Vec<TitleSource>, ProviderError>>,
    search_results: Vec<SearchResult>,
    /// Simulated latency of each detail call
    detail_latency: Duration,

    pub list_calls: Mutex<Vec<ListQuery>>,
    pub detail_calls: Mutex<Vec<(u64, Instant)>>,
    pub search_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, language: Option<&str>, ids: &[u64]) -> Self {
        self.lists
            .insert(language.map(str::to_string), Ok(ids.to_vec()));
        self
    }

    pub fn with_list_error(mut self, language: Option<&str>, error: ProviderError) -> Self {
        self.lists.insert(language.map(str::to_string), Err(error));
        self
    }

    pub fn with_failing_details(mut self, ids: &[u64]) -> Self {
        self.failing.extend(ids);
        self
    }

    pub fn with_quota_details(mut self, ids: &[u64]) -> Self {
        self.quota.extend(ids);
        self
    }

    pub fn with_missing_details(mut self, ids: &[u64]) -> Self {
        self.missing.extend(ids);
        self
    }

    pub fn with_sources(mut self, sources: Result<Vec<TitleSource>, ProviderError>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
        self.search_results = results;
        self
    }

    pub fn with_detail_latency(mut self, latency: Duration) -> Self {
        self.detail_latency = latency;
        self
    }

    pub fn detail_ids(&self) -> Vec<u64> {
        self.detail_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }
}

pub fn summaries(ids: &[u64]) -> Vec<CatalogSummary> {
    ids.iter()
        .map(|&id| CatalogSummary::new(id, format!("Title {}", id)))
        .collect()
}

pub fn ids_of(titles: &[CatalogSummary]) -> Vec<u64> {
    titles.iter().map(|t| t.external_id).collect()
}

#[async_trait]
impl CatalogProvider for FakeProvider {
    async fn list_titles(&self, query: &ListQuery) -> Result<Vec<CatalogSummary>, ProviderError> {
        self.list_calls.lock().unwrap().push(query.clone());
        match self.lists.get(&query.language) {
            Some(Ok(ids)) => {
                let mut titles = summaries(ids);
                titles.truncate(query.limit);
                Ok(titles)
            }
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }

    async fn title_details(&self, external_id: u64) -> Result<CatalogDetail, ProviderError> {
        self.detail_calls
            .lock()
            .unwrap()
            .push((external_id, Instant::now()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.detail_latency.is_zero() {
            tokio::time::sleep(self.detail_latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.quota.contains(&external_id) {
            return Err(ProviderError::QuotaExceeded);
        }
        if self.missing.contains(&external_id) {
            return Err(ProviderError::Status(404));
        }
        if self.failing.contains(&external_id) {
            return Err(ProviderError::Decode("truncated body".to_string()));
        }
        Ok(CatalogDetail::new(
            external_id,
            format!("Title {}", external_id),
            MediaKind::Film,
        ))
    }

    async fn search(
        &self,
        _query: &str,
        _kind: Option<MediaKind>,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.search_results.clone())
    }

    async fn title_sources(
        &self,
        _external_id: u64,
        _region: &str,
    ) -> Result<Vec<TitleSource>, ProviderError> {
        self.sources.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}
