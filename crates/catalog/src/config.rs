//! Catalog service configuration
//!
//! Loaded from an optional `config/catalog.{toml,yaml,json}` file and
//! `CATALOG__*` environment variables (`__` separates sections, e.g.
//! `CATALOG__ENRICHMENT__CHUNK_SIZE=10`). `WATCHMODE_API_KEY` and
//! `TMDB_API_KEY` are honoured as overrides for the API keys.

use crate::provider::WatchmodeConfig;
use crate::{CatalogError, Result};
use cinevault_playback::TmdbConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// What the detail enricher does when a provider call is rate limited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaPolicy {
    /// Finish the in-flight chunk, then fail the whole enrichment
    #[default]
    Propagate,
    /// Drop the rate-limited item like any other failed fetch
    Skip,
}

/// Detail enrichment pacing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Detail fetches issued concurrently per chunk
    pub chunk_size: usize,
    /// Pause between consecutive chunks
    pub pacing_delay_ms: u64,
    pub quota_policy: QuotaPolicy,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            chunk_size: 20,
            pacing_delay_ms: 100,
            quota_policy: QuotaPolicy::Propagate,
        }
    }
}

impl EnrichmentConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

/// Provider response cache
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub list_ttl_secs: u64,
    pub detail_ttl_secs: u64,
    /// Maximum entries per cache
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ttl_secs: 3600,
            detail_ttl_secs: 600,
            max_capacity: 10_000,
        }
    }
}

/// One region's contribution to the composite `all` category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegionBucket {
    /// Category name, e.g. `indian`
    pub name: String,
    /// ISO 639-1 original language
    pub language: String,
    /// Titles requested from this region for `all`
    pub all_limit: usize,
}

impl RegionBucket {
    pub fn new(name: impl Into<String>, language: impl Into<String>, all_limit: usize) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            all_limit,
        }
    }
}

/// Region bucket whose name matches `name`, ignoring ASCII case
pub fn find_region<'a>(regions: &'a [RegionBucket], name: &str) -> Option<&'a RegionBucket> {
    regions.iter().find(|r| r.name.eq_ignore_ascii_case(name))
}

/// Default region table, in priority order
pub fn default_regions() -> Vec<RegionBucket> {
    vec![
        RegionBucket::new("pakistani", "ur", 100),
        RegionBucket::new("indian", "hi", 150),
        RegionBucket::new("hollywood", "en", 250),
    ]
}

/// Catalog service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub watchmode: WatchmodeConfig,
    pub tmdb: TmdbConfig,
    pub enrichment: EnrichmentConfig,
    pub cache: CacheConfig,
    /// Bucket policy for `all`; order is priority order
    pub regions: Vec<RegionBucket>,
    /// Region used for streaming availability lookups
    pub sources_region: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            watchmode: WatchmodeConfig::default(),
            tmdb: TmdbConfig::default(),
            enrichment: EnrichmentConfig::default(),
            cache: CacheConfig::default(),
            regions: default_regions(),
            sources_region: "US".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from file and environment, then validate it
    pub fn load() -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name("config/catalog").required(false))
            .add_source(
                ::config::Environment::with_prefix("CATALOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: CatalogConfig = settings.try_deserialize()?;
        config.apply_key_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_key_overrides(&mut self) {
        if let Ok(key) = std::env::var("WATCHMODE_API_KEY") {
            self.watchmode.api_key = key;
        }
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            self.tmdb.api_key = key;
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.enrichment.chunk_size == 0 {
            return Err(CatalogError::Config(
                "enrichment.chunk_size must be at least 1".to_string(),
            ));
        }
        if self.watchmode.timeout_ms == 0 || self.tmdb.timeout_ms == 0 {
            return Err(CatalogError::Config(
                "provider timeouts must be greater than zero".to_string(),
            ));
        }
        if self.regions.is_empty() {
            return Err(CatalogError::Config(
                "at least one region bucket is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.to_ascii_lowercase()) {
                return Err(CatalogError::Config(format!(
                    "duplicate region bucket: {}",
                    region.name
                )));
            }
        }

        if self.watchmode.api_key.is_empty() {
            tracing::warn!("Watchmode API key is not set; catalog calls will be rejected");
        }

        Ok(())
    }
}
