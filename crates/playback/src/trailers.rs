//! Trailer lookup against the TMDb video list
//!
//! Rate limit: 40 requests per 10 seconds (TMDb v3)
//!
//! Trailer absence is a normal outcome: [`TrailerClient::fetch_trailers`]
//! never fails, it logs and returns an empty list instead.

use cinevault_core::{external_api_span, MediaKind};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn, Instrument};

/// Only videos hosted here are playable in the embed frame
pub const APPROVED_VIDEO_SITE: &str = "YouTube";

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed";

/// Errors from the trailer client
#[derive(Debug, Error)]
pub enum TrailerError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("TMDb returned status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for TrailerError {
    fn from(err: reqwest::Error) -> Self {
        // the request URL carries api_key
        TrailerError::Http(err.without_url().to_string())
    }
}

/// TMDb connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// TMDb v3 API key
    pub api_key: String,
    pub base_url: String,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            timeout_ms: 5_000,
        }
    }
}

/// Video category as reported by TMDb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailerKind {
    Trailer,
    Teaser,
}

impl TrailerKind {
    fn from_tmdb(kind: &str) -> Option<Self> {
        match kind {
            "Trailer" => Some(TrailerKind::Trailer),
            "Teaser" => Some(TrailerKind::Teaser),
            _ => None,
        }
    }
}

/// A playable trailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerVideo {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrailerKind,
    #[serde(rename = "url")]
    pub embed_url: String,
}

/// One entry of TMDb's `/videos` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoListResponse {
    results: Vec<RawVideo>,
}

/// Keep approved-host trailers and teasers, in input order
pub fn filter_trailers(raw: Vec<RawVideo>) -> Vec<TrailerVideo> {
    raw.into_iter()
        .filter(|v| v.site == APPROVED_VIDEO_SITE && !v.key.is_empty())
        .filter_map(|v| {
            let kind = TrailerKind::from_tmdb(&v.kind)?;
            Some(TrailerVideo {
                embed_url: format!("{}/{}", YOUTUBE_EMBED_BASE, v.key),
                key: v.key,
                name: v.name,
                kind,
            })
        })
        .collect()
}

/// TMDb video-list client
pub struct TrailerClient {
    client: Client,
    config: TmdbConfig,
}

impl TrailerClient {
    /// Create a new client
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be built
    pub fn new(config: TmdbConfig) -> Result<Self, TrailerError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Trailers and teasers for a title, or an empty list
    pub async fn fetch_trailers(&self, tmdb_id: u64, kind: MediaKind) -> Vec<TrailerVideo> {
        match self.fetch_videos(tmdb_id, kind).await {
            Ok(raw) => {
                let total = raw.len();
                let trailers = filter_trailers(raw);
                debug!(tmdb_id, %kind, total, kept = trailers.len(), "Filtered TMDb videos");
                trailers
            }
            Err(e) => {
                warn!(tmdb_id, %kind, error = %e, "Trailer lookup failed");
                Vec::new()
            }
        }
    }

    async fn fetch_videos(
        &self,
        tmdb_id: u64,
        kind: MediaKind,
    ) -> Result<Vec<RawVideo>, TrailerError> {
        let endpoint = format!(
            "{}/{}/{}/videos",
            self.config.base_url.trim_end_matches('/'),
            kind.tmdb_segment(),
            tmdb_id
        );

        let span = external_api_span("GET", &endpoint, "tmdb");
        async {
            let response = self
                .client
                .get(&endpoint)
                .query(&[("api_key", self.config.api_key.as_str())])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    warn!("TMDb rate limit hit while fetching videos");
                }
                return Err(TrailerError::Status(status.as_u16()));
            }

            let body: VideoListResponse = response.json().await?;
            Ok(body.results)
        }
        .instrument(span)
        .await
    }
}
