//! Watchmode API client
//!
//! Rate limit: 1000 requests per day on the free plan; a 429 response is
//! surfaced as [`ProviderError::QuotaExceeded`] and never retried here.

use super::{CatalogProvider, ListQuery, ProviderError};
use crate::model::{CatalogDetail, CatalogSummary, SearchResult, TitleSource};
use async_trait::async_trait;
use cinevault_core::{external_api_span, MediaKind};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn, Instrument};

/// Watchmode connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchmodeConfig {
    pub api_key: String,
    pub base_url: String,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for WatchmodeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.watchmode.com/v1".to_string(),
            timeout_ms: 5_000,
        }
    }
}

/// Watchmode title as it appears in `list-titles`
#[derive(Debug, Deserialize)]
struct RawListTitle {
    id: u64,
    title: String,
    year: Option<i32>,
    imdb_id: Option<String>,
    tmdb_id: Option<u64>,
    tmdb_type: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl From<RawListTitle> for CatalogSummary {
    fn from(raw: RawListTitle) -> Self {
        CatalogSummary {
            external_id: raw.id,
            title: raw.title,
            year: raw.year,
            imdb_id: non_blank(raw.imdb_id),
            tmdb_id: raw.tmdb_id,
            tmdb_type: non_blank(raw.tmdb_type),
            kind: raw.kind.and_then(|k| k.parse().ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTitleDetails {
    id: u64,
    title: String,
    original_title: Option<String>,
    plot_overview: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    runtime_minutes: Option<u32>,
    year: Option<i32>,
    release_date: Option<String>,
    imdb_id: Option<String>,
    tmdb_id: Option<u64>,
    #[serde(default)]
    genre_names: Vec<String>,
    user_rating: Option<f32>,
    critic_score: Option<u32>,
    poster: Option<String>,
    backdrop: Option<String>,
}

impl From<RawTitleDetails> for CatalogDetail {
    fn from(raw: RawTitleDetails) -> Self {
        CatalogDetail {
            external_id: raw.id,
            title: raw.title,
            original_title: non_blank(raw.original_title),
            overview: non_blank(raw.plot_overview),
            poster_url: non_blank(raw.poster),
            backdrop_url: non_blank(raw.backdrop),
            release_year: raw.year,
            release_date: non_blank(raw.release_date),
            rating: raw.user_rating,
            critic_score: raw.critic_score,
            runtime_minutes: raw.runtime_minutes,
            media_kind: raw
                .kind
                .and_then(|k| k.parse().ok())
                .unwrap_or_default(),
            genre_names: raw.genre_names,
            imdb_id: non_blank(raw.imdb_id),
            tmdb_id: raw.tmdb_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSearchResult {
    id: u64,
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    year: Option<i32>,
    relevance: Option<f64>,
    imdb_id: Option<String>,
    tmdb_id: Option<u64>,
    tmdb_type: Option<String>,
    image_url: Option<String>,
}

impl From<RawSearchResult> for SearchResult {
    fn from(raw: RawSearchResult) -> Self {
        SearchResult {
            external_id: raw.id,
            name: raw.name,
            kind: raw.kind.and_then(|k| k.parse().ok()),
            year: raw.year,
            relevance: raw.relevance,
            imdb_id: non_blank(raw.imdb_id),
            tmdb_id: raw.tmdb_id,
            tmdb_type: non_blank(raw.tmdb_type),
            image_url: non_blank(raw.image_url),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Decode the array under `field`, skipping entries that do not parse
///
/// A missing array is an empty result, not an error.
fn parse_items<Raw, T>(body: &Value, field: &str) -> Vec<T>
where
    Raw: DeserializeOwned,
    T: From<Raw>,
{
    let Some(items) = body.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Raw>(item.clone()) {
            Ok(raw) => Some(T::from(raw)),
            Err(e) => {
                debug!(field, error = %e, "Skipping malformed item");
                None
            }
        })
        .collect()
}

/// Watchmode v1 client
pub struct WatchmodeClient {
    client: Client,
    config: WatchmodeConfig,
}

impl WatchmodeClient {
    /// Create a new Watchmode API client
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be built
    pub fn new(config: WatchmodeConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET `path` with the API key and `params`, returning the decoded body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let endpoint = self.endpoint(path);
        let span = external_api_span("GET", &endpoint, "watchmode");

        async {
            let response = self
                .client
                .get(&endpoint)
                .query(&[("apiKey", self.config.api_key.as_str())])
                .query(params)
                .send()
                .await?;

            let response = check_status(response)?;
            response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::Decode(e.without_url().to_string()))
        }
        .instrument(span)
        .await
    }
}

fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Watchmode quota exceeded");
        return Err(ProviderError::QuotaExceeded);
    }
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    Ok(response)
}

#[async_trait]
impl CatalogProvider for WatchmodeClient {
    async fn list_titles(&self, query: &ListQuery) -> Result<Vec<CatalogSummary>, ProviderError> {
        let mut params = vec![
            ("types", query.media_kind.watchmode_type().to_string()),
            ("limit", query.limit.to_string()),
            ("sort_by", query.sort.as_str().to_string()),
        ];
        if let Some(language) = &query.language {
            params.push(("languages", language.clone()));
        }
        if let Some(genre) = query.genre {
            params.push(("genres", genre.to_string()));
        }

        let body: Value = self.get_json("list-titles/", &params).await?;
        let mut titles: Vec<CatalogSummary> = parse_items::<RawListTitle, _>(&body, "titles");
        titles.truncate(query.limit);

        debug!(
            kind = %query.media_kind,
            language = ?query.language,
            count = titles.len(),
            "Listed titles"
        );
        Ok(titles)
    }

    async fn title_details(&self, external_id: u64) -> Result<CatalogDetail, ProviderError> {
        let raw: RawTitleDetails = self
            .get_json(&format!("title/{}/details/", external_id), &[])
            .await?;
        Ok(raw.into())
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<MediaKind>,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        // 2 = titles of any kind, 3 = movies, 4 = tv
        let search_type = match kind {
            None => "2",
            Some(MediaKind::Film) => "3",
            Some(MediaKind::Series) => "4",
        };

        let body: Value = self
            .get_json(
                "autocomplete-search/",
                &[
                    ("search_value", query.to_string()),
                    ("search_type", search_type.to_string()),
                ],
            )
            .await?;

        Ok(parse_items::<RawSearchResult, _>(&body, "results"))
    }

    async fn title_sources(
        &self,
        external_id: u64,
        region: &str,
    ) -> Result<Vec<TitleSource>, ProviderError> {
        let body: Value = self
            .get_json(
                &format!("title/{}/sources/", external_id),
                &[("regions", region.to_string())],
            )
            .await?;

        let Some(items) = body.as_array() else {
            return Err(ProviderError::Decode("expected a source array".to_string()));
        };

        Ok(items
            .iter()
            .filter_map(|item| serde_json::from_value::<TitleSource>(item.clone()).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = WatchmodeClient::new(WatchmodeConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.watchmode.com/v1");
        assert_eq!(
            client.endpoint("list-titles/"),
            "https://api.watchmode.com/v1/list-titles/"
        );
    }

    #[test]
    fn test_parse_items_skips_malformed_entries() {
        let body = json!({
            "titles": [
                { "id": 1, "title": "Sholay", "year": 1975, "type": "movie", "imdb_id": "" },
                { "title": "no id" },
                { "id": 3, "title": "Zindagi Gulzar Hai", "type": "tv_series", "tmdb_id": 61227 }
            ]
        });

        let titles: Vec<CatalogSummary> = parse_items::<RawListTitle, _>(&body, "titles");
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].external_id, 1);
        assert_eq!(titles[0].imdb_id, None);
        assert_eq!(titles[1].kind, Some(MediaKind::Series));
        assert_eq!(titles[1].tmdb_id, Some(61227));
    }

    #[test]
    fn test_missing_array_is_empty() {
        let titles: Vec<CatalogSummary> = parse_items::<RawListTitle, _>(&json!({}), "titles");
        assert!(titles.is_empty());
    }

    #[test]
    fn test_detail_conversion() {
        let raw: RawTitleDetails = serde_json::from_value(json!({
            "id": 1295258,
            "title": "Dangal",
            "plot_overview": "A former wrestler trains his daughters.",
            "type": "movie",
            "year": 2016,
            "user_rating": 8.3,
            "genre_names": ["Drama", "Sport"],
            "poster": "https://cdn.watchmode.com/posters/01295258_poster_w185.jpg",
            "backdrop": ""
        }))
        .unwrap();

        let detail = CatalogDetail::from(raw);
        assert_eq!(detail.external_id, 1295258);
        assert_eq!(detail.media_kind, MediaKind::Film);
        assert_eq!(detail.release_year, Some(2016));
        assert_eq!(detail.genre_names, vec!["Drama", "Sport"]);
        assert!(detail.backdrop_url.is_none());
    }
}
