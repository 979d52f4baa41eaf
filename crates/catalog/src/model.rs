//! Catalog data model

use cinevault_core::MediaKind;
use serde::{Deserialize, Serialize};

/// A title as returned by a list query
///
/// `external_id` is the catalog provider's id and the deduplication key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    #[serde(rename = "id")]
    pub external_id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u64>,
    /// TMDb's own type for `tmdb_id` (`movie` or `tv`)
    pub tmdb_type: Option<String>,
    pub kind: Option<MediaKind>,
}

impl CatalogSummary {
    pub fn new(external_id: u64, title: impl Into<String>) -> Self {
        Self {
            external_id,
            title: title.into(),
            year: None,
            imdb_id: None,
            tmdb_id: None,
            tmdb_type: None,
            kind: None,
        }
    }
}

/// Full metadata for one title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDetail {
    #[serde(rename = "id")]
    pub external_id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_year: Option<i32>,
    pub release_date: Option<String>,
    /// User rating on a 0-10 scale
    pub rating: Option<f32>,
    pub critic_score: Option<u32>,
    pub runtime_minutes: Option<u32>,
    #[serde(rename = "type")]
    pub media_kind: MediaKind,
    #[serde(default)]
    pub genre_names: Vec<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u64>,
}

impl CatalogDetail {
    pub fn new(external_id: u64, title: impl Into<String>, media_kind: MediaKind) -> Self {
        Self {
            external_id,
            title: title.into(),
            original_title: None,
            overview: None,
            poster_url: None,
            backdrop_url: None,
            release_year: None,
            release_date: None,
            rating: None,
            critic_score: None,
            runtime_minutes: None,
            media_kind,
            genre_names: Vec::new(),
            imdb_id: None,
            tmdb_id: None,
        }
    }
}

/// One entry of a free-text search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "id")]
    pub external_id: u64,
    pub name: String,
    pub kind: Option<MediaKind>,
    pub year: Option<i32>,
    pub relevance: Option<f64>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u64>,
    pub tmdb_type: Option<String>,
    pub image_url: Option<String>,
}

/// Where a title can be watched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSource {
    pub source_id: u64,
    pub name: String,
    /// `sub`, `free`, `rent`, `buy` or `tve`
    #[serde(rename = "type")]
    pub kind: String,
    pub region: String,
    pub web_url: Option<String>,
    pub format: Option<String>,
    pub price: Option<f64>,
}

/// Title detail plus its streaming availability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleWithSources {
    #[serde(flatten)]
    pub detail: CatalogDetail,
    pub streaming_sources: Vec<TitleSource>,
}

/// Response of a browse request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub titles: Vec<CatalogDetail>,
    pub total: usize,
}

impl CatalogPage {
    pub fn new(titles: Vec<CatalogDetail>) -> Self {
        Self {
            total: titles.len(),
            titles,
        }
    }
}
