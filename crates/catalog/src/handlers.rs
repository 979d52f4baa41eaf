//! HTTP handlers for the catalog service

use crate::service::{BrowseRequest, CatalogService};
use crate::CatalogError;
use actix_web::{web, HttpResponse};
use cinevault_core::MediaKind;
use cinevault_playback::{
    build_playback_url, registry, PlaybackOptions, PlaybackProviderId, TitleIds, TrailerClient,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared handler state
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub trailers: Arc<TrailerClient>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub kind: Option<MediaKind>,
}

#[derive(Debug, Deserialize)]
pub struct TrailerParams {
    pub tmdb_id: Option<u64>,
    #[serde(default, rename = "type")]
    pub kind: MediaKind,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackParams {
    pub provider: Option<String>,
    pub tmdb_id: Option<u64>,
    pub imdb_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: MediaKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub autoplay: Option<bool>,
    pub color: Option<String>,
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "catalog-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn browse(
    state: web::Data<AppState>,
    params: web::Query<BrowseRequest>,
) -> Result<HttpResponse, CatalogError> {
    let page = state.catalog.browse(&params).await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, CatalogError> {
    let results = state.catalog.search(&params.q, params.kind).await?;
    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}

async fn get_title(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, CatalogError> {
    let title = state.catalog.title(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(title))
}

async fn get_trailers(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    params: web::Query<TrailerParams>,
) -> Result<HttpResponse, CatalogError> {
    let tmdb_id = params
        .tmdb_id
        .ok_or_else(|| CatalogError::InvalidRequest("tmdb_id is required".to_string()))?;

    tracing::debug!(external_id = path.into_inner(), tmdb_id, "Trailer lookup");
    let videos = state.trailers.fetch_trailers(tmdb_id, params.kind).await;
    Ok(HttpResponse::Ok().json(json!({ "videos": videos })))
}

async fn resolve_playback(
    params: web::Query<PlaybackParams>,
) -> Result<HttpResponse, CatalogError> {
    let params = params.into_inner();
    let provider = match params.provider.as_deref() {
        Some(name) => name
            .parse::<PlaybackProviderId>()
            .map_err(|e| CatalogError::InvalidRequest(e.to_string()))?,
        None => PlaybackProviderId::default(),
    };

    let defaults = PlaybackOptions::default();
    let options = PlaybackOptions {
        autoplay: params.autoplay.unwrap_or(defaults.autoplay),
        accent_color: params.color,
    };

    let ids = TitleIds::new(params.tmdb_id, params.imdb_id);
    let resolution = build_playback_url(
        provider,
        &ids,
        params.kind,
        params.season,
        params.episode,
        &options,
    );

    Ok(HttpResponse::Ok().json(json!({
        "provider": provider,
        "available": resolution.is_available(),
        "url": resolution.url(),
        "next": provider.next(),
    })))
}

async fn list_providers() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "providers": registry() }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .route("/movies", web::get().to(browse))
            .route("/search", web::get().to(search))
            .route("/title/{id}", web::get().to(get_title))
            .route("/trailer/{id}", web::get().to(get_trailers))
            .route("/playback", web::get().to(resolve_playback))
            .route("/playback/providers", web::get().to(list_providers)),
    );
}
