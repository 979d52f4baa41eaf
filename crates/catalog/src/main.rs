//! Catalog Service - category browsing, search and playback resolution
//!
//! Port: 8080 by default (`CINEVAULT_SERVICE_PORT`)

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use cinevault_catalog::handlers::{configure_routes, AppState};
use cinevault_catalog::{CatalogConfig, CatalogService};
use cinevault_core::{init_tracing, load_dotenv, ConfigLoader, ServiceConfig, TracingConfig};
use cinevault_playback::TrailerClient;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let service_config = ServiceConfig::from_env().context("invalid service configuration")?;
    service_config
        .validate()
        .context("invalid service configuration")?;

    init_tracing(
        TracingConfig::from_env().with_default_filter(service_config.log_level.as_str()),
    )?;

    let catalog_config = CatalogConfig::load().context("invalid catalog configuration")?;

    let catalog = Arc::new(CatalogService::from_config(&catalog_config)?);
    let trailers = Arc::new(
        TrailerClient::new(catalog_config.tmdb.clone()).context("failed to build TMDb client")?,
    );

    let state = web::Data::new(AppState { catalog, trailers });

    info!(
        host = %service_config.host,
        port = service_config.port,
        public_url = ?service_config.public_url,
        regions = catalog_config.regions.len(),
        chunk_size = catalog_config.enrichment.chunk_size,
        cache = catalog_config.cache.enabled,
        "Starting catalog service"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
            .wrap(Logger::default())
    })
    .client_request_timeout(service_config.request_timeout)
    .bind(service_config.bind_address())?
    .run()
    .await?;

    Ok(())
}
