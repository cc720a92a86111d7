pub mod analysis;
pub mod chart;
pub mod config;
pub mod errors;
pub mod geo_utils;
pub mod gpx_parser;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod route_metrics;
pub mod route_store;

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
};

use crate::{
    config::AppConfig,
    handlers::{AppState, get_map_defaults, get_page, get_page_view, health_check, list_pages},
    route_store::RouteStore,
};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .allow_origin(Any);

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/map", get(get_map_defaults))
        .route("/pages", get(list_pages))
        .route("/pages/{page}", get(get_page))
        .route("/pages/{page}/view", get(get_page_view));

    // Site assets (GPX included) are only served when they live on disk
    if let Some(root) = state.store.local_root() {
        router = router.nest_service("/assets", ServeDir::new(root.join("assets")));
    }

    router
        .layer(Extension(state))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
}

pub fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let itinerary = config.itinerary()?;
    let store = RouteStore::from_source(&config.route_source())?;

    Ok(AppState {
        itinerary: Arc::new(itinerary),
        store,
        chart_cap: config.chart_cap,
    })
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let app = create_router(build_state(&config)?);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
