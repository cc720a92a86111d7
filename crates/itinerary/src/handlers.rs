use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Itinerary, MapDefaults, PageEntry, PageTarget, page_id_from_path},
    errors::AppError,
    pages::{PageView, render_page},
    route_store::RouteStore,
};

/// Shared, read-only state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub itinerary: Arc<Itinerary>,
    pub store: RouteStore,
    pub chart_cap: usize,
}

#[derive(Debug, Deserialize)]
pub struct PageViewQuery {
    pub cap: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PageListing {
    pub id: String,
    pub day: u32,
    /// "route" or "rest_day"
    pub kind: &'static str,
    pub gpx: Option<String>,
}

impl From<&PageEntry> for PageListing {
    fn from(page: &PageEntry) -> Self {
        let (kind, gpx) = match &page.target {
            PageTarget::Route(path) => ("route", Some(path.clone())),
            PageTarget::RestDay(_) => ("rest_day", None),
        };
        Self {
            id: page.id.clone(),
            day: page.day,
            kind,
            gpx,
        }
    }
}

/// Accepts both `dia-1` and the page's file name, `dia-1.html`.
fn page_id(segment: &str) -> Result<&str, AppError> {
    page_id_from_path(segment).ok_or(AppError::NotFound)
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_map_defaults(Extension(state): Extension<AppState>) -> Json<MapDefaults> {
    Json(state.itinerary.map)
}

pub async fn list_pages(Extension(state): Extension<AppState>) -> Json<Vec<PageListing>> {
    Json(state.itinerary.pages.iter().map(PageListing::from).collect())
}

pub async fn get_page(
    Extension(state): Extension<AppState>,
    Path(page): Path<String>,
) -> Result<Json<PageListing>, AppError> {
    let entry = state
        .itinerary
        .page(page_id(&page)?)
        .ok_or(AppError::NotFound)?;
    Ok(Json(PageListing::from(entry)))
}

pub async fn get_page_view(
    Extension(state): Extension<AppState>,
    Path(page): Path<String>,
    Query(params): Query<PageViewQuery>,
) -> Result<Json<PageView>, AppError> {
    let cap = match params.cap {
        Some(0) => return Err(AppError::InvalidInput("cap must be at least 1".to_string())),
        Some(cap) => cap,
        None => state.chart_cap,
    };

    let view = render_page(&state.itinerary, &state.store, page_id(&page)?, cap).await?;
    Ok(Json(view))
}
