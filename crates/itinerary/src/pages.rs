//! Page-level controller: turns a page id into the view the map and chart
//! draw from.

use serde::Serialize;
use tracing::info;

use crate::chart::{self, SampledSeries};
use crate::config::{Itinerary, RestDay, Target};
use crate::errors::RouteError;
use crate::gpx_parser::parse_gpx;
use crate::route_metrics::{RouteBounds, RouteMetrics, RouteSummary};
use crate::route_store::RouteStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// `[lat, lon]`
    pub position: [f64; 2],
    pub label: &'static str,
}

/// Everything derived from one GPX document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRoute {
    pub metrics: RouteMetrics,
    pub profile: SampledSeries,
    pub summary: RouteSummary,
}

/// Parses and measures a GPX document, sampling the profile to `cap` points.
pub fn process_route(gpx_text: &str, cap: usize) -> Result<ProcessedRoute, RouteError> {
    let points = parse_gpx(gpx_text)?;
    info!("Track points found: {}", points.len());

    let metrics = RouteMetrics::build(&points)?;
    let profile = chart::sample(&metrics, cap);
    let summary = RouteSummary::from_route(&points, &metrics);

    info!(
        "Route data processed: {} points, {:.2} km",
        metrics.len(),
        metrics.total_distance_km()
    );

    Ok(ProcessedRoute {
        metrics,
        profile,
        summary,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteView {
    pub page: String,
    pub day: Option<u32>,
    pub polyline: Vec<[f64; 2]>,
    pub start: Marker,
    pub finish: Marker,
    /// Rectangle the map fits to, on load and from the "fit route" control.
    pub bounds: RouteBounds,
    pub profile: SampledSeries,
    pub summary: RouteSummary,
}

impl RouteView {
    pub fn new(page: &str, day: Option<u32>, route: ProcessedRoute) -> Result<Self, RouteError> {
        let metrics = &route.metrics;
        let (Some(start), Some(finish), Some(bounds)) =
            (metrics.start(), metrics.finish(), metrics.bounds())
        else {
            return Err(RouteError::EmptyRoute);
        };

        Ok(Self {
            page: page.to_string(),
            day,
            polyline: metrics.polyline(),
            start: Marker {
                position: [start.y(), start.x()],
                label: "Start",
            },
            finish: Marker {
                position: [finish.y(), finish.x()],
                label: "Finish",
            },
            bounds,
            profile: route.profile,
            summary: route.summary,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestDayView {
    pub page: String,
    pub day: Option<u32>,
    #[serde(flatten)]
    pub rest: RestDay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageView {
    Route(RouteView),
    RestDay(RestDayView),
}

/// Resolves `page_id` and builds its view. Rest days never touch the store.
pub async fn render_page(
    itinerary: &Itinerary,
    store: &RouteStore,
    page_id: &str,
    cap: usize,
) -> Result<PageView, RouteError> {
    let resolved = itinerary.resolve(page_id);

    match resolved.target {
        Target::Route(path) => {
            let text = store.fetch(path).await?;
            let route = process_route(&text, cap)?;
            Ok(PageView::Route(RouteView::new(page_id, resolved.day, route)?))
        }
        Target::RestDay(rest) => Ok(PageView::RestDay(RestDayView {
            page: page_id.to_string(),
            day: resolved.day,
            rest: rest.clone(),
        })),
    }
}
