//! Distance accumulation and summary statistics over parsed track points.

use geo::{BoundingRect, Coord, LineString, Point};
use serde::Serialize;

use crate::errors::RouteError;
use crate::geo_utils::point_distance_km;
use crate::models::Trackpoint;

/// Parallel per-point series derived from a track, all of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMetrics {
    pub coordinates: Vec<Point<f64>>,
    pub elevations: Vec<f64>,
    /// Distance from the first point, non-decreasing, starting at 0.
    pub cumulative_distance_km: Vec<f64>,
}

/// Fit-bounds rectangle of a route, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RouteMetrics {
    pub fn build(points: &[Trackpoint]) -> Result<Self, RouteError> {
        if points.is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        let mut coordinates = Vec::with_capacity(points.len());
        let mut elevations = Vec::with_capacity(points.len());
        let mut cumulative_distance_km = Vec::with_capacity(points.len());
        let mut total = 0.0;

        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                total += point_distance_km(points[i - 1].point(), point.point());
            }
            coordinates.push(point.point());
            elevations.push(point.elevation());
            cumulative_distance_km.push(total);
        }

        Ok(Self {
            coordinates,
            elevations,
            cumulative_distance_km,
        })
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.cumulative_distance_km.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> Option<Point<f64>> {
        self.coordinates.first().copied()
    }

    pub fn finish(&self) -> Option<Point<f64>> {
        self.coordinates.last().copied()
    }

    /// Coordinates as `[lat, lon]` pairs, the order map polylines expect.
    pub fn polyline(&self) -> Vec<[f64; 2]> {
        self.coordinates.iter().map(|p| [p.y(), p.x()]).collect()
    }

    pub fn bounds(&self) -> Option<RouteBounds> {
        let line: LineString<f64> = self
            .coordinates
            .iter()
            .map(|p| p.0)
            .collect::<Vec<Coord<f64>>>()
            .into();

        line.bounding_rect().map(|rect| RouteBounds {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lon: rect.min().x,
            max_lon: rect.max().x,
        })
    }
}

/// Totals reported for a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Rounded to 0.1 km.
    pub distance_km: f64,
    /// Sum of climbs between consecutive recorded elevations, whole meters.
    pub elevation_gain_m: f64,
    pub min_elevation_m: Option<f64>,
    pub max_elevation_m: Option<f64>,
    pub trackpoints: usize,
}

impl RouteSummary {
    /// Summarizes a route whose metrics were built from `points`. The
    /// distance is the metrics' total; only points that recorded an
    /// elevation take part in the gain and the min/max, so a point without
    /// one is skipped, not read as 0.
    pub fn from_route(points: &[Trackpoint], metrics: &RouteMetrics) -> Self {
        let mut gain = 0.0;
        let mut min_ele: Option<f64> = None;
        let mut max_ele: Option<f64> = None;
        let mut prev_ele: Option<f64> = None;

        for ele in points.iter().filter_map(|p| p.ele) {
            min_ele = Some(min_ele.map_or(ele, |m| m.min(ele)));
            max_ele = Some(max_ele.map_or(ele, |m| m.max(ele)));
            if let Some(prev) = prev_ele {
                if ele > prev {
                    gain += ele - prev;
                }
            }
            prev_ele = Some(ele);
        }

        Self {
            distance_km: round_to(metrics.total_distance_km(), 1),
            elevation_gain_m: gain.round(),
            min_elevation_m: min_ele.map(f64::round),
            max_elevation_m: max_ele.map(f64::round),
            trackpoints: points.len(),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
