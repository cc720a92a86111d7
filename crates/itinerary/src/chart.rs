//! Elevation profile downsampling for the chart.

use serde::Serialize;

use crate::route_metrics::{RouteMetrics, round_to};

/// Upper bound on chart points, matching what the front end renders smoothly.
pub const DEFAULT_CHART_CAP: usize = 200;

/// Fixed-stride subset of a route's distance/elevation series.
///
/// Starts at the first point; the final point is only included when the
/// stride lands on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledSeries {
    pub stride: usize,
    /// Cumulative distance, rounded to 0.1 km.
    pub distances_km: Vec<f64>,
    /// Elevation, rounded to the nearest meter.
    pub elevations_m: Vec<i32>,
}

impl SampledSeries {
    pub fn len(&self) -> usize {
        self.distances_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances_km.is_empty()
    }
}

/// `stride = max(1, len / cap)`; a cap of 0 behaves like 1.
pub fn stride_for(len: usize, cap: usize) -> usize {
    (len / cap.max(1)).max(1)
}

pub fn sample(metrics: &RouteMetrics, cap: usize) -> SampledSeries {
    let stride = stride_for(metrics.len(), cap);

    let distances_km = metrics
        .cumulative_distance_km
        .iter()
        .step_by(stride)
        .map(|d| round_to(*d, 1))
        .collect();
    let elevations_m = metrics
        .elevations
        .iter()
        .step_by(stride)
        .map(|e| e.round() as i32)
        .collect();

    SampledSeries {
        stride,
        distances_km,
        elevations_m,
    }
}
