//! Procedural route generation.

use itinerary::models::Trackpoint;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::{BoundingBox, Region};
use crate::terrain::ElevationGenerator;

/// Configuration for procedural route generation.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Starting point (lat, lon). If None, random within bounds.
    pub start_point: Option<(f64, f64)>,
    pub bounds: BoundingBox,
    /// Approximate distance between track points in meters.
    pub point_spacing_m: f64,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// GPS elevation jitter standard deviation in meters.
    pub elevation_jitter_m: f64,
    /// Fraction of points written without an elevation (0.0 - 1.0).
    pub elevation_dropout: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            start_point: None,
            bounds: Region::BOYACA,
            point_spacing_m: 25.0,
            gps_jitter_m: 3.0,
            elevation_jitter_m: 2.0,
            elevation_dropout: 0.0,
        }
    }
}

/// Generates synthetic cycling routes as a random walk with momentum.
pub struct ProceduralGenerator {
    config: RouteConfig,
    elevation: ElevationGenerator,
}

impl ProceduralGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            config: RouteConfig::default(),
            elevation: ElevationGenerator::andes(seed),
        }
    }

    pub fn for_region(bounds: BoundingBox, elevation: ElevationGenerator) -> Self {
        Self {
            config: RouteConfig {
                bounds,
                ..Default::default()
            },
            elevation,
        }
    }

    pub fn with_start(mut self, lat: f64, lon: f64) -> Self {
        self.config.start_point = Some((lat, lon));
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_gps_jitter(mut self, meters: f64) -> Self {
        self.config.gps_jitter_m = meters;
        self
    }

    pub fn with_elevation_dropout(mut self, fraction: f64) -> Self {
        self.config.elevation_dropout = fraction.clamp(0.0, 1.0);
        self
    }

    /// Generates a route of at least `distance_meters`.
    pub fn generate(&self, distance_meters: f64, rng: &mut impl Rng) -> Vec<Trackpoint> {
        let steps = (distance_meters / self.config.point_spacing_m).ceil().max(0.0) as usize;
        self.generate_points(steps + 1, rng)
    }

    /// Generates exactly `count` track points.
    pub fn generate_points(&self, count: usize, rng: &mut impl Rng) -> Vec<Trackpoint> {
        let start = self
            .config
            .start_point
            .unwrap_or_else(|| self.config.bounds.random_point(rng));

        self.generate_path(start, count, rng)
            .into_iter()
            .map(|(lat, lon)| self.apply_noise(lat, lon, rng))
            .collect()
    }

    /// Generates the path coordinates only.
    pub fn generate_path(
        &self,
        start: (f64, f64),
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<(f64, f64)> {
        let mut path = Vec::with_capacity(count);
        if count == 0 {
            return path;
        }

        let mut current = start;
        path.push(current);
        let mut heading = rng.gen_range(0.0..std::f64::consts::TAU);

        while path.len() < count {
            heading += rng.gen_range(-0.3..0.3);
            let step = self.config.point_spacing_m * rng.gen_range(0.8..1.2);

            // 1 degree of latitude is ~111 km
            let lat_delta = (step * heading.cos()) / 111_000.0;
            let lon_delta = (step * heading.sin()) / (111_000.0 * current.0.to_radians().cos());

            let (next_lat, next_lon, bounced_heading) =
                self.apply_bounds(current.0 + lat_delta, current.1 + lon_delta, heading);
            heading = bounced_heading;

            current = (next_lat, next_lon);
            path.push(current);
        }

        path
    }

    /// Keeps the walk inside the bounds by reflecting the heading.
    fn apply_bounds(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut new_heading = heading;

        let lat = if lat < b.min_lat {
            new_heading = std::f64::consts::PI - heading;
            b.min_lat + (b.min_lat - lat).min(0.001)
        } else if lat > b.max_lat {
            new_heading = std::f64::consts::PI - heading;
            b.max_lat - (lat - b.max_lat).min(0.001)
        } else {
            lat
        };

        let lon = if lon < b.min_lon {
            new_heading = -heading;
            b.min_lon + (b.min_lon - lon).min(0.001)
        } else if lon > b.max_lon {
            new_heading = -heading;
            b.max_lon - (lon - b.max_lon).min(0.001)
        } else {
            lon
        };

        (lat, lon, new_heading)
    }

    fn apply_noise(&self, lat: f64, lon: f64, rng: &mut impl Rng) -> Trackpoint {
        let jitter_deg = self.config.gps_jitter_m / 111_000.0;
        let lat_noise: f64 = rng.sample(StandardNormal);
        let lon_noise: f64 = rng.sample(StandardNormal);
        let ele_noise: f64 = rng.sample(StandardNormal);

        let ele = if rng.gen_bool(self.config.elevation_dropout) {
            None
        } else {
            Some(self.elevation.elevation_at(lat, lon) + ele_noise * self.config.elevation_jitter_m)
        };

        Trackpoint::new(
            (lat + lat_noise * jitter_deg).clamp(-90.0, 90.0),
            (lon + lon_noise * jitter_deg).clamp(-180.0, 180.0),
            ele,
        )
    }
}
