//! Perlin noise-based elevation generation.

use noise::{NoiseFn, Perlin};

/// Generates terrain elevation using Perlin noise.
///
/// Several octaves are summed so the profile shows both long climbs and
/// short rollers.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters (e.g., valley floor).
    base_elevation: f64,
    /// Scale factor for terrain height variation.
    height_scale: f64,
    /// Spatial frequency in cycles per degree.
    frequency: f64,
    octaves: u32,
}

impl ElevationGenerator {
    /// Andean highland terrain around 2000-2800 m.
    pub fn andes(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 2400.0,
            height_scale: 600.0,
            frequency: 8.0,
            octaves: 4,
        }
    }

    /// Gently rolling valley floor.
    pub fn flat(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 300.0,
            height_scale: 40.0,
            frequency: 12.0,
            octaves: 2,
        }
    }

    pub fn with_base_elevation(mut self, elevation: f64) -> Self {
        self.base_elevation = elevation;
        self
    }

    pub fn with_height_scale(mut self, scale: f64) -> Self {
        self.height_scale = scale;
        self
    }

    pub fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    /// Elevation at a lat/lon coordinate, using fractal Brownian motion.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            let noise_val = self.perlin.get([lat * frequency, lon * frequency]);
            total += noise_val * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = total / max_amplitude; // -1 to 1
        self.base_elevation + (normalized * self.height_scale)
    }

    pub fn elevation_profile(&self, coords: &[(f64, f64)]) -> Vec<f64> {
        coords
            .iter()
            .map(|(lat, lon)| self.elevation_at(*lat, *lon))
            .collect()
    }
}
