//! Geographic areas used for route generation.

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum latitude (south)
    pub min_lat: f64,
    /// Minimum longitude (west)
    pub min_lon: f64,
    /// Maximum latitude (north)
    pub max_lat: f64,
    /// Maximum longitude (east)
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns a random point within the bounding box.
    pub fn random_point(&self, rng: &mut impl rand::Rng) -> (f64, f64) {
        let lat = rng.gen_range(self.min_lat..self.max_lat);
        let lon = rng.gen_range(self.min_lon..self.max_lon);
        (lat, lon)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Pre-defined regions.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Eastern Andes around Villa de Leyva and the Boyacá highlands.
    pub const BOYACA: BoundingBox = BoundingBox::new(5.4, -73.8, 6.4, -73.2);

    /// Magdalena valley lowlands, for flat stages.
    pub const MAGDALENA: BoundingBox = BoundingBox::new(5.0, -74.9, 5.6, -74.5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_point_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let (lat, lon) = Region::BOYACA.random_point(&mut rng);
            assert!(Region::BOYACA.contains(lat, lon));
        }
    }

    #[test]
    fn test_center() {
        let (lat, lon) = Region::BOYACA.center();
        assert!((lat - 5.9).abs() < 1e-9);
        assert!((lon + 73.5).abs() < 1e-9);
    }
}
