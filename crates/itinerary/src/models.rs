use geo::Point;
use serde::{Deserialize, Serialize};

/// A recorded position from a GPX track, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trackpoint {
    pub lat: f64,
    pub lon: f64,
    /// Elevation in meters, `None` when the point has no usable `<ele>`.
    pub ele: Option<f64>,
}

impl Trackpoint {
    pub fn new(lat: f64, lon: f64, ele: Option<f64>) -> Self {
        Self { lat, lon, ele }
    }

    /// Elevation in meters; points without one read as sea level.
    pub fn elevation(&self) -> f64 {
        self.ele.unwrap_or(0.0)
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}
