//! Great-circle distance between GPS positions.

use geo::Point;

/// Mean Earth radius used for every route distance, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two latitude/longitude pairs
/// given in degrees.
///
/// NaN inputs produce NaN.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Same as [`haversine_km`] for `geo` points (x = longitude, y = latitude).
pub fn point_distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    haversine_km(a.y(), a.x(), b.y(), b.x())
}
