use geo_types::Point;

use crate::waypoint::Waypoint;

/// Mean earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres between two points (x = lon, y = lat).
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let d_lat = (p2.y() - p1.y()).to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    // Float noise can push a just above 1 for near antipodal points
    let a = a.clamp(0., 1.);
    let c = 2. * f64::atan2(a.sqrt(), (1. - a).sqrt());

    EARTH_RADIUS_M * c
}

pub fn distance_between(a: &Waypoint, b: &Waypoint) -> f64 {
    haversine_distance(a.position(), b.position())
}

/// Display quantization: nearest multiple of 10 m, ties away from zero.
pub fn format_distance(meters: f64) -> u64 {
    if !meters.is_finite() || meters <= 0. {
        return 0;
    }
    ((meters / 10.).round() * 10.) as u64
}

/// Human readable form of [`format_distance`], switching to km from 1000 m.
pub fn display_distance(meters: f64) -> String {
    let rounded = format_distance(meters);
    if rounded >= 1000 {
        format!("{:.2} km", rounded as f64 / 1000.)
    } else {
        format!("{} m", rounded)
    }
}
