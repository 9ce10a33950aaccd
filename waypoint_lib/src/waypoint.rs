use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::geo_reading::GeoReading;

/// 4 decimals is roughly 11 m at the equator.
pub const COORDINATE_DECIMALS: i32 = 4;

/// A user confirmed location. Fields are private so a recorded waypoint can't be edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    latitude: f64,
    longitude: f64,
    accuracy_m: u32,
    recorded_at: DateTime<Utc>,
}

impl Waypoint {
    /// Quantizes the reading: coordinates to [`COORDINATE_DECIMALS`], accuracy to whole metres.
    pub fn from_reading(reading: &GeoReading, recorded_at: DateTime<Utc>) -> Self {
        Self {
            latitude: quantize(reading.latitude, COORDINATE_DECIMALS),
            longitude: quantize(reading.longitude, COORDINATE_DECIMALS),
            accuracy_m: reading.accuracy_m.max(0.).round() as u32,
            recorded_at,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn accuracy_m(&self) -> u32 {
        self.accuracy_m
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn position(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// Rounds half away from zero, so it never truncates.
pub fn quantize(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
