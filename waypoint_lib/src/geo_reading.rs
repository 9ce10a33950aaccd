use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw position sample as reported by the platform. Overwritten on every
/// new answer from the geolocation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoReading {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    pub captured_at: DateTime<Utc>,
}

impl GeoReading {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            captured_at,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.accuracy_m.is_finite()
            && self.accuracy_m >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        let now = Utc::now();
        assert!(GeoReading::new(90.0, 180.0, 0.0, now).is_valid());
        assert!(!GeoReading::new(90.5, 0.0, 5.0, now).is_valid());
        assert!(!GeoReading::new(0.0, -180.1, 5.0, now).is_valid());
        assert!(!GeoReading::new(0.0, 0.0, -1.0, now).is_valid());
        assert!(!GeoReading::new(f64::NAN, 0.0, 1.0, now).is_valid());
        assert!(!GeoReading::new(0.0, 0.0, f64::INFINITY, now).is_valid());
    }
}
