use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Options handed to the platform for every acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
    /// Always 0 in practice, a cached fix is never acceptable.
    pub max_cache_age_ms: u32,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            max_cache_age_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
    pub max_zoom: f64,
    pub tile_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Santiago de Chile
        Self {
            center_lat: -33.4489,
            center_lng: -70.6693,
            zoom: 12.,
            max_zoom: 19.,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub acquisition: AcquisitionOptions,
    /// How long an unanswered permission prompt may block the first reading.
    pub user_decision_timeout_ms: u32,
    pub map: MapConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            acquisition: AcquisitionOptions::default(),
            user_decision_timeout_ms: 5_000,
            map: MapConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.acquisition.timeout_ms == 0 {
            return Err(ConfigError::Invalid("acquisition.timeout_ms must be positive".into()));
        }
        if self.acquisition.max_cache_age_ms != 0 {
            return Err(ConfigError::Invalid("acquisition.max_cache_age_ms must be 0, cached readings are not allowed".into()));
        }
        if !(-90.0..=90.0).contains(&self.map.center_lat) || !(-180.0..=180.0).contains(&self.map.center_lng) {
            return Err(ConfigError::Invalid(format!(
                "map center ({}, {}) is out of range",
                self.map.center_lat, self.map.center_lng
            )));
        }
        if self.map.zoom < 0. || self.map.zoom > self.map.max_zoom {
            return Err(ConfigError::Invalid(format!("map zoom {} outside 0..={}", self.map.zoom, self.map.max_zoom)));
        }
        Ok(())
    }

    /// Total time before an unanswered request is given up on. The platform
    /// timeout only starts after the user has answered the permission prompt.
    pub fn watchdog_ms(&self) -> u32 {
        self.user_decision_timeout_ms.saturating_add(self.acquisition.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TrackerConfig::default();
        assert!(config.acquisition.high_accuracy);
        assert_eq!(config.acquisition.timeout_ms, 10_000);
        assert_eq!(config.acquisition.max_cache_age_ms, 0);
        assert_eq!(config.watchdog_ms(), 15_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = TrackerConfig::from_json(r#"{ "map": { "zoom": 15 } }"#).unwrap();
        assert_eq!(config.map.zoom, 15.);
        assert_eq!(config.map.center_lat, -33.4489);
        assert_eq!(config.acquisition, AcquisitionOptions::default());
    }

    #[test]
    fn rejects_cached_readings() {
        let result = TrackerConfig::from_json(r#"{ "acquisition": { "max_cache_age_ms": 60000 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(TrackerConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }
}
