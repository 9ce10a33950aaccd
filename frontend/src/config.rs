use gloo_console::{error, info};
use waypoint_lib::config::TrackerConfig;

pub fn load() -> TrackerConfig {
    match TrackerConfig::from_json(include_str!("../tracker_config.json")) {
        Ok(config) => {
            info!("Loaded tracker config");
            config
        }
        Err(err) => {
            error!(format!("{err}, using defaults"));
            TrackerConfig::default()
        }
    }
}
