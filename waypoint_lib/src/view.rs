use crate::{
    acquirer::GeolocationProvider,
    distance::{display_distance, format_distance},
    geo_reading::GeoReading,
    ledger::LedgerState,
    tracker::TrackerState,
    waypoint::Waypoint,
};

/// Read-only snapshot for the control panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerView {
    pub available: bool,
    pub enabled: bool,
    pub pending: bool,
    pub following: bool,
    /// False once the platform reported an error that a retry can't fix
    pub can_start: bool,
    pub reading: Option<GeoReading>,
    /// Code and message exactly as the platform reported them
    pub error: Option<String>,
    pub waypoints: Vec<Waypoint>,
    pub ledger_state: LedgerState,
    pub distance_m: Option<u64>,
    pub distance_label: Option<String>,
    pub can_register: bool,
}

impl TrackerView {
    pub fn project<P: GeolocationProvider>(state: &TrackerState<P>) -> Self {
        let acquirer = state.acquirer();
        Self {
            available: acquirer.is_available(),
            enabled: acquirer.is_enabled(),
            pending: acquirer.is_pending(),
            following: acquirer.is_watching(),
            can_start: acquirer.is_available() && acquirer.error().map_or(true, |e| e.is_retryable()),
            reading: acquirer.current_reading().cloned(),
            error: acquirer.error().map(|e| e.to_string()),
            waypoints: state.ledger().waypoints().to_vec(),
            ledger_state: state.ledger().state(),
            distance_m: state.distance().map(format_distance),
            distance_label: state.distance().map(display_distance),
            can_register: state.can_register(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaypointMarker {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
}

/// Plain data handed to whatever draws the map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapScene {
    pub waypoints: Vec<WaypointMarker>,
    pub live: Option<LiveMarker>,
    /// Where the map should be centred, follows the live reading.
    pub center: Option<(f64, f64)>,
}

impl MapScene {
    pub fn project<P: GeolocationProvider>(state: &TrackerState<P>) -> Self {
        let waypoints = state
            .ledger()
            .waypoints()
            .iter()
            .enumerate()
            .map(|(i, w)| WaypointMarker {
                label: format!("Point {}", i + 1),
                latitude: w.latitude(),
                longitude: w.longitude(),
                accuracy_m: w.accuracy_m(),
            })
            .collect();

        let live = state.acquirer().current_reading().map(|r| LiveMarker {
            latitude: r.latitude,
            longitude: r.longitude,
            accuracy_m: r.accuracy_m,
        });
        let center = live.as_ref().map(|l| (l.latitude, l.longitude));

        Self { waypoints, live, center }
    }
}

/// Implemented by the map widget adapter. Receives scenes, never touches tracker state.
pub trait MapRenderer {
    fn render(&mut self, scene: &MapScene);
}
