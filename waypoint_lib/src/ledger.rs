use chrono::{DateTime, Utc};
use tracing::info;

use crate::{distance::distance_between, error::LedgerError, geo_reading::GeoReading, waypoint::Waypoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    Empty,
    HasReferencePoint,
}

/// Append-only list of recorded waypoints. The first one is the reference point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointLedger {
    waypoints: Vec<Waypoint>,
}

impl WaypointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_waypoint(&mut self, reading: Option<&GeoReading>) -> Result<Waypoint, LedgerError> {
        self.register_waypoint_at(reading, Utc::now())
    }

    pub fn register_waypoint_at(&mut self, reading: Option<&GeoReading>, now: DateTime<Utc>) -> Result<Waypoint, LedgerError> {
        let Some(reading) = reading else {
            return Err(LedgerError::NoReadingAvailable);
        };

        let waypoint = Waypoint::from_reading(reading, now);
        self.waypoints.push(waypoint.clone());
        info!(
            "Registered waypoint {}: {:.4}, {:.4} ±{} m",
            self.waypoints.len(),
            waypoint.latitude(),
            waypoint.longitude(),
            waypoint.accuracy_m()
        );

        Ok(waypoint)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn reference(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn latest(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn state(&self) -> LedgerState {
        if self.waypoints.is_empty() {
            LedgerState::Empty
        } else {
            LedgerState::HasReferencePoint
        }
    }

    /// Distance from the reference point to the latest waypoint, intermediate points ignored.
    pub fn current_distance(&self) -> Option<f64> {
        if self.waypoints.len() < 2 {
            return None;
        }
        Some(distance_between(self.reference()?, self.latest()?))
    }
}
