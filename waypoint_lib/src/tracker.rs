use tracing::debug;

use crate::{
    acquirer::{GeolocationProvider, LocationAcquirer, RequestTicket, WatchId},
    config::TrackerConfig,
    error::{AcquisitionError, TrackerError},
    geo_reading::GeoReading,
    ledger::WaypointLedger,
    view::{MapScene, TrackerView},
    waypoint::Waypoint,
};

/// Everything the widget knows. The UI only ever reads [`TrackerView`] and [`MapScene`] from it.
pub struct TrackerState<P: GeolocationProvider> {
    acquirer: LocationAcquirer<P>,
    ledger: WaypointLedger,
    distance: Option<f64>,
}

impl<P: GeolocationProvider> TrackerState<P> {
    pub fn new(provider: P, config: &TrackerConfig) -> Self {
        Self {
            acquirer: LocationAcquirer::new(provider, config.acquisition.clone()),
            ledger: WaypointLedger::new(),
            distance: None,
        }
    }

    pub fn acquirer(&self) -> &LocationAcquirer<P> {
        &self.acquirer
    }

    pub fn ledger(&self) -> &WaypointLedger {
        &self.ledger
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Register is only offered once a reading exists.
    pub fn can_register(&self) -> bool {
        self.acquirer.current_reading().is_some()
    }

    pub fn start_tracking(&mut self) -> Result<RequestTicket, TrackerError> {
        Ok(self.acquirer.start()?)
    }

    /// Records the current reading. In one-shot mode a fresh reading is
    /// requested afterwards so the next registration doesn't reuse this one.
    pub fn register_location(&mut self) -> Result<(Waypoint, Option<RequestTicket>), TrackerError> {
        let result = self.ledger.register_waypoint(self.acquirer.current_reading());

        let refresh = if self.acquirer.is_watching() {
            None
        } else {
            self.acquirer.request().ok().flatten()
        };

        let waypoint = result?;
        self.distance = self.ledger.current_distance();
        if let Some(distance) = self.distance {
            debug!("Distance from reference point: {distance:.1} m");
        }

        Ok((waypoint, refresh))
    }

    pub fn on_position(&mut self, ticket: RequestTicket, result: Result<GeoReading, AcquisitionError>) -> bool {
        self.acquirer.complete(ticket, result)
    }

    pub fn on_watch_position(&mut self, watch: WatchId, result: Result<GeoReading, AcquisitionError>) -> bool {
        self.acquirer.watch_update(watch, result)
    }

    pub fn on_request_expired(&mut self, ticket: RequestTicket) -> bool {
        self.acquirer.expire(ticket)
    }

    pub fn set_following(&mut self, follow: bool) -> Result<(), TrackerError> {
        if follow {
            self.acquirer.start_watch()?;
        } else {
            self.acquirer.stop_watch();
        }
        Ok(())
    }

    pub fn view(&self) -> TrackerView {
        TrackerView::project(self)
    }

    pub fn scene(&self) -> MapScene {
        MapScene::project(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{distance::distance_between, error::LedgerError, mock::MockProvider};

    fn reading(lat: f64, lng: f64) -> GeoReading {
        GeoReading::new(lat, lng, 6., Utc::now())
    }

    fn tracker() -> TrackerState<MockProvider> {
        TrackerState::new(MockProvider::default(), &TrackerConfig::default())
    }

    #[test]
    fn register_before_any_reading() {
        let mut tracker = tracker();
        assert!(!tracker.can_register());
        assert_eq!(
            tracker.register_location().map(|(w, _)| w),
            Err(TrackerError::Ledger(LedgerError::NoReadingAvailable))
        );
        assert!(tracker.ledger().is_empty());
        assert_eq!(tracker.distance(), None);
    }

    #[test]
    fn distance_follows_first_and_last() {
        let mut tracker = tracker();
        let ticket = tracker.start_tracking().unwrap();
        tracker.on_position(ticket, Ok(reading(-33.4489, -70.6693)));
        assert!(tracker.can_register());

        let (_, refresh) = tracker.register_location().unwrap();
        assert_eq!(tracker.distance(), None);

        let refresh = refresh.unwrap();
        tracker.on_position(refresh, Ok(reading(-33.4489, -70.6743)));
        let (_, refresh) = tracker.register_location().unwrap();
        tracker.on_position(refresh.unwrap(), Ok(reading(-33.4489, -70.6793)));
        tracker.register_location().unwrap();

        let waypoints = tracker.ledger().waypoints();
        assert_eq!(waypoints.len(), 3);
        let expected = distance_between(&waypoints[0], &waypoints[2]);
        assert_eq!(tracker.distance(), Some(expected));
        assert!((expected - 928.).abs() <= 5.);
    }

    #[test]
    fn register_requests_fresh_reading_without_overlap() {
        let mut tracker = tracker();
        let ticket = tracker.start_tracking().unwrap();
        tracker.on_position(ticket, Ok(reading(1., 1.)));

        let (_, first) = tracker.register_location().unwrap();
        // The refresh is still outstanding, registering again reuses it
        let (_, second) = tracker.register_location().unwrap();
        assert_eq!(first, second);
        assert_eq!(tracker.acquirer().provider().requests.borrow().len(), 2);
    }

    #[test]
    fn following_does_not_issue_one_shot_refreshes() {
        let mut tracker = tracker();
        tracker.set_following(true).unwrap();
        let watch = WatchId(1);
        assert!(tracker.on_watch_position(watch, Ok(reading(2., 2.))));

        let (_, refresh) = tracker.register_location().unwrap();
        assert_eq!(refresh, None);

        tracker.set_following(false).unwrap();
        assert!(!tracker.acquirer().is_watching());
        assert!(!tracker.on_watch_position(watch, Ok(reading(3., 3.))));
    }

    #[test]
    fn platform_error_keeps_ledger_usable() {
        let mut tracker = tracker();
        let ticket = tracker.start_tracking().unwrap();
        tracker.on_position(ticket, Ok(reading(1., 1.)));
        let (_, refresh) = tracker.register_location().unwrap();

        tracker.on_position(refresh.unwrap(), Err(AcquisitionError::from_platform(2, "Position unavailable")));
        assert!(tracker.acquirer().error().is_some());

        // The last good reading is still there
        assert!(tracker.register_location().is_ok());
        assert_eq!(tracker.ledger().len(), 2);
        assert_eq!(tracker.distance(), Some(0.));
    }
}
