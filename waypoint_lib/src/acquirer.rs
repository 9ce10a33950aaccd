use tracing::{debug, info, warn};

use crate::{config::AcquisitionOptions, error::AcquisitionError, geo_reading::GeoReading};

/// Identifies one one-shot request. Answers carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(pub u64);

/// Handle of a continuous watch registered with the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub i32);

/// The platform's geolocation capability.
///
/// Answers are delivered asynchronously by the implementation and must be
/// routed back into [`LocationAcquirer::complete`] / [`LocationAcquirer::watch_update`].
pub trait GeolocationProvider {
    fn is_supported(&self) -> bool;

    fn request_position(&mut self, ticket: RequestTicket, options: &AcquisitionOptions) -> Result<(), AcquisitionError>;

    fn watch_position(&mut self, options: &AcquisitionOptions) -> Result<WatchId, AcquisitionError>;

    fn clear_watch(&mut self, watch: WatchId);
}

pub struct LocationAcquirer<P: GeolocationProvider> {
    provider: P,
    options: AcquisitionOptions,
    enabled: bool,
    current: Option<GeoReading>,
    error: Option<AcquisitionError>,
    pending: Option<RequestTicket>,
    next_ticket: u64,
    watch: Option<WatchId>,
}

impl<P: GeolocationProvider> LocationAcquirer<P> {
    /// Nothing is requested from the platform until [`Self::start`] is called.
    pub fn new(provider: P, options: AcquisitionOptions) -> Self {
        Self {
            provider,
            options,
            enabled: false,
            current: None,
            error: None,
            pending: None,
            next_ticket: 0,
            watch: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_supported()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    pub fn current_reading(&self) -> Option<&GeoReading> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&AcquisitionError> {
        self.error.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn start(&mut self) -> Result<RequestTicket, AcquisitionError> {
        if !self.is_available() {
            warn!("Geolocation is not supported on this platform");
            self.error = Some(AcquisitionError::Unsupported);
            return Err(AcquisitionError::Unsupported);
        }

        if !self.enabled {
            info!("Location tracking enabled");
            self.enabled = true;
        }

        self.issue()
    }

    /// Issues a fresh one-shot request. Returns the already pending ticket if
    /// one is outstanding, and `None` while tracking is not enabled.
    pub fn request(&mut self) -> Result<Option<RequestTicket>, AcquisitionError> {
        if !self.enabled {
            return Ok(None);
        }

        self.issue().map(Some)
    }

    fn issue(&mut self) -> Result<RequestTicket, AcquisitionError> {
        if let Some(ticket) = self.pending {
            debug!("Request {} still pending, not issuing another", ticket.0);
            return Ok(ticket);
        }

        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);

        if let Err(err) = self.provider.request_position(ticket, &self.options) {
            warn!("Location request failed to start: {err}");
            self.error = Some(err.clone());
            return Err(err);
        }

        debug!("Issued location request {}", ticket.0);
        self.pending = Some(ticket);
        Ok(ticket)
    }

    /// Applies the answer to a one-shot request. Returns false if the ticket was stale.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<GeoReading, AcquisitionError>) -> bool {
        if self.pending != Some(ticket) {
            debug!("Ignoring stale answer for request {}", ticket.0);
            return false;
        }

        self.pending = None;
        self.apply(result);
        true
    }

    /// The watchdog fired before the platform answered. Tracking is turned
    /// off unless a watch is still delivering readings.
    pub fn expire(&mut self, ticket: RequestTicket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }

        warn!("Location request {} was never answered", ticket.0);
        self.pending = None;
        if self.watch.is_none() {
            self.enabled = false;
        }
        self.error = Some(AcquisitionError::Timeout("No answer to the location permission prompt".into()));
        true
    }

    pub fn start_watch(&mut self) -> Result<WatchId, AcquisitionError> {
        if let Some(watch) = self.watch {
            return Ok(watch);
        }

        if !self.is_available() {
            self.error = Some(AcquisitionError::Unsupported);
            return Err(AcquisitionError::Unsupported);
        }

        // The watch supersedes any outstanding one-shot, its answer is stale from here on
        if let Some(ticket) = self.pending.take() {
            debug!("Dropping request {} in favour of the watch", ticket.0);
        }

        match self.provider.watch_position(&self.options) {
            Ok(watch) => {
                info!("Started watching position ({})", watch.0);
                self.enabled = true;
                self.watch = Some(watch);
                Ok(watch)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn stop_watch(&mut self) {
        if let Some(watch) = self.watch.take() {
            info!("Stopped watching position ({})", watch.0);
            self.provider.clear_watch(watch);
        }
    }

    /// Applies a reading from a continuous watch. Returns false if the watch is no longer active.
    pub fn watch_update(&mut self, watch: WatchId, result: Result<GeoReading, AcquisitionError>) -> bool {
        if self.watch != Some(watch) {
            debug!("Ignoring update from cleared watch {}", watch.0);
            return false;
        }

        self.apply(result);
        true
    }

    fn apply(&mut self, result: Result<GeoReading, AcquisitionError>) {
        match result {
            Ok(reading) if self.current.as_ref().is_some_and(|c| reading.captured_at < c.captured_at) => {
                debug!("Ignoring reading captured before the current one");
            }
            Ok(reading) => {
                debug!("New reading {:.6}, {:.6} ±{:.0} m", reading.latitude, reading.longitude, reading.accuracy_m);
                self.current = Some(reading);
                self.error = None;
            }
            Err(err) => {
                warn!("Location error: {err}");
                self.error = Some(err);
            }
        }
    }
}

impl<P: GeolocationProvider> Drop for LocationAcquirer<P> {
    fn drop(&mut self) {
        self.stop_watch();
    }
}
