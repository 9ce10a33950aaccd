use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use waypoint_lib::{
    acquirer::{GeolocationProvider, RequestTicket, WatchId},
    config::AcquisitionOptions,
    error::AcquisitionError,
    geo_reading::GeoReading,
};
use web_sys::{js_sys::Reflect, Geolocation, GeolocationPosition, GeolocationPositionError, PositionOptions};
use yew::Callback;

/// Answers from the browser, delivered to the root component as messages.
pub enum GeoEvent {
    Position(RequestTicket, Result<GeoReading, AcquisitionError>),
    Watch(WatchId, Result<GeoReading, AcquisitionError>),
    Expired(RequestTicket),
}

type JsCallback = Closure<dyn FnMut(JsValue)>;
type Watchdog = Rc<RefCell<Option<(RequestTicket, Timeout)>>>;

pub struct BrowserGeolocation {
    geolocation: Option<Geolocation>,
    on_event: Callback<GeoEvent>,
    watchdog_ms: u32,
    // Dropping the Timeout cancels it
    watchdog: Watchdog,
    // Kept alive until the watch is cleared
    watches: HashMap<i32, (JsCallback, JsCallback)>,
}

impl BrowserGeolocation {
    pub fn new(on_event: Callback<GeoEvent>, watchdog_ms: u32) -> Self {
        let geolocation = web_sys::window()
            .map(|window| window.navigator())
            .filter(|navigator| Reflect::has(navigator, &JsValue::from_str("geolocation")).unwrap_or(false))
            .and_then(|navigator| navigator.geolocation().ok());

        Self {
            geolocation,
            on_event,
            watchdog_ms,
            watchdog: Rc::new(RefCell::new(None)),
            watches: HashMap::new(),
        }
    }
}

impl GeolocationProvider for BrowserGeolocation {
    fn is_supported(&self) -> bool {
        self.geolocation.is_some()
    }

    fn request_position(&mut self, ticket: RequestTicket, options: &AcquisitionOptions) -> Result<(), AcquisitionError> {
        let Some(geolocation) = &self.geolocation else {
            return Err(AcquisitionError::Unsupported);
        };

        let on_success = {
            let cb = self.on_event.clone();
            let watchdog = self.watchdog.clone();
            Closure::once_into_js(move |value: JsValue| {
                disarm(&watchdog, ticket);
                cb.emit(GeoEvent::Position(ticket, to_reading(value)))
            })
        };
        let on_error = {
            let cb = self.on_event.clone();
            let watchdog = self.watchdog.clone();
            Closure::once_into_js(move |value: JsValue| {
                disarm(&watchdog, ticket);
                cb.emit(GeoEvent::Position(ticket, Err(to_error(value))))
            })
        };

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.unchecked_ref(),
                Some(on_error.unchecked_ref()),
                &position_options(options),
            )
            .map_err(|err| AcquisitionError::PositionUnavailable(format!("{err:?}")))?;

        // The platform timeout does not cover an ignored permission prompt.
        // Replacing the slot cancels the timer of a superseded request.
        let cb = self.on_event.clone();
        let timer = Timeout::new(self.watchdog_ms, move || cb.emit(GeoEvent::Expired(ticket)));
        self.watchdog.borrow_mut().replace((ticket, timer));

        Ok(())
    }

    fn watch_position(&mut self, options: &AcquisitionOptions) -> Result<WatchId, AcquisitionError> {
        let Some(geolocation) = &self.geolocation else {
            return Err(AcquisitionError::Unsupported);
        };

        // Callbacks never fire synchronously, so the id is set before they run
        let id = Rc::new(Cell::new(None));

        let on_success = {
            let cb = self.on_event.clone();
            let id = id.clone();
            JsCallback::new(move |value: JsValue| {
                if let Some(watch) = id.get() {
                    cb.emit(GeoEvent::Watch(watch, to_reading(value)));
                }
            })
        };
        let on_error = {
            let cb = self.on_event.clone();
            let id = id.clone();
            JsCallback::new(move |value: JsValue| {
                if let Some(watch) = id.get() {
                    cb.emit(GeoEvent::Watch(watch, Err(to_error(value))));
                }
            })
        };

        let raw = geolocation
            .watch_position_with_error_callback_and_options(
                on_success.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &position_options(options),
            )
            .map_err(|err| AcquisitionError::PositionUnavailable(format!("{err:?}")))?;

        let watch = WatchId(raw);
        id.set(Some(watch));
        self.watches.insert(raw, (on_success, on_error));
        Ok(watch)
    }

    fn clear_watch(&mut self, watch: WatchId) {
        if let Some(geolocation) = &self.geolocation {
            geolocation.clear_watch(watch.0);
        }
        self.watches.remove(&watch.0);
    }
}

impl Drop for BrowserGeolocation {
    fn drop(&mut self) {
        self.watchdog.borrow_mut().take();
    }
}

/// Cancels the watchdog if it still belongs to `ticket`.
fn disarm(watchdog: &Watchdog, ticket: RequestTicket) {
    let mut slot = watchdog.borrow_mut();
    if slot.as_ref().is_some_and(|(armed, _)| *armed == ticket) {
        slot.take();
    }
}

fn position_options(options: &AcquisitionOptions) -> PositionOptions {
    let opts = PositionOptions::new();
    opts.set_enable_high_accuracy(options.high_accuracy);
    opts.set_timeout(options.timeout_ms);
    opts.set_maximum_age(options.max_cache_age_ms);
    opts
}

fn to_reading(value: JsValue) -> Result<GeoReading, AcquisitionError> {
    let position: GeolocationPosition = value
        .dyn_into()
        .map_err(|_| AcquisitionError::PositionUnavailable("Browser returned a malformed position".into()))?;
    let coords = position.coords();
    let captured_at = DateTime::<Utc>::from_timestamp_millis(position.timestamp() as i64).unwrap_or_else(Utc::now);

    let reading = GeoReading::new(coords.latitude(), coords.longitude(), coords.accuracy(), captured_at);
    if !reading.is_valid() {
        return Err(AcquisitionError::PositionUnavailable(format!(
            "Browser returned an invalid position: {}, {} ±{}",
            reading.latitude, reading.longitude, reading.accuracy_m
        )));
    }

    Ok(reading)
}

fn to_error(value: JsValue) -> AcquisitionError {
    match value.dyn_into::<GeolocationPositionError>() {
        Ok(err) => AcquisitionError::from_platform(err.code(), err.message()),
        Err(value) => AcquisitionError::PositionUnavailable(format!("Unknown geolocation error: {value:?}")),
    }
}
