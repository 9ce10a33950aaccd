use std::{cell::RefCell, rc::Rc};

use crate::{
    acquirer::{GeolocationProvider, RequestTicket, WatchId},
    config::AcquisitionOptions,
    error::AcquisitionError,
};

/// Records what the acquirer asked of the platform. Answers are fed back by the test.
pub struct MockProvider {
    supported: bool,
    next_watch: i32,
    fail_next: RefCell<Option<AcquisitionError>>,
    pub requests: Rc<RefCell<Vec<(RequestTicket, AcquisitionOptions)>>>,
    pub cleared: Rc<RefCell<Vec<WatchId>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            supported: true,
            next_watch: 0,
            fail_next: RefCell::new(None),
            requests: Rc::new(RefCell::new(Vec::new())),
            cleared: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl MockProvider {
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Default::default()
        }
    }

    pub fn fail_next_request(&self, err: AcquisitionError) {
        *self.fail_next.borrow_mut() = Some(err);
    }
}

impl GeolocationProvider for MockProvider {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn request_position(&mut self, ticket: RequestTicket, options: &AcquisitionOptions) -> Result<(), AcquisitionError> {
        if let Some(err) = self.fail_next.borrow_mut().take() {
            return Err(err);
        }
        self.requests.borrow_mut().push((ticket, options.clone()));
        Ok(())
    }

    fn watch_position(&mut self, _options: &AcquisitionOptions) -> Result<WatchId, AcquisitionError> {
        self.next_watch += 1;
        Ok(WatchId(self.next_watch))
    }

    fn clear_watch(&mut self, watch: WatchId) {
        self.cleared.borrow_mut().push(watch);
    }
}
