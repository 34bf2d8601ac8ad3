use std::time::Duration;
use std::time::Instant;

use crate::domain::models::Notice;

const NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Holds the single visible notice and its expiry deadline. A new notice
/// pre-empts the current one and restarts the timer; there is no queue.
/// Expiry is driven by the UI tick against a caller-supplied `Instant`.
#[derive(Default)]
pub struct Notifier {
    current: Option<(Notice, Instant)>,
}

impl Notifier {
    pub fn new() -> Notifier {
        return Notifier::default();
    }

    pub fn notify(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now + NOTICE_TTL));
    }

    pub fn current(&self, now: Instant) -> Option<&Notice> {
        match &self.current {
            Some((notice, deadline)) if now < *deadline => Some(notice),
            _ => None,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some((_, deadline)) = &self.current {
            if now >= *deadline {
                self.current = None;
            }
        }
    }
}
