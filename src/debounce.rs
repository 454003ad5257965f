use std::time::{Duration, Instant};

pub const QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due: Instant,
}

/// Cancel-and-reschedule timer polled from the UI tick.
///
/// Each `schedule` replaces whatever was pending and pushes the deadline out
/// by the quiet period, so a burst of inputs yields a single value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due: now + self.quiet,
        });
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fires at most once per schedule.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        self.cancel()
    }
}
