use std::future::Future;
use std::time::Duration;

use crate::timer::TimerHandle;

/// Trailing-edge debouncer: each `schedule` call replaces the pending task and
/// restarts the quiet period.
///
/// A replaced task is aborted even if its quiet period already elapsed and it
/// is mid-request, so at most one scheduled task is ever live.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(TimerHandle::after(self.quiet_period, task));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// True while a scheduled task has not yet run to completion.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }
}
