use std::sync::Arc;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::timer::TimerHandle;
use crate::{ApiClient, EngineEvent, EventSink, TrackerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSettings {
    /// Quiet period before a suggestion request is sent.
    pub suggest_quiet_period: Duration,
    /// Cadence of upload status polls.
    pub poll_interval: Duration,
    /// Delay between a terminal status and the tracking-finished event.
    pub dismiss_delay: Duration,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            suggest_quiet_period: Duration::from_millis(300),
            poll_interval: Duration::from_millis(500),
            dismiss_delay: Duration::from_secs(2),
        }
    }
}

/// Tracks one upload status id until it reaches a terminal state.
///
/// Polls immediately, then once per `poll_interval`. Failed polls are logged
/// and polling carries on; there is no retry cap. After a terminal status the
/// poller stops, waits `dismiss_delay`, emits `TrackingFinished` and exits.
pub struct StatusPoller {
    tracker_id: TrackerId,
    status_id: String,
    client: Arc<dyn ApiClient>,
    sink: Arc<dyn EventSink>,
    timing: TimingSettings,
}

impl StatusPoller {
    pub fn new(
        tracker_id: TrackerId,
        status_id: impl Into<String>,
        client: Arc<dyn ApiClient>,
        sink: Arc<dyn EventSink>,
        timing: TimingSettings,
    ) -> Self {
        Self {
            tracker_id,
            status_id: status_id.into(),
            client,
            sink,
            timing,
        }
    }

    /// Spawns the poll loop. It ends early when `parent` or the returned
    /// handle is cancelled.
    pub fn spawn(self, parent: &CancellationToken) -> PollerHandle {
        let token = parent.child_token();
        let cancelled = token.clone();
        let tracker_id = self.tracker_id;
        let task = TimerHandle::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    client_debug!("poller tracker_id={} cancelled", tracker_id);
                }
                _ = self.run() => {}
            }
        });
        PollerHandle { token, task }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.timing.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.client.upload_status(&self.status_id).await {
                Ok(status) => {
                    let terminal = status.status.is_terminal();
                    let phase = status.status;
                    self.sink.emit(EngineEvent::UploadStatus {
                        tracker_id: self.tracker_id,
                        status,
                    });
                    if terminal {
                        client_info!(
                            "upload tracker_id={} status_id={} reached {:?}; polling stopped",
                            self.tracker_id,
                            self.status_id,
                            phase
                        );
                        break;
                    }
                }
                Err(err) => {
                    client_warn!(
                        "status poll failed tracker_id={} status_id={}: {}",
                        self.tracker_id,
                        self.status_id,
                        err
                    );
                }
            }
        }

        tokio::time::sleep(self.timing.dismiss_delay).await;
        self.sink.emit(EngineEvent::TrackingFinished {
            tracker_id: self.tracker_id,
        });
    }
}

/// Owned handle to a running poller; dropping it stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    token: CancellationToken,
    task: TimerHandle,
}

impl PollerHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
