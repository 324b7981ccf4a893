//! Fixed-cadence polling of the latest reading.
//!
//! Every tick spawns an independent fetch, so a slow response may overlap the
//! next tick. Results are published in arrival order. Failures never change the
//! cadence.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::client::ReadingSource;
use crate::view::ViewState;

pub struct Poller {
    source: Arc<dyn ReadingSource>,
    interval: Duration,
}

impl Poller {
    pub fn new(source: Arc<dyn ReadingSource>, interval: Duration) -> Self {
        Self { source, interval }
    }

    /// Publishes `Loading`, fetches immediately, then once per interval until stopped.
    pub fn start(self) -> PollerHandle {
        let (state_tx, state_rx) = watch::channel(ViewState::Loading);
        let state_tx = Arc::new(state_tx);
        let cancel = CancellationToken::new();
        let fetches = TaskTracker::new();

        let loop_cancel = cancel.clone();
        let loop_fetches = fetches.clone();
        let Poller { source, interval } = self;
        let task = tokio::spawn(async move {
            info!("Polling latest reading every {}ms", interval.as_millis());
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = loop_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        spawn_fetch(&loop_fetches, source.clone(), state_tx.clone(), loop_cancel.clone());
                    }
                }
            }
            info!("Polling stopped");
        });

        PollerHandle {
            cancel,
            task,
            fetches,
            state: state_rx,
        }
    }
}

fn spawn_fetch(
    fetches: &TaskTracker,
    source: Arc<dyn ReadingSource>,
    state_tx: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
) {
    fetches.spawn(async move {
        // A fetch that has not started when the view is torn down never sends its request.
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            outcome = source.fetch_latest() => outcome,
        };

        match &outcome {
            Ok(Some(_)) => debug!("Fetched latest reading"),
            Ok(None) => debug!("No reading stored yet"),
            Err(e) => warn!("Failed to fetch latest reading: {e}"),
        }

        if !cancel.is_cancelled() {
            state_tx.send_replace(ViewState::from_outcome(outcome));
        }
    });
}

/// Running poller. Dropping the handle does not stop polling; call [`PollerHandle::stop`].
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    fetches: TaskTracker,
    state: watch::Receiver<ViewState>,
}

impl PollerHandle {
    /// Receiver that observes every state transition.
    pub fn state(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Cancels the schedule and waits for the loop and every spawned fetch to
    /// finish. Once this returns no request is issued and no state is published.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!("Polling task ended abnormally: {e}");
        }
        self.fetches.close();
        self.fetches.wait().await;
    }
}
