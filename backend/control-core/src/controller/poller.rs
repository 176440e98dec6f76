//! The status polling loop as a cancellable task.

use crate::controller::ServerController;
use crate::rpc::BackendRpc;

use std::time::Duration;

use log::{debug, info};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running poll loop.
///
/// The loop runs until [`PollerHandle::shutdown`] is awaited or the handle is
/// dropped, which aborts the task. Polling does not pause while an operation
/// is pending; [`ServerController::poll_once`] just discards its result.
pub struct PollerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub(crate) fn spawn<R: BackendRpc>(controller: ServerController<R>, period: Duration) -> Self {
        let period = period.max(MIN_POLL_INTERVAL);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            info!("Status poller started, every {}ms", period.as_millis());

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => controller.poll_once().await,
                }
            }

            info!("Status poller stopped");
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Stop the loop and wait for it to finish its current poll.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("Status poller ended abnormally: {e}");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
