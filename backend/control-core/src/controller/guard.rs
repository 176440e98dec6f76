//! Scoped ownership of the `pending` flag.

use crate::controller::state::ServerState;

use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;
use tokio::sync::watch;

/// Held for the whole body of a start/stop call.
///
/// Acquiring flips `pending` on in one state mutation, so two callers can
/// never both succeed. Dropping flips it off, whichever way the call ends:
/// success, error, timeout or the future being dropped mid-await.
pub(crate) struct PendingGuard<'a> {
    state: &'a watch::Sender<ServerState>,
}

impl<'a> PendingGuard<'a> {
    /// `None` when another operation already holds the flag.
    ///
    /// On success the previous error is cleared and `epoch` is bumped, which
    /// invalidates any poll issued before this operation began.
    pub(crate) fn acquire(state: &'a watch::Sender<ServerState>, epoch: &AtomicU64) -> Option<Self> {
        let acquired = state.send_if_modified(|s| {
            if s.pending {
                return false;
            }

            s.pending = true;
            s.last_error = None;
            epoch.fetch_add(1, Ordering::SeqCst);
            true
        });

        if acquired {
            trace!("Pending flag acquired");
        }

        // A refused acquire must not build a guard: its Drop clears the holder's flag.
        acquired.then(|| Self { state })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.pending = false);
        trace!("Pending flag released");
    }
}
