//! Startup: seed the config store from the backend.

use crate::error::RpcError;
use crate::rpc::{BackendRpc, RpcCall};
use crate::store::ConfigStore;

use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, error, info, warn};
use tokio::time::{Instant, sleep, timeout};

pub const DEFAULT_BOOTSTRAP_MAX_ELAPSED: Duration = Duration::from_secs(10);

/// Shortest time a single attempt is given, even when the deadline is closer.
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

/// Fetch the backend's configuration once and feed it into `store`.
///
/// The backend may still be coming up when the panel starts, so transient
/// failures (connection refused, timeouts, 429/502/503/504) are retried with
/// exponential backoff for up to `max_elapsed`. Each attempt is bounded by
/// what is left of `max_elapsed`, so a backend that accepts the connection
/// and never answers still ends in an error.
///
/// # Errors
///
/// Returns the last [`RpcError`] when the backend cannot be reached in time
/// or answers with a permanent failure. The store is left untouched.
pub async fn load_initial_config<R: BackendRpc>(
    rpc: &R,
    store: &ConfigStore,
    max_elapsed: Duration,
) -> Result<(), RpcError> {
    let deadline = Instant::now() + max_elapsed;
    let mut backoff = ExponentialBackoff {
        max_elapsed_time: Some(max_elapsed),
        ..Default::default()
    };

    loop {
        let limit = deadline
            .saturating_duration_since(Instant::now())
            .max(MIN_ATTEMPT_TIMEOUT);

        let attempt = match timeout(limit, rpc.get_config()).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::timed_out(RpcCall::GetConfig, limit)),
        };

        match attempt {
            Ok(config) => {
                info!("Loaded configuration from backend: {config:?}");
                store.set_config(config);
                return Ok(());
            }
            Err(e) if e.is_transient() => match backoff.next_backoff() {
                Some(delay) => {
                    debug!("Backend not ready ({e}), retrying after {delay:?}");
                    sleep(delay).await;
                }
                None => {
                    error!("Backend unreachable after {max_elapsed:?}: {e}");
                    return Err(e);
                }
            },
            Err(e) => {
                warn!("Failed to load configuration from backend: {e}");
                return Err(e);
            }
        }
    }
}
