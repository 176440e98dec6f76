//! Start/stop orchestration and status reconciliation.
//!
//! # Architecture
//!
//! [`ServerController`] is the only writer of [`ServerState`]. It mediates
//! between operator intent, the backend and the status poll:
//! - start/stop hold a [`PendingGuard`](guard::PendingGuard) for their whole
//!   body; a second request while one is in flight is a no-op
//! - poll results are written only when no operation is pending and no
//!   operation began since the poll was issued
//! - failures become state (`last_error`) instead of propagating as faults
//!
//! Every backend call is bounded by the controller's timeout, so a hung
//! backend cannot keep `pending` set forever.

pub(crate) mod guard;
pub mod poller;
pub mod state;

pub use poller::PollerHandle;
pub use state::{Notice, ServerState};

use crate::error::{CoreError, RpcError, ServerError, ValidationError};
use crate::model::{CertConfig, Config, Liveness};
use crate::rpc::{BackendRpc, RpcCall};

use guard::PendingGuard;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use tokio::sync::watch;
use tokio::time::timeout;

pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

struct Inner<R> {
    rpc: Arc<R>,
    state: watch::Sender<ServerState>,
    /// Bumped whenever a start/stop begins.
    epoch: AtomicU64,
    rpc_timeout: Option<Duration>,
}

/// Mediates between operator intent, the backend and the status poll.
///
/// This type is `Clone`; all clones share the same state.
pub struct ServerController<R: BackendRpc> {
    inner: Arc<Inner<R>>,
}

impl<R: BackendRpc> Clone for ServerController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: BackendRpc> ServerController<R> {
    /// Controller with the default 30 second bound on backend calls.
    pub fn new(rpc: Arc<R>) -> Self {
        Self::with_rpc_timeout(rpc, Some(DEFAULT_RPC_TIMEOUT))
    }

    /// `None` waits on the backend forever.
    pub fn with_rpc_timeout(rpc: Arc<R>, rpc_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Inner {
                rpc,
                state: watch::Sender::new(ServerState::default()),
                epoch: AtomicU64::new(0),
                rpc_timeout,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ServerState {
        self.inner.state.borrow().clone()
    }

    /// Change notification for the state.
    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.inner.state.subscribe()
    }

    pub fn rpc(&self) -> &Arc<R> {
        &self.inner.rpc
    }

    /// Push `config` to the backend and start the server.
    ///
    /// Ignored (returns `Ok`) while another start/stop is in flight.
    ///
    /// # Errors
    ///
    /// Returns the [`ServerError`] of whichever call failed. It is also stored
    /// in `last_error`, and `liveness` is left as it was.
    pub async fn start(&self, config: Config) -> Result<(), ServerError> {
        let Some(_pending) = PendingGuard::acquire(&self.inner.state, &self.inner.epoch) else {
            debug!("Start ignored: another operation is in flight");
            return Ok(());
        };

        info!("Starting DAV server on {}", config.display_address());

        let result = self.push_and_start(&config).await;
        self.settle(result, Liveness::Running)
    }

    /// Stop the server.
    ///
    /// Ignored (returns `Ok`) while another start/stop is in flight.
    ///
    /// # Errors
    ///
    /// Returns the [`ServerError`] of the failed call, also stored in `last_error`.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let Some(_pending) = PendingGuard::acquire(&self.inner.state, &self.inner.epoch) else {
            debug!("Stop ignored: another operation is in flight");
            return Ok(());
        };

        info!("Stopping DAV server");

        let result = self
            .call(RpcCall::StopServer, self.inner.rpc.stop_server())
            .await;
        self.settle(result, Liveness::Stopped)
    }

    /// One reconciliation step of the poll loop.
    ///
    /// Does nothing while an operation is pending. Failures are logged, never
    /// surfaced; the next poll corrects the state.
    pub async fn poll_once(&self) {
        let issued_at = {
            let state = self.inner.state.borrow();
            if state.pending {
                trace!("Poll skipped: operation in flight");
                return;
            }
            self.inner.epoch.load(Ordering::SeqCst)
        };

        let reported = match self
            .call(
                RpcCall::CheckServerStatus,
                self.inner.rpc.check_server_status(),
            )
            .await
        {
            Ok(liveness) => liveness,
            Err(e) => {
                warn!("Status poll failed: {e}");
                return;
            }
        };

        self.inner.state.send_if_modified(|state| {
            if state.pending || self.inner.epoch.load(Ordering::SeqCst) != issued_at {
                debug!("Discarding poll result '{reported}': an operation started meanwhile");
                return false;
            }

            if state.liveness == reported {
                return false;
            }

            info!("Server liveness {} -> {reported} (poll)", state.liveness);
            state.liveness = reported;
            true
        });
    }

    /// Send TLS paths to the backend.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] when neither path is set; nothing is sent.
    /// - [`CoreError::Server`] when the backend rejects the import.
    ///
    /// Both are also queued on the state for the front end.
    pub async fn import_cert(&self, cert: CertConfig) -> Result<(), CoreError> {
        if cert.is_empty() {
            let refusal = ValidationError::empty_cert_patch();
            self.warn(refusal.clone());
            return Err(refusal.into());
        }

        info!("Importing TLS material: {cert:?}");

        self.inner.state.send_if_modified(|state| state.last_error.take().is_some());

        self.call(
            RpcCall::ImportTlsOrCertFromPath,
            self.inner.rpc.import_tls_or_cert_from_path(&cert),
        )
        .await
        .map_err(|e| {
            error!("TLS import failed: {e}");
            self.inner
                .state
                .send_modify(|state| state.last_error = Some(e.clone()));
            CoreError::from(e)
        })
    }

    /// Queue a local refusal for the front end to show.
    pub fn warn(&self, warning: ValidationError) {
        self.inner
            .state
            .send_modify(|state| state.last_warning = Some(warning));
    }

    /// The operator dismissed the dialog: clear the queued error and warning.
    pub fn acknowledge(&self) {
        self.inner.state.send_if_modified(|state| {
            let had_notice = state.last_error.is_some() || state.last_warning.is_some();
            state.last_error = None;
            state.last_warning = None;
            had_notice
        });
    }

    /// Run [`poll_once`](Self::poll_once) every `period` on a spawned task.
    pub fn spawn_poller(&self, period: Duration) -> PollerHandle {
        PollerHandle::spawn(self.clone(), period)
    }

    async fn push_and_start(&self, config: &Config) -> Result<(), ServerError> {
        self.call(RpcCall::UpdateConfig, self.inner.rpc.update_config(config))
            .await?;
        debug!("Configuration pushed to backend");

        self.call(RpcCall::StartServer, self.inner.rpc.start_server())
            .await
    }

    /// Record the outcome of a start/stop; the pending guard is still held here.
    fn settle(
        &self,
        result: Result<(), ServerError>,
        on_success: Liveness,
    ) -> Result<(), ServerError> {
        match result {
            Ok(()) => {
                info!("DAV server {on_success}");
                self.inner
                    .state
                    .send_modify(|state| state.liveness = on_success);
                Ok(())
            }
            Err(e) => {
                error!("Server operation failed: {e}");
                self.inner
                    .state
                    .send_modify(|state| state.last_error = Some(e.clone()));
                Err(e)
            }
        }
    }

    async fn call<T, F>(&self, call: RpcCall, request: F) -> Result<T, ServerError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        let result = match self.inner.rpc_timeout {
            Some(limit) => match timeout(limit, request).await {
                Ok(result) => result,
                Err(_) => return Err(ServerError::timeout(call, limit)),
            },
            None => request.await,
        };

        result.map_err(|e| ServerError::from_rpc(call, e))
    }
}
