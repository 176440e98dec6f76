//! The backend command channel.
//!
//! The DAV server lives in another process. Everything the panel does to it
//! goes through [`BackendRpc`]: six asynchronous request/response calls whose
//! transport is not this crate's concern. [`HttpBackend`] is the adapter the
//! panel ships with; tests substitute in-memory fakes.

pub mod http;

pub use http::HttpBackend;

use crate::error::RpcError;
use crate::model::{CertConfig, Config, Liveness};

use std::fmt;
use std::future::Future;

use serde::Serialize;

/// Names of the backend calls, as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcCall {
    GetConfig,
    UpdateConfig,
    ImportTlsOrCertFromPath,
    StartServer,
    StopServer,
    CheckServerStatus,
}

impl RpcCall {
    pub const fn as_str(self) -> &'static str {
        match self {
            RpcCall::GetConfig => "get_config",
            RpcCall::UpdateConfig => "update_config",
            RpcCall::ImportTlsOrCertFromPath => "import_tls_or_cert_from_path",
            RpcCall::StartServer => "start_server",
            RpcCall::StopServer => "stop_server",
            RpcCall::CheckServerStatus => "check_server_status",
        }
    }
}

impl fmt::Display for RpcCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asynchronous calls into the out-of-process DAV server.
///
/// Futures are `Send` so the poll loop can run on a spawned task.
pub trait BackendRpc: Send + Sync + 'static {
    /// Current configuration held by the backend. Called once at startup.
    fn get_config(&self) -> impl Future<Output = Result<Config, RpcError>> + Send;

    /// Replace the backend's configuration. Sent right before `start_server`.
    fn update_config(&self, config: &Config)
    -> impl Future<Output = Result<(), RpcError>> + Send;

    /// Import TLS certificate and/or key from files on disk.
    fn import_tls_or_cert_from_path(
        &self,
        cert: &CertConfig,
    ) -> impl Future<Output = Result<(), RpcError>> + Send;

    /// Start serving with the last pushed configuration.
    fn start_server(&self) -> impl Future<Output = Result<(), RpcError>> + Send;

    /// Stop serving. Idempotent from the caller's side.
    fn stop_server(&self) -> impl Future<Output = Result<(), RpcError>> + Send;

    fn check_server_status(&self) -> impl Future<Output = Result<Liveness, RpcError>> + Send;
}
