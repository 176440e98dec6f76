//! Test helpers for control-core integration tests.
//!
//! - `FakeBackend`: in-memory `BackendRpc` that records calls, can be told
//!   to reject a call, and can hold a call open behind a `Gate`
//! - `FakePicker`: directory picker with a canned answer

use control_core::error::RpcError;
use control_core::model::{CertConfig, Config, Liveness};
use control_core::picker::DirectoryPicker;
use control_core::rpc::{BackendRpc, RpcCall};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

/// Holds a backend call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until the gated call has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call finish.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<RpcCall>>,
    pushed_configs: Mutex<Vec<Config>>,
    imported_certs: Mutex<Vec<CertConfig>>,
    stored_config: Mutex<Config>,
    status: Mutex<Liveness>,
    rejections: Mutex<HashMap<RpcCall, (u16, String)>>,
    gates: Mutex<HashMap<RpcCall, Arc<Gate>>>,
    transient_get_config_failures: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_config(config: Config) -> Arc<Self> {
        let backend = Self::default();
        *backend.stored_config.lock().unwrap() = config;
        Arc::new(backend)
    }

    /// Make `call` fail with a 500 carrying `message`.
    pub fn reject(&self, call: RpcCall, message: &str) {
        self.reject_with_status(call, 500, message);
    }

    pub fn reject_with_status(&self, call: RpcCall, status: u16, message: &str) {
        self.rejections
            .lock()
            .unwrap()
            .insert(call, (status, message.to_string()));
    }

    /// Hold `call` open until the returned gate is released.
    pub fn gate(&self, call: RpcCall) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates.lock().unwrap().insert(call, Arc::clone(&gate));
        gate
    }

    /// The next `count` get_config calls answer 503.
    pub fn fail_get_config_transiently(&self, count: usize) {
        self.transient_get_config_failures
            .store(count, Ordering::SeqCst);
    }

    pub fn set_status(&self, liveness: Liveness) {
        *self.status.lock().unwrap() = liveness;
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: RpcCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn pushed_configs(&self) -> Vec<Config> {
        self.pushed_configs.lock().unwrap().clone()
    }

    pub fn imported_certs(&self) -> Vec<CertConfig> {
        self.imported_certs.lock().unwrap().clone()
    }

    async fn enter(&self, call: RpcCall) -> Result<(), RpcError> {
        self.calls.lock().unwrap().push(call);

        let gate = self.gates.lock().unwrap().get(&call).cloned();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let rejection = self.rejections.lock().unwrap().get(&call).cloned();
        match rejection {
            Some((status, message)) => Err(RpcError::backend(status, message)),
            None => Ok(()),
        }
    }
}

impl BackendRpc for FakeBackend {
    async fn get_config(&self) -> Result<Config, RpcError> {
        self.enter(RpcCall::GetConfig).await?;

        let remaining = self.transient_get_config_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_get_config_failures
                .store(remaining - 1, Ordering::SeqCst);
            return Err(RpcError::backend(503, "backend starting"));
        }

        Ok(self.stored_config.lock().unwrap().clone())
    }

    async fn update_config(&self, config: &Config) -> Result<(), RpcError> {
        self.enter(RpcCall::UpdateConfig).await?;
        self.pushed_configs.lock().unwrap().push(config.clone());
        Ok(())
    }

    async fn import_tls_or_cert_from_path(&self, cert: &CertConfig) -> Result<(), RpcError> {
        self.enter(RpcCall::ImportTlsOrCertFromPath).await?;
        self.imported_certs.lock().unwrap().push(cert.clone());
        Ok(())
    }

    async fn start_server(&self) -> Result<(), RpcError> {
        self.enter(RpcCall::StartServer).await?;
        self.set_status(Liveness::Running);
        Ok(())
    }

    async fn stop_server(&self) -> Result<(), RpcError> {
        self.enter(RpcCall::StopServer).await?;
        self.set_status(Liveness::Stopped);
        Ok(())
    }

    async fn check_server_status(&self) -> Result<Liveness, RpcError> {
        self.enter(RpcCall::CheckServerStatus).await?;
        Ok(*self.status.lock().unwrap())
    }
}

pub struct FakePicker(pub Option<PathBuf>);

impl DirectoryPicker for FakePicker {
    async fn pick_directory(&self, _title: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}

pub fn sample_config() -> Config {
    Config {
        ip: Some(String::from("0.0.0.0")),
        port: Some(80),
        ..Default::default()
    }
}
