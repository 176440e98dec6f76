use crate::error::PanelError;

use control_core::bootstrap::load_initial_config;
use control_core::config::PanelSettings;
use control_core::controller::{Notice, ServerController};
use control_core::rpc::BackendRpc;
use control_core::rpc::http::HttpBackend;
use control_core::store::ConfigStore;

use std::sync::Arc;

use log::{debug, info};

/// Everything a command needs: settings, the configuration draft and the
/// server controller, all talking to one backend.
pub struct AppState<R: BackendRpc> {
    settings: PanelSettings,
    store: ConfigStore,
    controller: ServerController<R>,
}

impl AppState<HttpBackend> {
    /// Wire the panel to the HTTP backend named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Core`] if the backend URL cannot be parsed or the
    /// HTTP client cannot be built.
    pub fn connect(settings: PanelSettings) -> Result<Self, PanelError> {
        let backend = HttpBackend::new(&settings.backend.base_url)?;
        info!("Using backend at {}", backend.base_url());
        Ok(Self::with_backend(settings, Arc::new(backend)))
    }
}

impl<R: BackendRpc> AppState<R> {
    pub fn with_backend(settings: PanelSettings, rpc: Arc<R>) -> Self {
        let controller = ServerController::with_rpc_timeout(rpc, settings.rpc_timeout());
        Self {
            settings,
            store: ConfigStore::new(),
            controller,
        }
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn controller(&self) -> &ServerController<R> {
        &self.controller
    }

    /// Seed the draft from the backend, waiting for it if it is still starting.
    pub async fn load_config(&self) -> Result<(), PanelError> {
        load_initial_config(
            self.controller.rpc().as_ref(),
            &self.store,
            self.settings.bootstrap_max_elapsed(),
        )
        .await?;
        debug!("Draft seeded from backend");
        Ok(())
    }

    /// Take the pending notice, acknowledging it.
    pub fn take_notice(&self) -> Option<Notice> {
        let notice = self.controller.state().notice();
        if notice.is_some() {
            self.controller.acknowledge();
        }
        notice
    }

    /// `Err` carrying the pending notice, if there is one.
    pub fn notice_as_error(&self) -> Result<(), PanelError> {
        match self.take_notice() {
            Some(notice) => Err(notice.into()),
            None => Ok(()),
        }
    }
}
