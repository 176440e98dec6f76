//! The configuration draft and its single mutation point.
//!
//! # Architecture
//!
//! [`ConfigStore`] owns the [`Config`] being edited and the TLS path draft.
//! It is an explicit object handed to whoever needs it, not a global:
//! - every mutation is a [`ConfigCommand`] applied by [`ConfigStore::apply`]
//! - each command is applied under the channel's write lock, so two patches
//!   never interleave
//! - readers take cheap snapshots or subscribe for change notification
//!
//! The store performs no I/O. Loading from the backend happens in
//! [`crate::bootstrap`], pushing happens in the controller at start time.

use crate::error::ValidationError;
use crate::model::{CertConfig, Config, Credentials};
use crate::picker::DirectoryPicker;

use std::fmt;
use std::mem::take;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;

const ROOT_PICKER_TITLE: &str = "Select Dav directory";

/// A whole-config update: either a replacement or a pure function of the old value.
pub enum ConfigPatch {
    Replace(Config),
    Apply(Box<dyn FnOnce(Config) -> Config + Send>),
}

impl ConfigPatch {
    pub fn apply_fn<F>(f: F) -> Self
    where
        F: FnOnce(Config) -> Config + Send + 'static,
    {
        ConfigPatch::Apply(Box::new(f))
    }

    fn resolve(self, old: Config) -> Config {
        match self {
            ConfigPatch::Replace(config) => config,
            ConfigPatch::Apply(f) => f(old),
        }
    }
}

impl From<Config> for ConfigPatch {
    fn from(config: Config) -> Self {
        ConfigPatch::Replace(config)
    }
}

impl fmt::Debug for ConfigPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigPatch::Replace(config) => f.debug_tuple("Replace").field(config).finish(),
            ConfigPatch::Apply(_) => f.write_str("Apply(<fn>)"),
        }
    }
}

/// Commands that mutate the draft.
#[derive(Debug)]
pub enum ConfigCommand {
    /// Replace the config, or rewrite it with a function.
    SetConfig(ConfigPatch),

    /// Turn login on with the given pair, or off.
    SetAuth {
        enabled: bool,
        username: String,
        password: String,
    },

    /// Merge TLS paths into the cert draft.
    SetCertPath(CertConfig),

    /// Set the served directory.
    SetRoot(String),
}

/// Single source of truth for the configuration draft.
///
/// This type is `Clone`; all clones share the same draft.
#[derive(Clone)]
pub struct ConfigStore {
    config: Arc<watch::Sender<Config>>,
    cert: Arc<watch::Sender<CertConfig>>,
}

impl ConfigStore {
    /// Empty draft, as at process start before the backend answered.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(watch::Sender::new(config)),
            cert: Arc::new(watch::Sender::new(CertConfig::default())),
        }
    }

    /// Snapshot of the current draft.
    pub fn get_config(&self) -> Config {
        self.config.borrow().clone()
    }

    /// Snapshot of the TLS path draft.
    pub fn cert_config(&self) -> CertConfig {
        self.cert.borrow().clone()
    }

    /// Change notification for the draft. The receiver sees the latest value.
    pub fn subscribe(&self) -> watch::Receiver<Config> {
        self.config.subscribe()
    }

    pub fn subscribe_cert(&self) -> watch::Receiver<CertConfig> {
        self.cert.subscribe()
    }

    /// Apply one mutation.
    ///
    /// Functions inside a [`ConfigPatch::Apply`] run under the store's write
    /// lock and must not call back into the store.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the command is refused; the draft is
    /// left untouched in that case.
    #[track_caller]
    pub fn apply(&self, cmd: ConfigCommand) -> Result<(), ValidationError> {
        match cmd {
            ConfigCommand::SetConfig(patch) => {
                debug!("Applying config patch: {patch:?}");
                self.config.send_modify(|config| {
                    let old = take(config);
                    *config = patch.resolve(old);
                });
            }
            ConfigCommand::SetAuth {
                enabled: true,
                username,
                password,
            } => {
                let credentials = Credentials::new(username, password).inspect_err(|_| {
                    warn!("User and password must be set to enable login");
                })?;

                info!("Login enabled for user '{}'", credentials.username());
                self.config
                    .send_modify(|config| config.auth = Some(credentials));
            }
            ConfigCommand::SetAuth { enabled: false, .. } => {
                info!("Login disabled");
                self.config.send_modify(|config| config.auth = None);
            }
            ConfigCommand::SetCertPath(patch) => {
                if patch.is_empty() {
                    warn!("Rejected empty TLS path update");
                    return Err(ValidationError::empty_cert_patch());
                }

                debug!("Merging TLS paths: {patch:?}");
                self.cert.send_modify(|cert| cert.merge(patch));
            }
            ConfigCommand::SetRoot(root) => {
                info!("Serving directory set to {root}");
                self.config.send_modify(|config| config.root = Some(root));
            }
        }

        Ok(())
    }

    /// Replace the draft or rewrite it with a function of the old value.
    pub fn set_config(&self, patch: impl Into<ConfigPatch>) {
        // SetConfig is never refused.
        let _ = self.apply(ConfigCommand::SetConfig(patch.into()));
    }

    /// Rewrite the draft with `f`; shorthand for `set_config(ConfigPatch::apply_fn(f))`.
    pub fn update_config<F>(&self, f: F)
    where
        F: FnOnce(Config) -> Config + Send + 'static,
    {
        self.set_config(ConfigPatch::apply_fn(f));
    }

    /// Enable login with `username`/`password`, or disable it.
    ///
    /// # Errors
    ///
    /// [`ValidationError::AuthIncomplete`] when enabling with an empty member;
    /// `auth` keeps its previous value.
    #[track_caller]
    pub fn set_auth(
        &self,
        enabled: bool,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.apply(ConfigCommand::SetAuth {
            enabled,
            username: username.into(),
            password: password.into(),
        })
    }

    /// Merge only the provided TLS paths, keeping the others.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyCertPatch`] when neither path is set.
    #[track_caller]
    pub fn set_cert_path(&self, patch: CertConfig) -> Result<(), ValidationError> {
        self.apply(ConfigCommand::SetCertPath(patch))
    }

    /// Ask `picker` for the served directory.
    ///
    /// Returns `true` when `root` changed; a cancelled prompt leaves it as is.
    pub async fn choose_root(&self, picker: &impl DirectoryPicker) -> bool {
        match picker.pick_directory(ROOT_PICKER_TITLE).await {
            Some(path) => {
                let root = path.to_string_lossy().into_owned();
                // SetRoot is never refused.
                let _ = self.apply(ConfigCommand::SetRoot(root));
                true
            }
            None => {
                debug!("Directory selection cancelled, root unchanged");
                false
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
