//! The panel's own settings (`settings.json`).
//!
//! These tune the control plane itself: where the backend is, how long to
//! wait on it, how often to poll. They are unrelated to the DAV server
//! [`Config`](crate::model::Config), which the backend owns.

use crate::bootstrap::DEFAULT_BOOTSTRAP_MAX_ELAPSED;
use crate::controller::DEFAULT_RPC_TIMEOUT;
use crate::error::config::ConfigError;
use crate::{DEFAULT_BACKEND_URL, PANEL_APP_NAME};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE_NAME: &str = "settings.json";
const SETTINGS_VERSION: u32 = 1;
const MIN_POLL_INTERVAL_MS: u64 = 100;

// ============================================
// SETTINGS STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on each backend call; 0 waits forever.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapSettings {
    #[serde(default = "default_bootstrap_max_elapsed_secs")]
    pub max_elapsed_secs: u64,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            max_elapsed_secs: default_bootstrap_max_elapsed_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    #[serde(default)]
    pub bootstrap: BootstrapSettings,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            backend: BackendSettings::default(),
            polling: PollingSettings::default(),
            bootstrap: BootstrapSettings::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    SETTINGS_VERSION
}
fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_rpc_timeout_secs() -> u64 {
    DEFAULT_RPC_TIMEOUT.as_secs()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_bootstrap_max_elapsed_secs() -> u64 {
    DEFAULT_BOOTSTRAP_MAX_ELAPSED.as_secs()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl PanelSettings {
    /// `{platform config dir}/davpanel`, e.g. `~/.config/davpanel` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryNotFound`] when the platform has no config dir.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(PANEL_APP_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Load settings from {config_dir}/settings.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(PanelSettings)` if loaded successfully, or defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let settings_path = config_dir.join(SETTINGS_FILE_NAME);

        if !settings_path.exists() {
            info!(
                "Settings file not found at {}, using defaults",
                settings_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
            warn!("Failed to read settings file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: settings_path.clone(),
                source: e,
            }
        })?;

        let settings: PanelSettings = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse settings JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: settings_path.clone(),
                reason: e.to_string(),
            }
        })?;

        settings.validate()?;

        info!("Settings loaded from {}", settings_path.display());
        Ok(settings)
    }

    /// Save settings to {config_dir}/settings.json using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, the write or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let settings_path = config_dir.join(SETTINGS_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", SETTINGS_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &settings_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: settings_path.clone(),
            source: e,
        })?;

        info!("Settings saved to {}", settings_path.display());
        Ok(())
    }

    /// Validate settings values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > SETTINGS_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, SETTINGS_VERSION
                ),
            });
        }

        let url = &self.backend.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid backend URL format: {}", url),
            });
        }

        if self.polling.interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid poll interval: {}ms (minimum {}ms)",
                    self.polling.interval_ms, MIN_POLL_INTERVAL_MS
                ),
            });
        }

        Ok(())
    }

    pub fn rpc_timeout(&self) -> Option<Duration> {
        match self.backend.rpc_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    pub fn bootstrap_max_elapsed(&self) -> Duration {
        Duration::from_secs(self.bootstrap.max_elapsed_secs)
    }
}
