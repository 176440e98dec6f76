use control_core::controller::Notice;
use control_core::error::{ConfigError, CoreError, RpcError};

use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors that end a panel command.
///
/// With `--json` these are printed as tagged JSON, so the structure and the
/// location travel with them.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PanelError {
    /// Error from the panel itself (logging, terminal, runtime)
    #[error("Panel Error: {message} {location}")]
    Panel {
        message: String,
        location: ErrorLocation,
    },

    /// Error from control-core (backend unreachable, bad reply)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// The panel's settings file could not be used
    #[error("Settings Error: {message} {location}")]
    Settings {
        message: String,
        location: ErrorLocation,
    },

    /// A warning or error the operator has to acknowledge
    #[error("{title}: {message}")]
    Notice { title: String, message: String },
}

impl From<Notice> for PanelError {
    fn from(notice: Notice) -> Self {
        PanelError::Notice {
            title: notice.title().to_string(),
            message: notice.message().to_string(),
        }
    }
}

impl From<ConfigError> for PanelError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        PanelError::Settings {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<RpcError> for PanelError {
    #[track_caller]
    fn from(error: RpcError) -> Self {
        PanelError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for PanelError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Config(e) => PanelError::from(e),
            other => PanelError::Core {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}
