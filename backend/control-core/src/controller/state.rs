use crate::error::{ServerError, ValidationError};
use crate::model::Liveness;

/// The controller's authoritative view of the DAV server.
///
/// Only [`super::ServerController`] writes it; everyone else reads snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerState {
    /// Last known truth, from a start/stop result or a poll.
    pub liveness: Liveness,

    /// A start or stop call is in flight. Poll results are ignored meanwhile.
    pub pending: bool,

    /// Most recent start/stop failure. Cleared by the next attempt or by acknowledgement.
    pub last_error: Option<ServerError>,

    /// Most recent local refusal (e.g. login without a password).
    pub last_warning: Option<ValidationError>,
}

/// What the front end should put in its single acknowledgement dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Warning(_) => "Warning",
            Notice::Error(_) => "Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(message) | Notice::Error(message) => message,
        }
    }
}

impl ServerState {
    /// The notice to show, errors taking precedence over warnings.
    pub fn notice(&self) -> Option<Notice> {
        if let Some(error) = &self.last_error {
            return Some(Notice::Error(error.user_message()));
        }

        self.last_warning
            .as_ref()
            .map(|warning| Notice::Warning(warning.user_message().to_string()))
    }
}
