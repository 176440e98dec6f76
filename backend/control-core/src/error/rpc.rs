//! Transport-level failures of the backend channel.
//!
//! - HTTP status codes stored directly (not parsed from strings)
//! - `is_transient()` uses status codes and reqwest flags, not message content
//! - `#[track_caller]` for automatic location capture

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RpcError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Backend Error: HTTP {status_code} - {message} {location}")]
    Backend {
        status_code: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl RpcError {
    #[track_caller]
    pub fn backend(status_code: impl Into<HttpStatusCode>, message: impl Into<String>) -> Self {
        RpcError::Backend {
            status_code: status_code.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The call produced no answer within `after`; counts as transient.
    #[track_caller]
    pub fn timed_out(call: impl std::fmt::Display, after: Duration) -> Self {
        RpcError::Http {
            message: format!("{call} did not answer within {}ms", after.as_millis()),
            is_timeout: true,
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Worth retrying: connection refused, timeouts, gateway errors, throttling.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Http {
                is_timeout,
                is_connection,
                ..
            } => *is_timeout || *is_connection,
            RpcError::Backend { status_code, .. } => status_code.is_transient(),
            RpcError::Json { .. } => false,
            RpcError::UrlParse { .. } => false,
        }
    }

    /// The message the backend (or transport) gave, without location noise.
    pub fn backend_message(&self) -> &str {
        match self {
            RpcError::Http { message, .. }
            | RpcError::Backend { message, .. }
            | RpcError::Json { message, .. }
            | RpcError::UrlParse { message, .. } => message,
        }
    }

    /// Where the failure was raised.
    pub fn location(&self) -> ErrorLocation {
        match self {
            RpcError::Http { location, .. }
            | RpcError::Backend { location, .. }
            | RpcError::Json { location, .. }
            | RpcError::UrlParse { location, .. } => *location,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            RpcError::Backend { status_code, .. } => Some(status_code.0),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RpcError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        // Status errors only come from error_for_status(), which the adapter
        // does not use, so everything here is transport-level.
        RpcError::Http {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for RpcError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RpcError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for RpcError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        RpcError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
