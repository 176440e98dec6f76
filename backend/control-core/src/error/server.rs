//! Failures of backend calls made on the operator's behalf.
//!
//! A `ServerError` is stored in `ServerState::last_error` for the panel to
//! render, so it is `Clone` and keeps the backend's own message verbatim.

use crate::error::rpc::RpcError;
use crate::rpc::RpcCall;

use common::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ServerError {
    #[error("Backend Error: {call} failed: {message} {location}")]
    Rejected {
        call: RpcCall,
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {call} did not answer within {timeout_ms}ms {location}")]
    Timeout {
        call: RpcCall,
        timeout_ms: u128,
        location: ErrorLocation,
    },
}

impl ServerError {
    #[track_caller]
    pub fn rejected(call: RpcCall, message: impl Into<String>) -> Self {
        ServerError::Rejected {
            call,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(call: RpcCall, after: Duration) -> Self {
        ServerError::Timeout {
            call,
            timeout_ms: after.as_millis(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Wrap a transport error, keeping the backend's message when there is one.
    ///
    /// The location stays the one the transport error was raised at.
    pub fn from_rpc(call: RpcCall, error: RpcError) -> Self {
        ServerError::Rejected {
            call,
            message: error.backend_message().to_string(),
            location: error.location(),
        }
    }

    pub fn call(&self) -> RpcCall {
        match self {
            ServerError::Rejected { call, .. } | ServerError::Timeout { call, .. } => *call,
        }
    }

    /// Text for the acknowledgement dialog, without the source location.
    pub fn user_message(&self) -> String {
        match self {
            ServerError::Rejected { message, .. } => message.clone(),
            ServerError::Timeout {
                call, timeout_ms, ..
            } => format!("{call} did not answer within {timeout_ms}ms"),
        }
    }
}
