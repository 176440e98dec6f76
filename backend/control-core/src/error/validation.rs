//! Local pre-flight failures.
//!
//! These never reach the backend. The panel shows them as a warning the
//! operator acknowledges; they are not faults.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Auth Validation Error: user and password must be set to enable login {location}")]
    AuthIncomplete { location: ErrorLocation },

    #[error("Cert Validation Error: either cert_path or key_path must be set {location}")]
    EmptyCertPatch { location: ErrorLocation },
}

impl ValidationError {
    #[track_caller]
    pub fn auth_incomplete() -> Self {
        ValidationError::AuthIncomplete {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn empty_cert_patch() -> Self {
        ValidationError::EmptyCertPatch {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text for the acknowledgement dialog, without the source location.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::AuthIncomplete { .. } => {
                "User and Password must be set to enable login."
            }
            ValidationError::EmptyCertPatch { .. } => {
                "Either a certificate path or a key path must be set."
            }
        }
    }
}
