use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// A secret was about to leave the process through a generic path.
#[derive(Debug, ThisError)]
pub enum SecretError {
    #[error("Secret Serialization Refused: {type_name} is only sent through as_str() {location}")]
    SerializationRefused {
        type_name: &'static str,
        location: ErrorLocation,
    },
}
