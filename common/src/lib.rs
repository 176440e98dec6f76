//! Shared building blocks for the DAV control panel.
//!
//! This crate holds the small value types every other crate in the
//! workspace leans on. It has no async code and no knowledge of the
//! backend; it only describes data.
//!
//! ## Architecture
//!
//! - **common** (this crate): error locations, status codes, secrets
//! - **control-core**: config store, server controller, backend RPC
//! - **davpanel**: application wiring and the terminal front end

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::secret_error::SecretError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
