//! Values exchanged with the backend and held by the store.

pub mod cert;
pub mod config;
pub mod liveness;

pub use cert::CertConfig;
pub use config::{Config, Credentials};
pub use liveness::Liveness;
