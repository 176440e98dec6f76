//! Command handlers.
//!
//! Each handler returns a serializable report; `main` prints it as text or
//! JSON. Notices (the front end's acknowledgement dialog) come back as
//! [`PanelError::Notice`](crate::error::PanelError::Notice).

pub mod config;
pub mod server;
pub mod settings;

use control_core::model::{CertConfig, Config, Liveness};

use std::fmt;

use serde::Serialize;

/// Liveness and bind address of the DAV server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub liveness: Liveness,
    pub address: String,
}

impl StatusReport {
    pub fn new(liveness: Liveness, config: &Config) -> Self {
        Self {
            liveness,
            address: config.display_address(),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DAV server {} ({})", self.liveness, self.address)
    }
}

/// The draft as shown to the operator. The password never appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub address: String,
    pub root: Option<String>,
    pub login: Option<String>,
    pub tls: bool,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

impl ConfigReport {
    pub fn new(config: &Config, cert: &CertConfig) -> Self {
        Self {
            address: config.display_address(),
            root: config.root.clone(),
            login: config.auth.as_ref().map(|c| c.username().to_string()),
            tls: config.tls_enabled(),
            cert_path: cert.cert_path.clone(),
            key_path: cert.key_path.clone(),
        }
    }
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "address: {}", self.address)?;
        writeln!(f, "root:    {}", self.root.as_deref().unwrap_or("-"))?;
        writeln!(f, "login:   {}", self.login.as_deref().unwrap_or("disabled"))?;
        write!(f, "tls:     {}", if self.tls { "on" } else { "off" })?;
        if let Some(cert) = &self.cert_path {
            write!(f, "\ncert:    {cert}")?;
        }
        if let Some(key) = &self.key_path {
            write!(f, "\nkey:     {key}")?;
        }
        Ok(())
    }
}
