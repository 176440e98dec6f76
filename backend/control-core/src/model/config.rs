//! The editable DAV server configuration.

use crate::error::ValidationError;

use common::RedactedSecret;

use log::warn;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const HTTP_DEFAULT_PORT: u16 = 80;
const HTTPS_DEFAULT_PORT: u16 = 443;
const ANY_ADDRESS: &str = "*";

/// Login pair for the DAV server.
///
/// Both members are non-empty; [`Credentials::new`] is the only way in and
/// deserialization goes through it too. On the wire it is `[user, password]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: RedactedSecret,
}

impl Credentials {
    #[track_caller]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<RedactedSecret>,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::auth_incomplete());
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &RedactedSecret {
        &self.password
    }
}

impl Serialize for Credentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.username.as_str(), self.password.as_str()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Credentials {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (username, password) = <(String, String)>::deserialize(deserializer)?;
        Credentials::new(username, password).map_err(|e| D::Error::custom(e.user_message()))
    }
}

/// Loads `auth` leniently: an incomplete pair from the backend disables login
/// instead of failing the whole config.
fn auth_or_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Credentials>, D::Error> {
    let Some((username, password)) = Option::<(String, String)>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match Credentials::new(username, password) {
        Ok(credentials) => Ok(Some(credentials)),
        Err(e) => {
            warn!("Ignoring stored login, {}", e.user_message());
            Ok(None)
        }
    }
}

/// DAV server configuration as edited in the panel.
///
/// Every field is optional; the backend decides what an absent field means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Bind address; absent or empty means any address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Directory served, picked with the directory picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Present iff login is enabled.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "auth_or_none"
    )]
    pub auth: Option<Credentials>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
}

impl Config {
    pub fn tls_enabled(&self) -> bool {
        self.enable_tls.unwrap_or(false)
    }

    /// Port the backend binds: the configured one, else 443 with TLS, else 80.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(if self.tls_enabled() {
            HTTPS_DEFAULT_PORT
        } else {
            HTTP_DEFAULT_PORT
        })
    }

    /// `ip:port` for status output, `*` standing in for any address.
    pub fn display_address(&self) -> String {
        let ip = match self.ip.as_deref() {
            Some(ip) if !ip.is_empty() => ip,
            _ => ANY_ADDRESS,
        };
        format!("{ip}:{}", self.effective_port())
    }
}
