use serde::{Deserialize, Serialize};

/// TLS material paths, each settable on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
}

impl CertConfig {
    pub fn new(cert_path: Option<String>, key_path: Option<String>) -> Self {
        Self {
            cert_path,
            key_path,
        }
    }

    /// Neither path set; such a patch is never sent anywhere.
    pub fn is_empty(&self) -> bool {
        self.cert_path.is_none() && self.key_path.is_none()
    }

    /// Field-level union: fields set in `patch` win, the rest are kept.
    pub fn merge(&mut self, patch: CertConfig) {
        if let Some(cert_path) = patch.cert_path {
            self.cert_path = Some(cert_path);
        }
        if let Some(key_path) = patch.key_path {
            self.key_path = Some(key_path);
        }
    }
}
