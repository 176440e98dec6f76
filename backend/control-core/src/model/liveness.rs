use serde::{Deserialize, Serialize};

/// Whether the DAV server is accepting connections, as last observed.
///
/// Also the wire value of `check_server_status` (`"stopped"` / `"running"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    #[default]
    Stopped,
    Running,
}

impl Liveness {
    pub fn is_running(self) -> bool {
        self == Liveness::Running
    }
}

impl std::fmt::Display for Liveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Liveness::Stopped => write!(f, "stopped"),
            Liveness::Running => write!(f, "running"),
        }
    }
}
