//! HTTP status codes returned by the backend adapter.

/// Status code of a rejected backend call.
///
/// Kept as a number so transient-failure checks never look at message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    /// 4xx: the backend refused the request itself.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx: the backend failed while handling the request.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// Gateway hiccups and throttling, worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self.0, 429 | 502 | 503 | 504)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
