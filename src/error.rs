//! Holonet error types

/// Holonet error types
///
/// `NotFound` and `Upstream` are raised by the upstream access layer and
/// propagate unchanged through the cache and the enricher. `BadRequest` is
/// produced by the request-facing pipeline (pagination, filters, sort).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HolonetError {
    // Upstream errors
    /// The upstream reports that the resource does not exist.
    #[error("upstream resource not found: {0}")]
    NotFound(String),

    /// Any other upstream failure: error status, malformed payload, or a
    /// network-level error (timeout, connection refused, DNS).
    #[error("upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    // Caller errors
    #[error("bad request: {0}")]
    BadRequest(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HolonetError {
    /// Upstream failure carrying the HTTP status that triggered it.
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Upstream failure without an HTTP status (transport or decoding).
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// Upstream HTTP status, if this error was caused by one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HolonetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HolonetError::upstream(format!("upstream request timed out: {err}"))
        } else if err.is_decode() {
            HolonetError::upstream(format!("malformed upstream payload: {err}"))
        } else {
            HolonetError::upstream(format!("upstream request failed: {err}"))
        }
    }
}

/// Result type alias for Holonet operations
pub type Result<T> = std::result::Result<T, HolonetError>;
