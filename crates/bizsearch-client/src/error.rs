use thiserror::Error;

/// Errors returned by the search service client.
///
/// The view collapses every variant into the same demo-mode fallback; the
/// distinct variants exist so the cause can be logged.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured bound.
    #[error("search request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into either envelope shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl SearchError {
    /// Short machine-friendly label for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Http(e) if e.is_connect() => "connect",
            SearchError::Http(e) if e.is_timeout() => "timeout",
            SearchError::Http(_) => "transport",
            SearchError::Timeout { .. } => "timeout",
            SearchError::UnexpectedStatus { .. } => "status",
            SearchError::Deserialize { .. } => "malformed_body",
            SearchError::InvalidBaseUrl { .. } => "config",
        }
    }
}
