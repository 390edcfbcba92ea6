//! Error Types

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Provider error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable (connection refused, DNS, timeout)
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Authentication failed (HTTP 401/403 or an unusable key)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-success HTTP status from the provider
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display_includes_status() {
        let err = AgentError::Upstream { status: 502, body: "bad gateway".into() };
        assert_eq!(err.to_string(), "Upstream returned HTTP 502: bad gateway");
    }

    #[test]
    fn test_io_error_converts() {
        let err: AgentError = std::io::Error::other("disk full").into();
        assert!(matches!(err, AgentError::Io(_)));
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
