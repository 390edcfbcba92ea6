//! Error Types for Crypto Analyst

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalystError>;

#[derive(Error, Debug)]
pub enum AnalystError {
    #[error("Market data unavailable for '{symbol}': {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Upstream error{}: {detail}", status_suffix(.status))]
    Upstream { status: Option<u16>, detail: String },

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl AnalystError {
    pub fn data_unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }

    /// Short console message for the interactive session
    pub fn user_message(&self) -> String {
        match self {
            Self::DataUnavailable { symbol, .. } => {
                format!("No market data for '{symbol}'. Check the symbol or try again later.")
            }
            Self::Auth(_) => "The AI service rejected the API key. Check OPENAI_API_KEY.".into(),
            Self::Upstream { status: Some(status), .. } => {
                format!("The AI service failed with HTTP {status}. Try again later.")
            }
            Self::Upstream { status: None, .. } => {
                "The AI service could not be reached. Check OPENAI_BASE_URL.".into()
            }
            Self::MalformedResponse(_) => {
                "The AI service returned an analysis that could not be read. Nothing was saved.".into()
            }
            Self::Io(err) => format!("Could not write the report: {err}"),
            Self::Config(msg) => format!("Configuration problem: {msg}"),
        }
    }
}

impl From<AgentError> for AnalystError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Auth(msg) => Self::Auth(msg),
            AgentError::Upstream { status, body } => Self::Upstream {
                status: Some(status),
                detail: body,
            },
            AgentError::ProviderUnavailable(msg) | AgentError::Provider(msg) => {
                Self::Upstream { status: None, detail: msg }
            }
            AgentError::Parse(msg) => Self::MalformedResponse(msg),
            AgentError::Json(err) => Self::MalformedResponse(err.to_string()),
            AgentError::Config(msg) => Self::Config(msg),
            AgentError::Io(err) => Self::Io(err),
        }
    }
}

impl From<csv::Error> for AnalystError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.into())
    }
}

impl From<serde_json::Error> for AnalystError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_error_kind_mapping() {
        let auth: AnalystError = AgentError::Auth("401".into()).into();
        assert!(matches!(auth, AnalystError::Auth(_)));

        let upstream: AnalystError = AgentError::Upstream { status: 503, body: "busy".into() }.into();
        assert!(matches!(upstream, AnalystError::Upstream { status: Some(503), .. }));
        assert_eq!(upstream.to_string(), "Upstream error (HTTP 503): busy");

        let unreachable: AnalystError = AgentError::ProviderUnavailable("refused".into()).into();
        assert!(matches!(unreachable, AnalystError::Upstream { status: None, .. }));
        assert_eq!(unreachable.to_string(), "Upstream error: refused");

        let parse: AnalystError = AgentError::Parse("eof".into()).into();
        assert!(matches!(parse, AnalystError::MalformedResponse(_)));
    }

    #[test]
    fn test_user_messages() {
        let err = AnalystError::data_unavailable("NOTREAL", "no match");
        assert!(err.user_message().contains("NOTREAL"));

        let err = AnalystError::malformed("missing field");
        assert!(err.user_message().contains("Nothing was saved"));
    }
}
