//! Error types for Firebase REST backends

use portal_gate::GateError;
use thiserror::Error;

pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::Config(format!("URL parse error: {err}"))
    }
}

impl From<SourceError> for GateError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Decode(msg) => GateError::Serialization(msg),
            SourceError::Config(msg) => GateError::Config(msg),
            other => GateError::RemoteAccessFailure(other.to_string()),
        }
    }
}
