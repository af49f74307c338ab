//! Error types for portal-gate: Railway Programming
//!
//! Collaborator operations return `Result<T, GateError>`. The gate itself never
//! hands these to its caller: every gate outcome error becomes `Denied`, and the
//! variant only decides how the denial is logged.

use thiserror::Error;

/// Unified error type for gate checks and their collaborators
#[derive(Error, Debug)]
pub enum GateError {
    // ─── Gate Outcomes ───

    #[error("No settled identity")]
    IdentityUnavailable,

    #[error("Anonymous identity cannot hold the {0} role")]
    AnonymousIdentity(&'static str),

    #[error("No cached student identifier")]
    MissingStudentHint,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Remote access failure: {0}")]
    RemoteAccessFailure(String),

    // ─── Infrastructure Errors ───

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Actor unavailable: {0}")]
    ActorUnavailable(String),
}

impl GateError {
    /// Short stable label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityUnavailable => "identity_unavailable",
            Self::AnonymousIdentity(_) => "anonymous_identity",
            Self::MissingStudentHint => "missing_student_hint",
            Self::RecordNotFound(_) => "record_not_found",
            Self::RemoteAccessFailure(_) => "remote_access_failure",
            Self::Cache(_) => "cache",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::ActorUnavailable(_) => "actor_unavailable",
        }
    }

    /// True when the error came from talking to a backend rather than from
    /// the caller simply not holding the role
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteAccessFailure(_) | Self::Serialization(_))
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::Serialization(err.to_string())
    }
}

/// Result type alias for gate operations
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_classification() {
        assert!(GateError::RemoteAccessFailure("503".into()).is_remote());
        assert!(!GateError::RecordNotFound("admin".into()).is_remote());
        assert!(!GateError::IdentityUnavailable.is_remote());
    }

    #[test]
    fn test_display() {
        let err = GateError::AnonymousIdentity("admin");
        assert_eq!(err.to_string(), "Anonymous identity cannot hold the admin role");
        assert_eq!(err.kind(), "anonymous_identity");
    }
}
