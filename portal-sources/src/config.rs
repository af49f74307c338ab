//! Firebase project configuration

use crate::error::{SourceError, SourceResult};

pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Firebase / GCP project id
    pub project_id: String,

    /// Web API key, sent as `?key=`
    pub api_key: Option<String>,

    /// ID token of the signed-in user; sent as bearer to Firestore and
    /// resolved by the identity provider
    pub id_token: Option<String>,

    /// Firestore database id
    pub database: String,

    pub firestore_endpoint: String,

    pub identity_endpoint: String,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

impl FirebaseConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: None,
            id_token: None,
            database: "(default)".to_string(),
            firestore_endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
            identity_endpoint: DEFAULT_IDENTITY_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Build from `FIREBASE_*` environment variables.
    ///
    /// `FIREBASE_PROJECT_ID` is required; everything else is optional.
    pub fn from_env() -> SourceResult<Self> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| SourceError::Config("FIREBASE_PROJECT_ID is not set".into()))?;

        let mut config = Self::new(project_id);
        config.api_key = std::env::var("FIREBASE_API_KEY").ok();
        config.id_token = std::env::var("FIREBASE_ID_TOKEN").ok().filter(|t| !t.is_empty());
        if let Ok(endpoint) = std::env::var("FIRESTORE_ENDPOINT") {
            config.firestore_endpoint = endpoint;
        }
        if let Ok(endpoint) = std::env::var("IDENTITY_TOOLKIT_ENDPOINT") {
            config.identity_endpoint = endpoint;
        }
        if let Some(secs) = std::env::var("FIREBASE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Point both REST APIs at the same base URL (emulators, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.firestore_endpoint = endpoint.clone();
        self.identity_endpoint = endpoint;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
