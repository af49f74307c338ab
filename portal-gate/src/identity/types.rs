use serde::{Deserialize, Serialize};

/// Settled caller identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub is_anonymous: bool,
}

impl Identity {
    /// Signed-in identity with an email address
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: Some(email.into()),
            is_anonymous: false,
        }
    }

    /// Anonymous session, as used by student pages
    pub fn anonymous(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            is_anonymous: true,
        }
    }

    /// Email usable for role matching; anonymous sessions never have one
    pub fn verified_email(&self) -> Option<&str> {
        if self.is_anonymous {
            return None;
        }
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}
