//! Gate domain types: Role, GateResult

use serde::{Deserialize, Serialize};

use crate::cache::{ADMIN_FLAG_KEY, STAFF_FLAG_KEY};
use crate::identity::Identity;
use crate::store::StaffRecord;

/// Roles a caller can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Unauthenticated,
    Student,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    /// Cache key of the non-authoritative flag older pages read
    pub fn legacy_flag(&self) -> Option<&'static str> {
        match self {
            Self::Admin => Some(ADMIN_FLAG_KEY),
            Self::Staff => Some(STAFF_FLAG_KEY),
            Self::Student | Self::Unauthenticated => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one gate check. Produced fresh per check, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum GateResult {
    Admin {
        identity: Identity,
    },
    Staff {
        identity: Identity,
        staff: StaffRecord,
    },
    Student {
        id: String,
    },
    Denied,
}

impl GateResult {
    pub fn role(&self) -> Role {
        match self {
            Self::Admin { .. } => Role::Admin,
            Self::Staff { .. } => Role::Staff,
            Self::Student { .. } => Role::Student,
            Self::Denied => Role::Unauthenticated,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Admin { identity } | Self::Staff { identity, .. } => Some(identity),
            Self::Student { .. } | Self::Denied => None,
        }
    }
}
