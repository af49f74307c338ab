//! Verification strategies: one role check each, tried in order
//!
//! A strategy either claims the caller (`Matched`) or passes (`Continue`).
//! The first error stops the chain; later strategies are not consulted.

use async_trait::async_trait;
use tracing::debug;

use super::types::GateResult;
use crate::config::GateConfig;
use crate::error::Result;
use crate::identity::Identity;
use crate::store::{AdminRecord, DocumentStore, FieldFilter, StaffRecord};

/// Result of a single strategy
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Matched(GateResult),
    Continue,
}

#[async_trait]
pub trait VerificationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn verify(
        &self,
        identity: &Identity,
        store: &dyn DocumentStore,
        config: &GateConfig,
    ) -> Result<Verdict>;
}

/// Identity email equals the admin singleton's email
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminMatch;

#[async_trait]
impl VerificationStrategy for AdminMatch {
    fn name(&self) -> &'static str {
        "admin"
    }

    async fn verify(
        &self,
        identity: &Identity,
        store: &dyn DocumentStore,
        config: &GateConfig,
    ) -> Result<Verdict> {
        let Some(email) = identity.verified_email() else {
            return Ok(Verdict::Continue);
        };

        let Some(doc) = store
            .get(&config.settings_path(), &config.admin_document)
            .await?
        else {
            debug!("Admin record missing");
            return Ok(Verdict::Continue);
        };

        let admin = AdminRecord::from_document(&doc);
        if admin.matches(email) {
            Ok(Verdict::Matched(GateResult::Admin {
                identity: identity.clone(),
            }))
        } else {
            Ok(Verdict::Continue)
        }
    }
}

/// At least one active staff record carries the identity's email.
///
/// When several records match, the first one the store returns wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveStaffMatch;

#[async_trait]
impl VerificationStrategy for ActiveStaffMatch {
    fn name(&self) -> &'static str {
        "staff"
    }

    async fn verify(
        &self,
        identity: &Identity,
        store: &dyn DocumentStore,
        config: &GateConfig,
    ) -> Result<Verdict> {
        let Some(email) = identity.verified_email() else {
            return Ok(Verdict::Continue);
        };

        let filters = [
            FieldFilter::eq("email", email),
            FieldFilter::eq("isActive", true),
        ];
        let docs = store.query(&config.staff_path(), &filters).await?;
        if docs.len() > 1 {
            debug!(matches = docs.len(), "Multiple active staff records, using first");
        }

        match docs.first() {
            Some(doc) => Ok(Verdict::Matched(GateResult::Staff {
                identity: identity.clone(),
                staff: doc.decode::<StaffRecord>()?,
            })),
            None => Ok(Verdict::Continue),
        }
    }
}

/// Run `strategies` in order and return the first match
pub async fn first_match(
    strategies: &[&dyn VerificationStrategy],
    identity: &Identity,
    store: &dyn DocumentStore,
    config: &GateConfig,
) -> Result<Option<GateResult>> {
    for strategy in strategies {
        match strategy.verify(identity, store, config).await? {
            Verdict::Matched(result) => {
                debug!(strategy = strategy.name(), "Strategy matched");
                return Ok(Some(result));
            }
            Verdict::Continue => debug!(strategy = strategy.name(), "Strategy passed"),
        }
    }
    Ok(None)
}
