//! AccessGate: admin, staff and student gates
//!
//! Every check follows the same shape: settle the identity, confirm the role
//! record against the store, then either grant or deny. A denial always
//! redirects exactly once to the entry page and is never surfaced as an error.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use portal_gate::{AccessGate, FileCache, GateConfig, MemoryStore, RecordingNavigator,
//!                   StaticIdentityProvider, Identity};
//!
//! # async fn run() -> portal_gate::Result<()> {
//! let gate = AccessGate::new(
//!     GateConfig::from_env(),
//!     Arc::new(StaticIdentityProvider::signed_in(Identity::new("uid", "b@x.com"))),
//!     Arc::new(MemoryStore::from_fixture("fixture.json")?),
//!     Arc::new(FileCache::open(".portal-cache.json")?),
//!     Arc::new(RecordingNavigator::new()),
//! );
//!
//! let result = gate.check_staff_or_admin().await;
//! println!("role = {}", result.role());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::strategy::{first_match, ActiveStaffMatch, AdminMatch, VerificationStrategy};
use super::types::GateResult;
use crate::cache::{LocalCache, STUDENT_ID_KEY};
use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::identity::{wait_for_identity, Identity, IdentityProvider};
use crate::navigation::Navigator;
use crate::store::{DocumentStore, StudentRecord};

/// Access gate over injected collaborators
pub struct AccessGate {
    config: GateConfig,
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn LocalCache>,
    navigator: Arc<dyn Navigator>,
}

impl AccessGate {
    pub fn new(
        config: GateConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn LocalCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            identity,
            store,
            cache,
            navigator,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Wait for the identity provider's first settled value
    pub async fn resolve_identity(&self) -> Option<Identity> {
        wait_for_identity(self.identity.as_ref()).await
    }

    /// Admin only
    pub async fn check_admin(&self) -> GateResult {
        let span = info_span!("gate", check = "admin", check_id = %Uuid::new_v4());
        async {
            let outcome = self.verify_chain("admin", &[&AdminMatch]).await;
            self.settle(outcome)
        }
        .instrument(span)
        .await
    }

    /// Admin or active staff, admin taking precedence
    pub async fn check_staff_or_admin(&self) -> GateResult {
        let span = info_span!("gate", check = "staff", check_id = %Uuid::new_v4());
        async {
            let outcome = self
                .verify_chain("staff", &[&AdminMatch, &ActiveStaffMatch])
                .await;
            self.settle(outcome)
        }
        .instrument(span)
        .await
    }

    /// Student identified by the cached hint; anonymous identities accepted
    pub async fn check_student(&self) -> GateResult {
        let span = info_span!("gate", check = "student", check_id = %Uuid::new_v4());
        async {
            let outcome = self.verify_student().await;
            self.settle(outcome)
        }
        .instrument(span)
        .await
    }

    // ─── Verification paths ───

    async fn verify_chain(
        &self,
        role: &'static str,
        strategies: &[&dyn VerificationStrategy],
    ) -> Result<GateResult> {
        let identity = self
            .resolve_identity()
            .await
            .ok_or(GateError::IdentityUnavailable)?;
        if identity.is_anonymous {
            return Err(GateError::AnonymousIdentity(role));
        }

        first_match(strategies, &identity, self.store.as_ref(), &self.config)
            .await?
            .ok_or_else(|| {
                GateError::RecordNotFound(format!(
                    "{role} record for {}",
                    identity.email.as_deref().unwrap_or("<no email>")
                ))
            })
    }

    async fn verify_student(&self) -> Result<GateResult> {
        let student_id = self
            .cache
            .get(STUDENT_ID_KEY)
            .filter(|id| !id.is_empty())
            .ok_or(GateError::MissingStudentHint)?;

        self.resolve_identity()
            .await
            .ok_or(GateError::IdentityUnavailable)?;

        let lookup = self
            .store
            .get(&self.config.students_path(), &student_id)
            .await
            .and_then(|doc| {
                doc.ok_or_else(|| GateError::RecordNotFound(format!("student {student_id}")))
            });

        match lookup {
            Ok(doc) => {
                let student = StudentRecord::from(doc);
                debug!(student = %student.id, fields = student.profile.len(), "Student record confirmed");
                Ok(GateResult::Student { id: student_id })
            }
            Err(err) => {
                // Stale or unverifiable hint: drop it so the next load starts clean
                if let Err(e) = self.cache.remove(STUDENT_ID_KEY) {
                    warn!(error = %e, "Failed to clear student hint");
                }
                Err(err)
            }
        }
    }

    // ─── Outcome handling ───

    fn settle(&self, outcome: Result<GateResult>) -> GateResult {
        match outcome {
            Ok(result) => {
                self.mark_legacy_flag(&result);
                info!(role = %result.role(), "Gate passed");
                result
            }
            Err(err) => self.deny(err),
        }
    }

    fn mark_legacy_flag(&self, result: &GateResult) {
        if let Some(key) = result.role().legacy_flag() {
            if let Err(e) = self.cache.set(key, "true") {
                warn!(key, error = %e, "Failed to write legacy flag");
            }
        }
    }

    fn deny(&self, err: GateError) -> GateResult {
        if err.is_remote() {
            error!(reason = err.kind(), error = %err, "Gate check failed");
        } else {
            warn!(reason = err.kind(), error = %err, "Gate denied");
        }
        self.navigator.redirect(&self.config.entry_page);
        GateResult::Denied
    }
}
