//! GateActor: Tokio actor serialising gate checks
//!
//! Checks are processed one at a time from an mpsc channel, so a check always
//! runs to completion (grant or redirect) before the next one starts. This is
//! the page-load model: one privileged code path at a time, no cancellation.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use portal_gate::{AccessGate, GateActor, GateConfig, MemoryCache, MemoryStore,
//!                   RecordingNavigator, StaticIdentityProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gate = AccessGate::new(
//!         GateConfig::default(),
//!         Arc::new(StaticIdentityProvider::signed_out()),
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(MemoryCache::new()),
//!         Arc::new(RecordingNavigator::new()),
//!     );
//!
//!     let handle = GateActor::spawn(gate);
//!     let result = handle.check_admin().await?;
//!     assert!(result.is_denied());
//!     Ok(())
//! }
//! ```

use tokio::sync::{mpsc, oneshot};
use tracing::info;

use super::access::AccessGate;
use super::types::GateResult;
use crate::error::{GateError, Result};
use crate::identity::Identity;

// ─── Actor Messages ───

enum GateMsg {
    ResolveIdentity {
        reply: oneshot::Sender<Option<Identity>>,
    },
    CheckAdmin {
        reply: oneshot::Sender<GateResult>,
    },
    CheckStaffOrAdmin {
        reply: oneshot::Sender<GateResult>,
    },
    CheckStudent {
        reply: oneshot::Sender<GateResult>,
    },
}

// ─── Actor ───

/// Gate actor: owns one AccessGate and runs its checks sequentially
pub struct GateActor {
    gate: AccessGate,
    rx: mpsc::Receiver<GateMsg>,
}

impl GateActor {
    /// Spawn the actor on the current Tokio runtime and return its handle
    pub fn spawn(gate: AccessGate) -> GateHandle {
        let (tx, rx) = mpsc::channel(64);
        let actor = Self { gate, rx };

        tokio::spawn(actor.run());
        info!("GateActor spawned");
        GateHandle { tx }
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                GateMsg::ResolveIdentity { reply } => {
                    let _ = reply.send(self.gate.resolve_identity().await);
                }
                GateMsg::CheckAdmin { reply } => {
                    let _ = reply.send(self.gate.check_admin().await);
                }
                GateMsg::CheckStaffOrAdmin { reply } => {
                    let _ = reply.send(self.gate.check_staff_or_admin().await);
                }
                GateMsg::CheckStudent { reply } => {
                    let _ = reply.send(self.gate.check_student().await);
                }
            }
        }
        info!("GateActor stopped");
    }
}

// ─── Handle (client-facing API) ───

/// Cloneable handle to a running GateActor
#[derive(Clone)]
pub struct GateHandle {
    tx: mpsc::Sender<GateMsg>,
}

impl GateHandle {
    pub async fn resolve_identity(&self) -> Result<Option<Identity>> {
        let (reply, rx) = oneshot::channel();
        self.send(GateMsg::ResolveIdentity { reply }).await?;
        rx.await
            .map_err(|_| GateError::ActorUnavailable("GateActor dropped".into()))
    }

    pub async fn check_admin(&self) -> Result<GateResult> {
        let (reply, rx) = oneshot::channel();
        self.send(GateMsg::CheckAdmin { reply }).await?;
        Self::receive(rx).await
    }

    pub async fn check_staff_or_admin(&self) -> Result<GateResult> {
        let (reply, rx) = oneshot::channel();
        self.send(GateMsg::CheckStaffOrAdmin { reply }).await?;
        Self::receive(rx).await
    }

    pub async fn check_student(&self) -> Result<GateResult> {
        let (reply, rx) = oneshot::channel();
        self.send(GateMsg::CheckStudent { reply }).await?;
        Self::receive(rx).await
    }

    async fn send(&self, msg: GateMsg) -> Result<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| GateError::ActorUnavailable("GateActor".into()))
    }

    async fn receive(rx: oneshot::Receiver<GateResult>) -> Result<GateResult> {
        rx.await
            .map_err(|_| GateError::ActorUnavailable("GateActor dropped".into()))
    }
}
