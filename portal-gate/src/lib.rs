//! # Portal Gate
//!
//! Role-based access gating for the fee portal: every privileged page asks
//! the gate who the caller is before rendering anything.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │               portal-gate                 │
//! ├───────────────────────────────────────────┤
//! │   GateActor / GateHandle (sequential)     │
//! ├───────────────────────────────────────────┤
//! │   AccessGate                              │
//! │   check_admin │ check_staff_or_admin │    │
//! │   check_student                           │
//! │   ordered strategies: AdminMatch →        │
//! │                       ActiveStaffMatch    │
//! ├──────────┬──────────┬──────────┬──────────┤
//! │ Identity │ Document │  Local   │ Navigator│
//! │ Provider │  Store   │  Cache   │          │
//! └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use portal_gate::{
//!     AccessGate, GateConfig, GateResult, Identity, MemoryCache, MemoryStore,
//!     RecordingNavigator, StaticIdentityProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GateConfig::new("institutions/TEST_INSTITUTE_01");
//!     let store = MemoryStore::new();
//!     store.insert(&config.settings_path(), &config.admin_document, serde_json::json!({
//!         "email": "a@x.com"
//!     }));
//!
//!     let gate = AccessGate::new(
//!         config,
//!         Arc::new(StaticIdentityProvider::signed_in(Identity::new("uid-1", "a@x.com"))),
//!         Arc::new(store),
//!         Arc::new(MemoryCache::new()),
//!         Arc::new(RecordingNavigator::new()),
//!     );
//!
//!     assert!(matches!(gate.check_admin().await, GateResult::Admin { .. }));
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Fresh verification**: a grant is only issued after the role record was
//!   read from the document store during that same check
//! - **Fixed precedence**: admin is always tried before staff
//! - **Fail closed**: every lookup error degrades to `Denied` plus one redirect
//! - **Railway Programming**: collaborator operations return `Result<T, GateError>`

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod navigation;
pub mod store;

// Re-exports for convenience
pub use cache::{FileCache, LocalCache, MemoryCache};
pub use config::GateConfig;
pub use error::{GateError, Result};
pub use gate::{AccessGate, GateActor, GateHandle, GateResult, Role};
pub use identity::{
    wait_for_identity, Identity, IdentityListener, IdentityProvider, SettlingIdentityProvider,
    StaticIdentityProvider, Subscription,
};
pub use navigation::{Navigator, RecordingNavigator};
pub use store::{
    AdminRecord, Document, DocumentStore, FieldFilter, MemoryStore, StaffRecord, StudentRecord,
};
