//! # Portal Sources
//!
//! Firebase REST backends for `portal-gate`:
//!
//! - [`FirestoreStore`]: `DocumentStore` over the Firestore v1 REST API
//!   (point lookups and `runQuery` equality filters)
//! - [`IdentityToolkitProvider`]: `IdentityProvider` resolving an ID token
//!   through `accounts:lookup`
//!
//! Neither adapter retries: a failed request is a denied gate for that load.

pub mod config;
pub mod error;
pub mod firestore;
pub mod identity_toolkit;
pub mod value;

pub use config::FirebaseConfig;
pub use error::{SourceError, SourceResult};
pub use firestore::FirestoreStore;
pub use identity_toolkit::IdentityToolkitProvider;
