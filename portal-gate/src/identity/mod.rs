//! Identity module: who is calling, as reported by the identity provider
//!
//! The provider only ever answers "who"; what that caller may see is decided
//! by the gate against the document store.

pub mod provider;
pub mod types;

pub use provider::{
    wait_for_identity, IdentityListener, IdentityProvider, SettlingIdentityProvider,
    StaticIdentityProvider, Subscription,
};
pub use types::Identity;
