//! Identity providers and the one-shot settlement wait
//!
//! Providers expose a subscription that fires at most once with the settled
//! identity (or `None`). The gate never keeps a subscription alive: it takes
//! the first value and tears the subscription down.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use super::types::Identity;

/// Callback receiving the settled identity
pub type IdentityListener = Box<dyn FnOnce(Option<Identity>) + Send + 'static>;

/// Source of "who is calling"
pub trait IdentityProvider: Send + Sync {
    /// Register a listener invoked at most once with the settled identity.
    ///
    /// If the provider has already settled, the listener may be invoked before
    /// this returns.
    fn on_settled(&self, listener: IdentityListener) -> Subscription;
}

/// Handle to a registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to tear down (listener already fired)
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Suspend until the provider reports its settled identity.
///
/// The subscription is removed as soon as the first value arrives. A provider
/// that drops the listener without calling it counts as "no identity". There
/// is no timeout: a provider that never settles stalls the caller.
pub async fn wait_for_identity(provider: &dyn IdentityProvider) -> Option<Identity> {
    let (tx, rx) = oneshot::channel();
    let subscription = provider.on_settled(Box::new(move |identity| {
        let _ = tx.send(identity);
    }));

    let identity = rx.await.ok().flatten();
    subscription.unsubscribe();

    debug!(
        settled = identity.is_some(),
        anonymous = identity.as_ref().map(|i| i.is_anonymous).unwrap_or(false),
        "Identity settled"
    );
    identity
}

// ─── Static provider ───

/// Provider that is settled from the start
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn signed_out() -> Self {
        Self { identity: None }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn on_settled(&self, listener: IdentityListener) -> Subscription {
        listener(self.identity.clone());
        Subscription::noop()
    }
}

// ─── Settling provider ───

#[derive(Default)]
struct SettlingState {
    settled: Option<Option<Identity>>,
    listeners: HashMap<u64, IdentityListener>,
    next_id: u64,
}

/// Provider that stays unsettled until [`SettlingIdentityProvider::settle`]
/// is called, queueing listeners in the meantime
#[derive(Clone, Default)]
pub struct SettlingIdentityProvider {
    state: Arc<Mutex<SettlingState>>,
}

impl SettlingIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the settled identity and notify every pending listener
    pub fn settle(&self, identity: Option<Identity>) {
        let pending: Vec<IdentityListener> = {
            let mut state = self.state.lock();
            state.settled = Some(identity.clone());
            state.listeners.drain().map(|(_, l)| l).collect()
        };
        for listener in pending {
            listener(identity.clone());
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state.lock().settled.is_some()
    }

    /// Listeners still waiting for settlement
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }
}

impl IdentityProvider for SettlingIdentityProvider {
    fn on_settled(&self, listener: IdentityListener) -> Subscription {
        let mut state = self.state.lock();
        if let Some(identity) = state.settled.clone() {
            drop(state);
            listener(identity);
            return Subscription::noop();
        }

        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(id, listener);
        drop(state);

        let weak = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.lock().listeners.remove(&id);
            }
        })
    }
}
