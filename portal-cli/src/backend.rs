//! Collaborator wiring for the CLI
//!
//! `PORTAL_FIXTURE` selects a local JSON fixture with a static identity,
//! otherwise the Firebase REST adapters are used.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use portal_gate::{
    DocumentStore, FileCache, Identity, IdentityProvider, MemoryStore, Navigator,
    StaticIdentityProvider,
};
use portal_sources::{FirebaseConfig, FirestoreStore, IdentityToolkitProvider};

const DEFAULT_CACHE_FILE: &str = ".portal-cache.json";
const DEFAULT_FIXTURE_UID: &str = "local-user";

/// Reports redirects on stderr; stdout carries the JSON result
pub struct StderrNavigator;

impl Navigator for StderrNavigator {
    fn redirect(&self, target: &str) {
        eprintln!("redirect: {target}");
    }
}

pub struct Backend {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,
}

impl Backend {
    pub fn from_env() -> Result<Self> {
        match std::env::var_os("PORTAL_FIXTURE") {
            Some(path) => Self::fixture(PathBuf::from(path)),
            None => Self::firebase(),
        }
    }

    fn fixture(path: PathBuf) -> Result<Self> {
        let store = MemoryStore::from_fixture(&path)
            .with_context(|| format!("loading fixture {}", path.display()))?;
        info!(fixture = %path.display(), "Using fixture backend");

        Ok(Self {
            identity: Arc::new(fixture_identity(
                std::env::var("PORTAL_EMAIL").ok(),
                std::env::var("PORTAL_ANONYMOUS").ok(),
                std::env::var("PORTAL_UID").ok(),
            )),
            store: Arc::new(store),
        })
    }

    fn firebase() -> Result<Self> {
        let config = FirebaseConfig::from_env().context("configuring Firebase")?;
        info!(project = %config.project_id, "Using Firebase backend");

        Ok(Self {
            identity: Arc::new(IdentityToolkitProvider::new(config.clone())?),
            store: Arc::new(FirestoreStore::new(config)?),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Anonymous wins over an email; neither means signed out
fn fixture_identity(
    email: Option<String>,
    anonymous: Option<String>,
    uid: Option<String>,
) -> StaticIdentityProvider {
    let uid = uid.unwrap_or_else(|| DEFAULT_FIXTURE_UID.to_string());

    if anonymous.as_deref().is_some_and(is_truthy) {
        return StaticIdentityProvider::signed_in(Identity::anonymous(uid));
    }
    match email.filter(|e| !e.is_empty()) {
        Some(email) => StaticIdentityProvider::signed_in(Identity::new(uid, email)),
        None => StaticIdentityProvider::signed_out(),
    }
}

pub fn open_cache() -> Result<FileCache> {
    let path = std::env::var("PORTAL_CACHE_FILE").unwrap_or_else(|_| DEFAULT_CACHE_FILE.into());
    FileCache::open(&path).with_context(|| format!("opening cache {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_gate::wait_for_identity;

    #[tokio::test]
    async fn test_fixture_identity() {
        let provider = fixture_identity(Some("a@x.com".into()), None, None);
        assert_eq!(
            wait_for_identity(&provider).await,
            Some(Identity::new("local-user", "a@x.com"))
        );

        let provider = fixture_identity(Some("a@x.com".into()), Some("true".into()), Some("u9".into()));
        assert_eq!(wait_for_identity(&provider).await, Some(Identity::anonymous("u9")));

        let provider = fixture_identity(Some(String::new()), Some("0".into()), None);
        assert!(wait_for_identity(&provider).await.is_none());
    }

    #[test]
    fn test_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }
}
