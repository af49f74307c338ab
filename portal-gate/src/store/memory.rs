//! In-memory document store
//!
//! Documents are kept per collection in key order, which is the order queries
//! return them in. Used for tests, demos and fixture-driven CLI runs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Document, DocumentStore, FieldFilter};
use crate::error::{GateError, Result};

type Collection = BTreeMap<String, Map<String, Value>>;

/// Thread-safe in-memory store: `collection path → key → fields`
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    failure: RwLock<Option<String>>,
    requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON fixture of the shape
    /// `{ "<collection path>": { "<key>": { ...fields } } }`
    pub fn from_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let collections: HashMap<String, Collection> = serde_json::from_str(&raw)?;
        debug!(
            path = %path.as_ref().display(),
            collections = collections.len(),
            "Fixture loaded"
        );
        Ok(Self {
            collections: RwLock::new(collections),
            ..Self::default()
        })
    }

    /// Insert or replace a document. Only JSON objects are accepted.
    pub fn insert(&self, collection: &str, key: &str, fields: Value) {
        let Value::Object(fields) = fields else {
            warn!(collection, key, "Ignoring non-object document");
            return;
        };
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), fields);
    }

    pub fn remove(&self, collection: &str, key: &str) -> bool {
        self.collections
            .write()
            .get_mut(collection)
            .map(|c| c.remove(key).is_some())
            .unwrap_or(false)
    }

    /// Make every subsequent call fail with `RemoteAccessFailure(reason)`;
    /// `None` restores normal operation
    pub fn set_failure(&self, reason: Option<&str>) {
        *self.failure.write() = reason.map(str::to_string);
    }

    /// Number of `get` + `query` calls served (including failed ones)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin_request(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.failure.read().as_ref() {
            Some(reason) => Err(GateError::RemoteAccessFailure(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        self.begin_request()?;
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(key))
            .map(|fields| Document::new(key, fields.clone())))
    }

    async fn query(&self, collection: &str, filters: &[FieldFilter]) -> Result<Vec<Document>> {
        self.begin_request()?;
        let collections = self.collections.read();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .map(|(key, fields)| Document::new(key.as_str(), fields.clone()))
            .filter(|doc| filters.iter().all(|f| f.matches(doc)))
            .collect())
    }
}
