//! Remote document store: point lookups and equality queries
//!
//! The gate only ever reads. Collections are addressed by full path
//! (`institutions/X/staff`), documents by key inside a collection.

pub mod memory;
pub mod records;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub use memory::MemoryStore;
pub use records::{AdminRecord, StaffRecord, StudentRecord};

/// A document as returned by the store: its key plus plain JSON fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Deserialize the fields into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// Equality predicate `field == value`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.field(&self.field) == Some(&self.value)
    }
}

/// Read access to the remote document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup; `Ok(None)` when the document does not exist
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// All documents of `collection` matching every filter, in store order
    async fn query(&self, collection: &str, filters: &[FieldFilter]) -> Result<Vec<Document>>;
}
