//! Firestore v1 REST document store
//!
//! Supports:
//! - Point lookups (`GET .../documents/{collection}/{key}`), 404 meaning "absent"
//! - Equality queries (`POST .../documents/{parent}:runQuery`)
//! - Bearer ID token and API key authentication
//!
//! No retries: the first failure is reported and the gate denies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use url::Url;

use portal_gate::{Document, DocumentStore, FieldFilter};

use crate::config::FirebaseConfig;
use crate::error::{SourceError, SourceResult};
use crate::value::{decode_fields, encode_value};

/// Document as returned by the REST API
#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RestDocument {
    fn into_document(self) -> Document {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        Document::new(id, decode_fields(&self.fields))
    }
}

/// One element of a `runQuery` response stream
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<RestDocument>,
}

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    config: FirebaseConfig,
}

impl FirestoreStore {
    pub fn new(config: FirebaseConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// `{endpoint}/v1/projects/{project}/databases/{db}/documents/{segments...}`
    fn documents_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> SourceResult<Url> {
        let mut url = Url::parse(&self.config.firestore_endpoint)?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Config("Firestore endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                "documents",
            ])
            .extend(segments.into_iter().filter(|s| !s.is_empty()));

        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn document_url(&self, collection: &str, key: &str) -> SourceResult<Url> {
        if key.is_empty() {
            return Err(SourceError::Config("Empty document key".into()));
        }
        self.documents_url(collection.split('/').chain(std::iter::once(key)))
    }

    /// `runQuery` endpoint for the parent of `collection`, plus the collection id
    fn run_query_url(&self, collection: &str) -> SourceResult<(Url, String)> {
        let parts: Vec<&str> = collection.split('/').filter(|s| !s.is_empty()).collect();
        let Some((collection_id, parent)) = parts.split_last() else {
            return Err(SourceError::Config("Empty collection path".into()));
        };

        let action = match parent.split_last() {
            Some((last, _)) => format!("{last}:runQuery"),
            None => "documents:runQuery".to_string(),
        };

        let mut url = self.documents_url(parent.iter().copied())?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Config("Firestore endpoint cannot be a base URL".into()))?
            .pop()
            .push(&action);
        Ok((url, collection_id.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch one document; `None` on 404
    pub async fn fetch_document(&self, collection: &str, key: &str) -> SourceResult<Option<Document>> {
        let url = self.document_url(collection, key)?;
        debug!(collection, key, "Firestore get");

        let response = self.authorize(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = check_status(response).await?.text().await?;
        let doc: RestDocument = serde_json::from_str(&text)?;
        Ok(Some(doc.into_document()))
    }

    /// Run an equality query; results in server order
    pub async fn run_query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> SourceResult<Vec<Document>> {
        let (url, collection_id) = self.run_query_url(collection)?;
        debug!(collection, filters = filters.len(), "Firestore runQuery");

        let body = structured_query(&collection_id, filters);
        let response = self
            .authorize(self.client.post(url))
            .json(&body)
            .send()
            .await?;

        let text = check_status(response).await?.text().await?;
        let items: Vec<RunQueryItem> = serde_json::from_str(&text)?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.document)
            .map(RestDocument::into_document)
            .collect())
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, key: &str) -> portal_gate::Result<Option<Document>> {
        Ok(self.fetch_document(collection, key).await?)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> portal_gate::Result<Vec<Document>> {
        Ok(self.run_query(collection, filters).await?)
    }
}

async fn check_status(response: Response) -> SourceResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Http { status, body })
}

/// `structuredQuery` body: one collection, AND of EQUAL field filters
fn structured_query(collection_id: &str, filters: &[FieldFilter]) -> Value {
    let field_filters: Vec<Value> = filters
        .iter()
        .map(|f| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": f.field },
                    "op": "EQUAL",
                    "value": encode_value(&f.value),
                }
            })
        })
        .collect();

    let mut query = json!({ "from": [{ "collectionId": collection_id }] });
    match field_filters.len() {
        0 => {}
        1 => query["where"] = field_filters.into_iter().next().unwrap_or_default(),
        _ => {
            query["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": field_filters }
            })
        }
    }
    json!({ "structuredQuery": query })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirestoreStore {
        let config = FirebaseConfig::new("demo")
            .with_api_key("k1")
            .with_endpoint("http://localhost:9000");
        FirestoreStore::new(config).unwrap()
    }

    #[test]
    fn test_document_url() {
        let url = store()
            .document_url("institutions/T1/settings", "adminAuth")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v1/projects/demo/databases/(default)/documents/institutions/T1/settings/adminAuth?key=k1"
        );
    }

    #[test]
    fn test_key_is_one_segment() {
        let url = store().document_url("students", "a/b").unwrap();
        assert!(url.path().ends_with("/documents/students/a%2Fb"));
    }

    #[test]
    fn test_run_query_url() {
        let (url, id) = store().run_query_url("institutions/T1/staff").unwrap();
        assert_eq!(id, "staff");
        assert_eq!(
            url.path(),
            "/v1/projects/demo/databases/(default)/documents/institutions/T1:runQuery"
        );

        let (url, id) = store().run_query_url("staff").unwrap();
        assert_eq!(id, "staff");
        assert_eq!(url.path(), "/v1/projects/demo/databases/(default)/documents:runQuery");

        assert!(store().run_query_url("").is_err());
    }

    #[test]
    fn test_structured_query_shapes() {
        let single = structured_query("staff", &[FieldFilter::eq("email", "b@x.com")]);
        assert_eq!(
            single["structuredQuery"]["where"]["fieldFilter"]["value"],
            json!({ "stringValue": "b@x.com" })
        );

        let both = structured_query(
            "staff",
            &[FieldFilter::eq("email", "b@x.com"), FieldFilter::eq("isActive", true)],
        );
        let composite = &both["structuredQuery"]["where"]["compositeFilter"];
        assert_eq!(composite["op"], "AND");
        assert_eq!(composite["filters"].as_array().map(Vec::len), Some(2));

        let none = structured_query("staff", &[]);
        assert!(none["structuredQuery"].get("where").is_none());
    }

    #[test]
    fn test_rest_document_id() {
        let doc = RestDocument {
            name: "projects/demo/databases/(default)/documents/students/S1".into(),
            fields: Map::new(),
        };
        assert_eq!(doc.into_document().id, "S1");
    }
}
