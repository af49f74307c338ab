//! Identity Toolkit identity provider
//!
//! Resolves the configured ID token with `accounts:lookup` and settles with the
//! account it belongs to. No token means signed out. Any failure (network,
//! expired token, malformed response) also settles as signed out.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use portal_gate::{Identity, IdentityListener, IdentityProvider, Subscription};

use crate::config::FirebaseConfig;
use crate::error::{SourceError, SourceResult};

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    email: Option<String>,
    #[serde(default)]
    provider_user_info: Vec<serde_json::Value>,
}

impl AccountInfo {
    fn into_identity(self) -> Identity {
        let email = self.email.filter(|e| !e.is_empty());
        Identity {
            is_anonymous: email.is_none() && self.provider_user_info.is_empty(),
            uid: self.local_id,
            email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentityToolkitProvider {
    client: Client,
    config: FirebaseConfig,
}

impl IdentityToolkitProvider {
    pub fn new(config: FirebaseConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn lookup_url(&self) -> SourceResult<Url> {
        let mut url = Url::parse(&self.config.identity_endpoint)?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Config("Identity endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(["v1", "accounts:lookup"]);
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Resolve `id_token` to the account it was issued for
    pub async fn lookup(&self, id_token: &str) -> SourceResult<Option<Identity>> {
        lookup(&self.client, self.lookup_url()?, id_token).await
    }
}

async fn lookup(client: &Client, url: Url, id_token: &str) -> SourceResult<Option<Identity>> {
    let response = client
        .post(url)
        .json(&json!({ "idToken": id_token }))
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(SourceError::Http {
            status: status.as_u16(),
            body: text,
        });
    }

    let parsed: LookupResponse = serde_json::from_str(&text)?;
    Ok(parsed.users.into_iter().next().map(AccountInfo::into_identity))
}

impl IdentityProvider for IdentityToolkitProvider {
    /// Spawns the lookup on the current Tokio runtime; unsubscribing aborts it
    fn on_settled(&self, listener: IdentityListener) -> Subscription {
        let Some(token) = self.config.id_token.clone() else {
            debug!("No ID token configured, settling signed out");
            listener(None);
            return Subscription::noop();
        };

        let url = match self.lookup_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Identity lookup misconfigured");
                listener(None);
                return Subscription::noop();
            }
        };

        let client = self.client.clone();
        let task = tokio::spawn(async move {
            let identity = match lookup(&client, url, &token).await {
                Ok(identity) => identity,
                Err(e) => {
                    warn!(error = %e, "Identity lookup failed");
                    None
                }
            };
            listener(identity);
        });

        Subscription::new(move || task.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_mapping() {
        let anon: AccountInfo = serde_json::from_value(json!({ "localId": "a1" })).unwrap();
        assert_eq!(anon.into_identity(), Identity::anonymous("a1"));

        let password: AccountInfo = serde_json::from_value(json!({
            "localId": "u1",
            "email": "a@x.com",
            "providerUserInfo": [{ "providerId": "password" }]
        }))
        .unwrap();
        assert_eq!(password.into_identity(), Identity::new("u1", "a@x.com"));

        let phone: AccountInfo = serde_json::from_value(json!({
            "localId": "u2",
            "providerUserInfo": [{ "providerId": "phone" }]
        }))
        .unwrap();
        let identity = phone.into_identity();
        assert!(!identity.is_anonymous);
        assert!(identity.email.is_none());
    }

    #[test]
    fn test_lookup_url() {
        let provider = IdentityToolkitProvider::new(
            FirebaseConfig::new("demo")
                .with_api_key("k1")
                .with_endpoint("http://localhost:9099"),
        )
        .unwrap();
        assert_eq!(
            provider.lookup_url().unwrap().as_str(),
            "http://localhost:9099/v1/accounts:lookup?key=k1"
        );
    }
}
