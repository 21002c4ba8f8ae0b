//! HTTP client for the registry match endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::http::{HttpClient, RetryPolicy};
use crate::registry::model::{AddressQuery, RegistryAddress};
use crate::registry::AddressRegistry;

/// Registry lookups over HTTP with retries.
#[derive(Clone)]
pub struct RegistryClient {
    http: HttpClient,
    endpoint: String,
    policy: RetryPolicy,
    headers: HeaderMap,
}

impl RegistryClient {
    pub fn new(http: HttpClient, endpoint: impl Into<String>, policy: RetryPolicy) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            http,
            endpoint: endpoint.into(),
            policy,
            headers,
        }
    }
}

#[async_trait]
impl AddressRegistry for RegistryClient {
    async fn lookup(&self, query: &AddressQuery) -> Option<Vec<RegistryAddress>> {
        let params = query.params();
        let response = self
            .http
            .get_with_retry(&self.endpoint, &params, &self.headers, &self.policy)
            .await?;

        match response.json::<Vec<RegistryAddress>>().await {
            Ok(addresses) => Some(addresses),
            Err(e) => {
                tracing::warn!("Undecodable registry response for {:?}: {}", params, e);
                None
            }
        }
    }
}
