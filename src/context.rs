//! Application context wiring configuration to clients.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::http::HttpClient;
use crate::registry::RegistryClient;
use crate::services::Reconciler;
use crate::sparql::SparqlClient;

/// Root application context.
///
/// Holds the resolved configuration and one shared HTTP connection pool, and
/// builds the clients and services of a run from them.
#[derive(Clone)]
pub struct Context {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Shared HTTP client.
    pub http: reqwest::Client,
}

impl Context {
    /// Creates a new context for the given configuration.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("address-relink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppError::Client)?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Client for the knowledge graph endpoint.
    pub fn sparql_client(&self) -> SparqlClient {
        SparqlClient::new(
            self.http.clone(),
            self.config.sparql.endpoint.clone(),
            Duration::from_secs(self.config.sparql.timeout_secs),
        )
    }

    /// Client for the registry match endpoint.
    pub fn registry_client(&self) -> RegistryClient {
        RegistryClient::new(
            HttpClient::new(self.http.clone()),
            self.config.registry.endpoint.clone(),
            self.config.registry.retry_policy(),
        )
    }

    /// Reconciler over the configured endpoints.
    pub fn reconciler(&self) -> Reconciler<SparqlClient, RegistryClient> {
        Reconciler::new(&self.config, self.sparql_client(), self.registry_client())
    }
}
