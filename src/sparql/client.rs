//! SPARQL protocol client over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::error::AppError;
use crate::sparql::row::{Row, SparqlResults};
use crate::sparql::traits::SparqlExecutor;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Sends queries as `application/x-www-form-urlencoded` POSTs.
#[derive(Clone)]
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl SparqlClient {
    /// Creates a client for `endpoint` sharing the given reqwest client.
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SparqlExecutor for SparqlClient {
    async fn select(&self, query: &str) -> Result<Vec<Row>, AppError> {
        tracing::debug!("Executing query against {}:\n{}", self.endpoint, query.trim());

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::http(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                url: self.endpoint.clone(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::http(&self.endpoint, e))?;
        let rows = SparqlResults::from_slice(&body)?.into_rows();
        tracing::debug!("Query returned {} rows", rows.len());

        Ok(rows)
    }
}
