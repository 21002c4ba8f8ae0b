//! Core trait for SPARQL query execution.

use async_trait::async_trait;

use crate::error::AppError;
use crate::sparql::row::Row;

/// Executes read queries against a SPARQL endpoint.
///
/// Implemented over HTTP by [`SparqlClient`](crate::sparql::SparqlClient);
/// tests substitute in-memory executors.
#[async_trait]
pub trait SparqlExecutor: Send + Sync {
    /// Executes a SELECT query and returns its flattened rows, in result order.
    ///
    /// Any failure (transport, HTTP status, malformed document) is an error:
    /// a partial result set is never returned.
    async fn select(&self, query: &str) -> Result<Vec<Row>, AppError>;
}
