//! SPARQL access layer for reading the knowledge graph.
//!
//! - [`SparqlExecutor`] - Execute SELECT queries (implemented by [`SparqlClient`])
//! - [`SparqlResults`] - The `application/sparql-results+json` document
//! - [`Row`] - A flattened result row with plain string values
//!
//! # Usage
//!
//! ```ignore
//! use address_relink::sparql::{SparqlClient, SparqlExecutor};
//!
//! let client = SparqlClient::new(http, "http://localhost:8890/sparql", timeout);
//! let rows = client.select("SELECT ?s WHERE { ?s ?p ?o } LIMIT 1").await?;
//! let subject = rows[0].get("s");
//! ```

mod client;
mod row;
mod traits;

pub use client::SparqlClient;
pub use row::{Row, SparqlResults};
pub use traits::SparqlExecutor;
