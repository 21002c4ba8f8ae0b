//! Address records read from the knowledge graph.

use serde::Serialize;

/// An address in the knowledge graph without a registry cross-reference.
///
/// Fields that were unbound in the query result are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    /// Named graph holding the address triples.
    pub graph: String,
    /// Address IRI.
    pub address: String,
    pub street: String,
    pub municipality: String,
    pub country: String,
    pub postal_code: String,
    pub house_number: String,
    /// Site the address belongs to.
    pub site: String,
}

impl CandidateRecord {
    /// Full address as the registry spells it:
    /// `"{street} {house_number}, {postal_code} {municipality}, {country}"`.
    pub fn formatted_address(&self) -> String {
        format!(
            "{} {}, {} {}, {}",
            self.street, self.house_number, self.postal_code, self.municipality, self.country
        )
    }
}

/// A candidate linked to exactly one registry address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedMatch {
    pub record: CandidateRecord,
    /// Registry address IRI.
    pub registry_uri: String,
}

impl AcceptedMatch {
    pub fn new(record: CandidateRecord, registry_uri: impl Into<String>) -> Self {
        Self {
            record,
            registry_uri: registry_uri.into(),
        }
    }

    pub fn graph(&self) -> &str {
        &self.record.graph
    }
}
