//! Data access layer for the knowledge graph.
//!
//! Repositories own the SPARQL text and map result rows onto domain models.

mod candidates;

pub use candidates::CandidateRepository;
