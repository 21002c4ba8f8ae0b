//! address-relink - link knowledge graph addresses to the address registry
//!
//! Finds addresses in a SPARQL knowledge graph that lack a cross-reference to
//! the address registry, looks each one up in the registry's match endpoint
//! and writes a SPARQL Update patch for every unambiguous match.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod models;
pub mod patch;
pub mod registry;
pub mod repositories;
pub mod services;
pub mod sparql;
