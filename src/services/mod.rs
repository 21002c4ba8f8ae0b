//! Business logic services for address reconciliation.
//!
//! Services orchestrate the repositories and registry client and apply the
//! matching rules.

mod matcher;
mod reconcile;

pub use matcher::MatchService;
pub use reconcile::{Reconciler, RunReport};
