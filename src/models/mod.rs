//! Domain models for address reconciliation.

mod address;
mod outcome;

pub use address::{AcceptedMatch, CandidateRecord};
pub use outcome::MatchOutcome;
