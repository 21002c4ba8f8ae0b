//! Result of matching one candidate against the registry.

use std::fmt;

/// How a registry lookup for one candidate ended.
///
/// Only [`MatchOutcome::Matched`] links the candidate; every other variant is
/// a "no match" for the patch, kept apart for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exactly one validated, in-use registry address.
    Matched(String),
    /// No registry address survived validation.
    NoMatch,
    /// More than one registry address survived validation.
    Ambiguous(usize),
    /// The registry could not be reached or answered with garbage.
    LookupFailed,
    /// The single survivor carried no identifier.
    MissingIdentifier,
}

impl MatchOutcome {
    /// Registry IRI when the candidate was matched.
    pub fn registry_uri(&self) -> Option<&str> {
        match self {
            MatchOutcome::Matched(uri) => Some(uri),
            _ => None,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Matched(uri) => write!(f, "matched {}", uri),
            MatchOutcome::NoMatch => write!(f, "no match"),
            MatchOutcome::Ambiguous(n) => write!(f, "ambiguous ({} matches)", n),
            MatchOutcome::LookupFailed => write!(f, "lookup failed"),
            MatchOutcome::MissingIdentifier => write!(f, "match without identifier"),
        }
    }
}
