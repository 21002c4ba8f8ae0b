//! Registry matching for a single candidate.

use crate::models::{CandidateRecord, MatchOutcome};
use crate::registry::{AddressQuery, AddressRegistry, RegistryAddress};

/// Decides whether a candidate has exactly one validated registry address.
///
/// A registry result is validated when its formatted address equals the
/// candidate's [`formatted_address`](CandidateRecord::formatted_address) byte
/// for byte and its status is `inGebruik`.
#[derive(Clone)]
pub struct MatchService<R: AddressRegistry> {
    registry: R,
}

impl<R: AddressRegistry> MatchService<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Match one candidate against the registry.
    ///
    /// Never fails: an unreachable registry yields
    /// [`MatchOutcome::LookupFailed`].
    pub async fn match_record(&self, record: &CandidateRecord) -> MatchOutcome {
        let query = AddressQuery::from(record);
        let Some(results) = self.registry.lookup(&query).await else {
            tracing::warn!("Registry lookup failed for {}", record.address);
            return MatchOutcome::LookupFailed;
        };

        let outcome = Self::select(record, &results);
        match &outcome {
            MatchOutcome::Matched(uri) => tracing::info!("Found URI: {}", uri),
            MatchOutcome::NoMatch => {
                tracing::info!("No matches found for {}", record.address)
            }
            MatchOutcome::Ambiguous(n) => tracing::warn!(
                "Too many matches ({}) found for {}, flagged for manual inspection",
                n,
                record.address
            ),
            MatchOutcome::MissingIdentifier => tracing::warn!(
                "Registry match for {} has no identifier",
                record.address
            ),
            MatchOutcome::LookupFailed => {}
        }
        outcome
    }

    /// Applies the validation rules to the registry's results.
    pub fn select(record: &CandidateRecord, results: &[RegistryAddress]) -> MatchOutcome {
        let expected = record.formatted_address();
        let survivors: Vec<&RegistryAddress> = results
            .iter()
            .filter(|r| r.spelling() == expected)
            .filter(|r| r.is_in_use())
            .collect();

        match survivors.as_slice() {
            [] => MatchOutcome::NoMatch,
            [only] => match only.id() {
                Some(id) => MatchOutcome::Matched(id.to_string()),
                None => MatchOutcome::MissingIdentifier,
            },
            many => MatchOutcome::Ambiguous(many.len()),
        }
    }
}
