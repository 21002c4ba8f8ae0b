//! End-to-end reconciliation run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{AcceptedMatch, CandidateRecord, MatchOutcome};
use crate::patch::PatchWriter;
use crate::registry::AddressRegistry;
use crate::repositories::CandidateRepository;
use crate::services::MatchService;
use crate::sparql::SparqlExecutor;

/// Counts collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Candidates returned by the knowledge graph.
    pub fetched: usize,
    /// Candidates sent to the registry (after sampling).
    pub processed: usize,
    pub matched: usize,
    pub no_match: usize,
    pub ambiguous: usize,
    pub lookup_failed: usize,
    pub missing_identifier: usize,
    /// Matches dropped because an IRI could not be written to the patch.
    pub unwritable: usize,
    pub output: PathBuf,
}

impl RunReport {
    fn record(&mut self, outcome: &MatchOutcome) {
        match outcome {
            MatchOutcome::Matched(_) => self.matched += 1,
            MatchOutcome::NoMatch => self.no_match += 1,
            MatchOutcome::Ambiguous(_) => self.ambiguous += 1,
            MatchOutcome::LookupFailed => self.lookup_failed += 1,
            MatchOutcome::MissingIdentifier => self.missing_identifier += 1,
        }
    }

    /// Matches actually written to the patch.
    pub fn linked(&self) -> usize {
        self.matched - self.unwritable
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} candidates processed: {} linked, {} without match, {} ambiguous, {} lookups failed, {} without identifier, {} unwritable -> {}",
            self.processed,
            self.fetched,
            self.linked(),
            self.no_match,
            self.ambiguous,
            self.lookup_failed,
            self.missing_identifier,
            self.unwritable,
            self.output.display()
        )
    }
}

/// Drives candidates through the matcher and writes the patch.
///
/// Candidates are processed one at a time; the patch is written once, after
/// the last candidate. A failure to fetch candidates aborts before anything
/// is written.
pub struct Reconciler<S: SparqlExecutor, R: AddressRegistry> {
    candidates: CandidateRepository<S>,
    matcher: MatchService<R>,
    writer: PatchWriter,
    sample_limit: Option<usize>,
    output: PathBuf,
}

impl<S: SparqlExecutor, R: AddressRegistry> Reconciler<S, R> {
    pub fn new(config: &Config, sparql: S, registry: R) -> Self {
        Self {
            candidates: CandidateRepository::new(sparql),
            matcher: MatchService::new(registry),
            writer: PatchWriter::new(config.patch.note.clone()),
            sample_limit: config.sample_limit(),
            output: config.run.output.clone(),
        }
    }

    /// Candidates this run would process, after sampling.
    pub async fn sampled_candidates(&self) -> Result<(usize, Vec<CandidateRecord>), AppError> {
        let mut candidates = self.candidates.fetch_candidates().await?;
        let fetched = candidates.len();
        tracing::info!("Fetched {} candidate addresses", fetched);

        if let Some(limit) = self.sample_limit {
            candidates.truncate(limit);
            tracing::info!("Dry run: limiting to the first {} candidates", candidates.len());
        }

        Ok((fetched, candidates))
    }

    /// Runs the full reconciliation.
    pub async fn run(&self) -> Result<RunReport, AppError> {
        let (fetched, candidates) = self.sampled_candidates().await?;
        let mut report = RunReport {
            fetched,
            processed: candidates.len(),
            output: self.output.clone(),
            ..Default::default()
        };

        let total = candidates.len();
        let mut accepted: Vec<AcceptedMatch> = Vec::new();
        for (i, record) in candidates.into_iter().enumerate() {
            tracing::info!("[{}/{}] Matching {}", i + 1, total, record.address);

            let outcome = self.matcher.match_record(&record).await;
            tracing::debug!("{}: {}", record.address, outcome);
            report.record(&outcome);

            if let MatchOutcome::Matched(uri) = outcome {
                accepted.push(AcceptedMatch::new(record, uri));
            }
        }

        let patch = self.writer.write(&accepted, &self.output)?;
        report.unwritable = patch.skipped;
        tracing::info!("{}", report);

        Ok(report)
    }
}
