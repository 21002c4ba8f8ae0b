//! SPARQL Update patch linking addresses to the registry.
//!
//! Accepted matches are grouped per graph (first-seen order) into one
//! `INSERT DATA` block each:
//!
//! ```text
//! INSERT DATA {
//!   GRAPH <graph> {
//!     <address> <https://data.vlaanderen.be/ns/adres#verwijstNaar> <registry> .
//!     <registry> <http://www.w3.org/2004/02/skos/core#note> "note" .
//!   }
//! }
//!
//! ;
//! ```
//!
//! Blocks are separated by a `;` line so the file runs as one update request.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::models::AcceptedMatch;

/// Cross-reference from a graph address to its registry address.
pub const LINK_PREDICATE: &str = "https://data.vlaanderen.be/ns/adres#verwijstNaar";

/// Annotation attached to the registry address.
pub const NOTE_PREDICATE: &str = "http://www.w3.org/2004/02/skos/core#note";

/// Renders and writes patch documents.
///
/// Matches whose graph, address or registry IRI cannot be written as an IRI
/// reference are left out of the document and counted as skipped.
#[derive(Debug, Clone)]
pub struct PatchWriter {
    note: String,
}

/// A rendered patch document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub content: String,
    /// Matches linked by the document.
    pub written: usize,
    /// Matches left out because an IRI was not writable.
    pub skipped: usize,
}

impl PatchWriter {
    pub fn new(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }

    /// Renders the patch for `accepted`. No writable matches render as an
    /// empty document.
    pub fn render(&self, accepted: &[AcceptedMatch]) -> Patch {
        let writable: Vec<&AcceptedMatch> = accepted
            .iter()
            .filter(|m| {
                let ok = is_iri_ref(m.graph())
                    && is_iri_ref(&m.record.address)
                    && is_iri_ref(&m.registry_uri);
                if !ok {
                    tracing::warn!(
                        "Skipping {} -> {}: not writable as IRIs (graph {:?})",
                        m.record.address,
                        m.registry_uri,
                        m.graph()
                    );
                }
                ok
            })
            .collect();

        let mut patch = Patch {
            content: String::new(),
            written: writable.len(),
            skipped: accepted.len() - writable.len(),
        };

        let groups = group_by_graph(&writable);
        if groups.is_empty() {
            return patch;
        }

        let note = escape_literal(&self.note);
        let blocks: Vec<String> = groups
            .iter()
            .map(|(graph, items)| {
                let lines: Vec<String> = items
                    .iter()
                    .flat_map(|m| {
                        [
                            format!(
                                "    <{}> <{}> <{}> .",
                                m.record.address, LINK_PREDICATE, m.registry_uri
                            ),
                            format!("    <{}> <{}> \"{}\" .", m.registry_uri, NOTE_PREDICATE, note),
                        ]
                    })
                    .collect();

                format!(
                    "INSERT DATA {{\n  GRAPH <{}> {{\n{}\n  }}\n}}\n",
                    graph,
                    lines.join("\n")
                )
            })
            .collect();

        patch.content = blocks.join("\n;\n\n") + "\n;";
        patch
    }

    /// Writes the patch to `destination`, replacing any existing file.
    ///
    /// The document is written to a temporary file next to `destination` and
    /// renamed into place, so a failed write leaves no partial patch behind.
    pub fn write(&self, accepted: &[AcceptedMatch], destination: &Path) -> Result<Patch, AppError> {
        let patch = self.render(accepted);
        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| AppError::io(destination, e))?;
        file.write_all(patch.content.as_bytes())
            .map_err(|e| AppError::io(destination, e))?;
        file.persist(destination)
            .map_err(|e| AppError::io(destination, e.error))?;

        tracing::info!(
            "Wrote {} links to {}",
            patch.written,
            destination.display()
        );
        Ok(patch)
    }
}

/// Groups matches by graph, keeping first-seen graph order and input order
/// within each graph.
fn group_by_graph<'a>(accepted: &[&'a AcceptedMatch]) -> Vec<(&'a str, Vec<&'a AcceptedMatch>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&AcceptedMatch>)> = Vec::new();

    for &m in accepted {
        let slot = *index.entry(m.graph()).or_insert_with(|| {
            groups.push((m.graph(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(m);
    }

    groups
}

/// True when `iri` can be written between `<` and `>` unescaped.
fn is_iri_ref(iri: &str) -> bool {
    !iri.is_empty()
        && !iri
            .chars()
            .any(|c| c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
}

/// Escapes a string for use inside a double-quoted SPARQL literal.
fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
