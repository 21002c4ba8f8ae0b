//! SPARQL JSON results and flattened rows.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::AppError;

/// An `application/sparql-results+json` document.
///
/// Only the parts needed for SELECT results are modeled; unknown members are
/// ignored. A document without `results` is treated as having no bindings.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    pub head: Head,
    #[serde(default)]
    pub results: Bindings,
}

/// The `head` member: projected variable names, in order.
#[derive(Debug, Clone, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

/// The `results` member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bindings {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, Term>>,
}

/// A bound RDF term. Only the lexical value is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    #[serde(default)]
    pub value: String,
}

impl SparqlResults {
    /// Parses a results document from raw bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body).map_err(|e| AppError::MalformedResults(e.to_string()))
    }

    /// Flattens every binding into a [`Row`] keyed by `head.vars`.
    ///
    /// Variables unbound in a solution map to the empty string.
    pub fn into_rows(self) -> Vec<Row> {
        let vars = self.head.vars;
        self.results
            .bindings
            .into_iter()
            .map(|mut binding| {
                let data = vars
                    .iter()
                    .map(|var| {
                        let value = binding.remove(var).map(|t| t.value).unwrap_or_default();
                        (var.clone(), value)
                    })
                    .collect();
                Row::new(data)
            })
            .collect()
    }
}

/// A single flattened result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    data: HashMap<String, String>,
}

impl Row {
    /// Creates a new row from a map of variable names to values.
    pub fn new(data: HashMap<String, String>) -> Self {
        Self { data }
    }

    /// Value of `var`, or `""` when the row does not carry it.
    pub fn get(&self, var: &str) -> &str {
        self.data.get(var).map(String::as_str).unwrap_or("")
    }

    /// Returns all variable names in this row.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|s| s.as_str())
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SparqlResults {
        SparqlResults::from_slice(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_into_rows_preserves_order() {
        let results = parse(json!({
            "head": { "vars": ["s", "label"] },
            "results": { "bindings": [
                { "s": { "type": "uri", "value": "http://a" }, "label": { "type": "literal", "value": "A" } },
                { "s": { "type": "uri", "value": "http://b" }, "label": { "type": "literal", "value": "B" } }
            ] }
        }));

        let rows = results.into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("s"), "http://a");
        assert_eq!(rows[1].get("label"), "B");
    }

    #[test]
    fn test_unbound_variable_is_empty_string() {
        let results = parse(json!({
            "head": { "vars": ["s", "label"] },
            "results": { "bindings": [ { "s": { "type": "uri", "value": "http://a" } } ] }
        }));

        let rows = results.into_rows();
        assert_eq!(rows[0].get("label"), "");
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_extra_binding_keys_are_dropped() {
        let results = parse(json!({
            "head": { "vars": ["s"] },
            "results": { "bindings": [ { "s": { "value": "x" }, "o": { "value": "y" } } ] }
        }));

        let rows = results.into_rows();
        let columns: Vec<_> = rows[0].columns().collect();
        assert_eq!(columns, vec!["s"]);
    }

    #[test]
    fn test_missing_results_means_no_rows() {
        let results = parse(json!({ "head": { "vars": ["s"] } }));
        assert!(results.into_rows().is_empty());
    }

    #[test]
    fn test_missing_head_is_malformed() {
        let err = SparqlResults::from_slice(br#"{"results": {"bindings": []}}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedResults(_)));
    }

    #[test]
    fn test_row_get_missing_key() {
        let row = Row::default();
        assert_eq!(row.get("missing"), "");
        assert!(row.is_empty());
    }
}
