//! Addresses that still lack a registry cross-reference.

use crate::error::AppError;
use crate::models::CandidateRecord;
use crate::sparql::{Row, SparqlExecutor};

/// Addresses of an `org:Site`, in any graph, without `adres:verwijstNaar`.
pub const CANDIDATES_QUERY: &str = r#"
SELECT DISTINCT
  ?graph
  ?address
  ?addressStreet
  ?addressGemeenteNaam
  ?addressGemeenteLand
  ?addressGemeentePostCode
  ?addressGemeenteNummer
  ?site
WHERE {
  GRAPH ?graph {
    ?address a <http://www.w3.org/ns/locn#Address> ;
      <http://www.w3.org/ns/locn#thoroughfare> ?addressStreet ;
      <https://data.vlaanderen.be/ns/adres#gemeentenaam> ?addressGemeenteNaam ;
      <https://data.vlaanderen.be/ns/adres#land> ?addressGemeenteLand ;
      <http://www.w3.org/ns/locn#postCode> ?addressGemeentePostCode ;
      <https://data.vlaanderen.be/ns/adres#Adresvoorstelling.huisnummer> ?addressGemeenteNummer .
  }

  ?site a <http://www.w3.org/ns/org#Site> ;
    <https://data.vlaanderen.be/ns/organisatie#bestaatUit> ?address .

  FILTER NOT EXISTS {
    ?address <https://data.vlaanderen.be/ns/adres#verwijstNaar> ?registryAddress .
  }
}
"#;

/// Reads reconciliation candidates from the knowledge graph.
#[derive(Clone)]
pub struct CandidateRepository<S: SparqlExecutor> {
    sparql: S,
}

impl<S: SparqlExecutor> CandidateRepository<S> {
    pub fn new(sparql: S) -> Self {
        Self { sparql }
    }

    /// Fetch every unlinked address, in result order.
    ///
    /// Fails as a whole: reconciling against a partial candidate list is
    /// pointless.
    pub async fn fetch_candidates(&self) -> Result<Vec<CandidateRecord>, AppError> {
        let rows = self.sparql.select(CANDIDATES_QUERY).await?;
        Ok(rows.iter().map(Self::row_to_candidate).collect())
    }

    fn row_to_candidate(row: &Row) -> CandidateRecord {
        CandidateRecord {
            graph: row.get("graph").to_string(),
            address: row.get("address").to_string(),
            street: row.get("addressStreet").to_string(),
            municipality: row.get("addressGemeenteNaam").to_string(),
            country: row.get("addressGemeenteLand").to_string(),
            postal_code: row.get("addressGemeentePostCode").to_string(),
            house_number: row.get("addressGemeenteNummer").to_string(),
            site: row.get("site").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticSparql(Vec<Row>);

    #[async_trait]
    impl SparqlExecutor for StaticSparql {
        async fn select(&self, query: &str) -> Result<Vec<Row>, AppError> {
            assert!(query.contains("FILTER NOT EXISTS"));
            Ok(self.0.clone())
        }
    }

    struct FailingSparql;

    #[async_trait]
    impl SparqlExecutor for FailingSparql {
        async fn select(&self, _query: &str) -> Result<Vec<Row>, AppError> {
            Err(AppError::MalformedResults("missing head".into()))
        }
    }

    #[tokio::test]
    async fn test_fetch_candidates_maps_rows() {
        let row: Row = [
            ("graph", "http://mu.semte.ch/graphs/public"),
            ("address", "http://data.lblod.info/id/adressen/1"),
            ("addressStreet", "Kerkstraat"),
            ("addressGemeenteNaam", "Gent"),
            ("addressGemeenteLand", "België"),
            ("addressGemeentePostCode", "9000"),
            ("addressGemeenteNummer", "1"),
            ("site", "http://data.lblod.info/id/vestigingen/1"),
        ]
        .into_iter()
        .collect();

        let repo = CandidateRepository::new(StaticSparql(vec![row]));
        let candidates = repo.fetch_candidates().await.unwrap();

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.graph, "http://mu.semte.ch/graphs/public");
        assert_eq!(c.street, "Kerkstraat");
        assert_eq!(c.postal_code, "9000");
        assert_eq!(c.site, "http://data.lblod.info/id/vestigingen/1");
    }

    #[tokio::test]
    async fn test_missing_columns_become_empty() {
        let row: Row = [("address", "http://data.lblod.info/id/adressen/2")]
            .into_iter()
            .collect();

        let repo = CandidateRepository::new(StaticSparql(vec![row]));
        let candidates = repo.fetch_candidates().await.unwrap();

        assert_eq!(candidates[0].address, "http://data.lblod.info/id/adressen/2");
        assert_eq!(candidates[0].house_number, "");
        assert_eq!(candidates[0].graph, "");
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let repo = CandidateRepository::new(FailingSparql);
        assert!(repo.fetch_candidates().await.is_err());
    }
}
