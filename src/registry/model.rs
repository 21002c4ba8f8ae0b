//! Registry request and response shapes.

use serde::Deserialize;

use crate::models::CandidateRecord;

/// `adresStatus` of an address that is currently in use.
pub const STATUS_IN_USE: &str = "inGebruik";

/// Query parameters for the match endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub municipality: String,
    pub zipcode: String,
    pub thoroughfare: String,
    pub house_number: String,
}

impl AddressQuery {
    /// Query parameters as sent on the wire.
    pub fn params(&self) -> [(&'static str, &str); 4] {
        [
            ("municipality", self.municipality.as_str()),
            ("zipcode", self.zipcode.as_str()),
            ("thoroughfarename", self.thoroughfare.as_str()),
            ("housenumber", self.house_number.as_str()),
        ]
    }
}

impl From<&CandidateRecord> for AddressQuery {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            municipality: record.municipality.clone(),
            zipcode: record.postal_code.clone(),
            thoroughfare: record.street.clone(),
            house_number: record.house_number.clone(),
        }
    }
}

/// One address returned by the match endpoint.
///
/// Only the members used for validation are decoded; missing or `null`
/// members read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryAddress {
    #[serde(default)]
    volledig_adres: Option<FullAddress>,
    #[serde(default)]
    adres_status: Option<String>,
    #[serde(default)]
    identificator: Option<Identifier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullAddress {
    #[serde(default)]
    geografische_naam: Option<GeographicName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeographicName {
    #[serde(default)]
    spelling: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Identifier {
    #[serde(default)]
    id: Option<String>,
}

impl RegistryAddress {
    /// Formatted full address (`volledigAdres.geografischeNaam.spelling`).
    pub fn spelling(&self) -> &str {
        self.volledig_adres
            .as_ref()
            .and_then(|a| a.geografische_naam.as_ref())
            .and_then(|n| n.spelling.as_deref())
            .unwrap_or("")
    }

    /// Lifecycle status (`adresStatus`).
    pub fn status(&self) -> &str {
        self.adres_status.as_deref().unwrap_or("")
    }

    pub fn is_in_use(&self) -> bool {
        self.status() == STATUS_IN_USE
    }

    /// Address IRI (`identificator.id`), if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.identificator
            .as_ref()
            .and_then(|i| i.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}
