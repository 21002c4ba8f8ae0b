//! Address registry access.
//!
//! The registry exposes a fuzzy "match" endpoint: given a municipality,
//! postal code, street and house number it returns every address it considers
//! close. Validation of those results happens in
//! [`MatchService`](crate::services::MatchService).

mod client;
mod model;

use async_trait::async_trait;

pub use client::RegistryClient;
pub use model::{AddressQuery, RegistryAddress, STATUS_IN_USE};

/// Looks up registry addresses for a query.
#[async_trait]
pub trait AddressRegistry: Send + Sync {
    /// Returns the registry's candidates, or `None` when the lookup failed
    /// after exhausting its retries.
    async fn lookup(&self, query: &AddressQuery) -> Option<Vec<RegistryAddress>>;
}

#[async_trait]
impl<T: AddressRegistry + ?Sized> AddressRegistry for &T {
    async fn lookup(&self, query: &AddressQuery) -> Option<Vec<RegistryAddress>> {
        (**self).lookup(query).await
    }
}
