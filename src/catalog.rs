//! Catalog
//!
//! The read-only service directory carts resolve against. Services are keyed
//! by stable string ids; snapshots store ids only and look the full record
//! back up here at restore time.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Stable identifier of a service in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A purchasable service.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Catalog id.
    pub id: ServiceId,

    /// Display name.
    pub name: String,

    /// Per-unit price.
    pub price: Money<'static, Currency>,

    /// Catalog category.
    pub category: String,

    /// Average customer rating.
    pub rating: f32,

    /// Display image path.
    pub image: String,
}

/// The service directory, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: FxHashMap<ServiceId, Service>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a service, replacing any existing entry with the same id.
    pub fn insert(&mut self, service: Service) {
        self.services.insert(service.id.clone(), service);
    }

    /// Look a service up by id.
    pub fn get(&self, id: &ServiceId) -> Option<&Service> {
        self.services.get(id)
    }

    /// Number of services in the catalog.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check whether the catalog has no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl FromIterator<Service> for Catalog {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for service in iter {
            catalog.insert(service);
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;

    use super::*;

    fn service(id: &str) -> Service {
        Service {
            id: ServiceId::from(id),
            name: format!("Service {id}"),
            price: Money::from_minor(100_00, iso::USD),
            category: "Testing".to_owned(),
            rating: 4.5,
            image: String::new(),
        }
    }

    #[test]
    fn lookup_finds_inserted_services_by_id() {
        let catalog: Catalog = [service("1"), service("2")].into_iter().collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&ServiceId::from("2")).map(|svc| svc.name.as_str()),
            Some("Service 2")
        );
        assert!(catalog.get(&ServiceId::from("3")).is_none());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut catalog = Catalog::new();
        catalog.insert(service("1"));

        let mut repriced = service("1");
        repriced.price = Money::from_minor(150_00, iso::USD);
        catalog.insert(repriced);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(&ServiceId::from("1")).map(|svc| svc.price),
            Some(Money::from_minor(150_00, iso::USD))
        );
    }

    #[test]
    fn service_id_serializes_as_a_bare_string() {
        let id = ServiceId::from("42");

        assert_eq!(
            serde_json::to_value(&id).expect("id should serialize"),
            serde_json::json!("42")
        );
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn empty_catalog_reports_empty() {
        let catalog = Catalog::new();

        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
