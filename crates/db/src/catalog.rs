use tracing::warn;

use quotation_core::domain::customer::CustomerDetails;
use quotation_core::domain::product::CatalogEntry;

use crate::repositories::{
    CustomerRepository, InventoryRepository, SqlCustomerRepository, SqlInventoryRepository,
};
use crate::DbPool;

/// Result of a lookup that never fails outright. When the underlying query
/// fails, `value` is the empty default and `failure` says why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupOutcome<T> {
    pub value: T,
    pub failure: Option<String>,
}

impl<T> LookupOutcome<T> {
    fn found(value: T) -> Self {
        Self { value, failure: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> LookupOutcome<T> {
    fn degraded(failure: String) -> Self {
        Self { value: T::default(), failure: Some(failure) }
    }
}

/// Read-only catalog access for a quotation session. Every call goes to the
/// repositories; nothing is cached between calls.
pub struct CatalogLookup<I, C> {
    inventory: I,
    customers: C,
    suggestion_limit: u32,
}

pub type SqlCatalogLookup = CatalogLookup<SqlInventoryRepository, SqlCustomerRepository>;

impl SqlCatalogLookup {
    pub fn from_pool(pool: DbPool, suggestion_limit: u32) -> Self {
        Self::new(
            SqlInventoryRepository::new(pool.clone()),
            SqlCustomerRepository::new(pool),
            suggestion_limit,
        )
    }
}

impl<I, C> CatalogLookup<I, C>
where
    I: InventoryRepository,
    C: CustomerRepository,
{
    pub fn new(inventory: I, customers: C, suggestion_limit: u32) -> Self {
        Self { inventory, customers, suggestion_limit: suggestion_limit.max(1) }
    }

    pub async fn list_inventory(&self) -> LookupOutcome<Vec<CatalogEntry>> {
        match self.inventory.list_inventory().await {
            Ok(entries) => LookupOutcome::found(entries),
            Err(error) => {
                warn!(
                    event_name = "catalog.inventory.lookup_failed",
                    error = %error,
                    "inventory lookup failed; continuing with an empty catalog"
                );
                LookupOutcome::degraded(format!("Error fetching inventory: {error}"))
            }
        }
    }

    /// Autocomplete suggestions. A blank prefix yields nothing without
    /// touching the database.
    pub async fn find_customers_by_prefix(&self, prefix: &str) -> LookupOutcome<Vec<String>> {
        if prefix.trim().is_empty() {
            return LookupOutcome::found(Vec::new());
        }

        match self.customers.find_names_by_prefix(prefix, self.suggestion_limit).await {
            Ok(names) => LookupOutcome::found(names),
            Err(error) => {
                warn!(
                    event_name = "catalog.customers.lookup_failed",
                    error = %error,
                    "customer autocomplete failed"
                );
                LookupOutcome::degraded(format!("Error fetching customers: {error}"))
            }
        }
    }

    pub async fn customer_details(&self, name: &str) -> LookupOutcome<Option<CustomerDetails>> {
        if name.trim().is_empty() {
            return LookupOutcome::found(None);
        }

        match self.customers.find_by_name(name).await {
            Ok(details) => LookupOutcome::found(details),
            Err(error) => {
                warn!(
                    event_name = "catalog.customer.lookup_failed",
                    error = %error,
                    "customer details lookup failed"
                );
                LookupOutcome::degraded(format!("Error fetching customer details: {error}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use quotation_core::domain::customer::CustomerDetails;
    use quotation_core::domain::product::CatalogEntry;

    use super::{CatalogLookup, SqlCatalogLookup};
    use crate::repositories::{
        CustomerRepository, InMemoryCustomerRepository, InMemoryInventoryRepository,
        InventoryRepository, RepositoryError,
    };
    use crate::connect_with_settings;

    struct BrokenCatalog;

    #[async_trait::async_trait]
    impl InventoryRepository for BrokenCatalog {
        async fn list_inventory(&self) -> Result<Vec<CatalogEntry>, RepositoryError> {
            Err(RepositoryError::Decode("inventory offline".to_string()))
        }
    }

    #[async_trait::async_trait]
    impl CustomerRepository for BrokenCatalog {
        async fn find_names_by_prefix(
            &self,
            _prefix: &str,
            _limit: u32,
        ) -> Result<Vec<String>, RepositoryError> {
            Err(RepositoryError::Decode("customers offline".to_string()))
        }

        async fn find_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<CustomerDetails>, RepositoryError> {
            Err(RepositoryError::Decode("customers offline".to_string()))
        }
    }

    fn customers() -> InMemoryCustomerRepository {
        InMemoryCustomerRepository::new(
            (0..12)
                .map(|n| CustomerDetails {
                    name: format!("Acme {n:02}"),
                    phone: format!("555-01{n:02}"),
                    address: format!("{n} Grid Road"),
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn failures_collapse_to_empty_values_with_a_reason() {
        let lookup = CatalogLookup::new(BrokenCatalog, BrokenCatalog, 10);

        let inventory = lookup.list_inventory().await;
        assert!(inventory.is_degraded());
        assert!(inventory.value.is_empty());
        assert!(inventory.failure.as_deref().unwrap_or("").contains("inventory offline"));

        let names = lookup.find_customers_by_prefix("Ac").await;
        assert!(names.is_degraded());
        assert!(names.value.is_empty());

        let details = lookup.customer_details("Acme").await;
        assert!(details.is_degraded());
        assert!(details.value.is_none());
    }

    #[tokio::test]
    async fn suggestions_honour_the_configured_limit() {
        let lookup = CatalogLookup::new(InMemoryInventoryRepository::default(), customers(), 10);

        let names = lookup.find_customers_by_prefix("Acme").await;
        assert!(!names.is_degraded());
        assert_eq!(names.value.len(), 10);
        assert_eq!(names.value.first().map(String::as_str), Some("Acme 00"));
    }

    #[tokio::test]
    async fn blank_inputs_short_circuit() {
        let lookup = CatalogLookup::new(BrokenCatalog, BrokenCatalog, 10);

        let names = lookup.find_customers_by_prefix("").await;
        assert!(!names.is_degraded());
        assert!(names.value.is_empty());

        let padded = lookup.find_customers_by_prefix(" \t ").await;
        assert!(!padded.is_degraded());
        assert!(padded.value.is_empty());

        let details = lookup.customer_details("  ").await;
        assert!(!details.is_degraded());
        assert!(details.value.is_none());
    }

    #[tokio::test]
    async fn empty_catalog_is_not_a_failure() {
        let lookup = CatalogLookup::new(InMemoryInventoryRepository::default(), customers(), 10);
        let inventory = lookup.list_inventory().await;

        assert!(!inventory.is_degraded());
        assert!(inventory.into_value().is_empty());
    }

    #[tokio::test]
    async fn sql_lookup_degrades_when_schema_is_missing() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        let lookup = SqlCatalogLookup::from_pool(pool.clone(), 10);

        let inventory = lookup.list_inventory().await;
        assert!(inventory.is_degraded());
        assert!(inventory.value.is_empty());

        let stocked = CatalogLookup::new(
            InMemoryInventoryRepository::new(vec![CatalogEntry::new("Bulb", Decimal::ONE)]),
            customers(),
            10,
        );
        assert_eq!(stocked.list_inventory().await.value.len(), 1);

        pool.close().await;
    }
}
