use std::collections::BTreeMap;

use tokio::sync::RwLock;

use quotation_core::domain::customer::CustomerDetails;
use quotation_core::domain::product::CatalogEntry;

use super::{CustomerRepository, InventoryRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryInventoryRepository {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl InMemoryInventoryRepository {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries: RwLock::new(entries) }
    }

    pub async fn push(&self, entry: CatalogEntry) {
        self.entries.write().await.push(entry);
    }
}

#[async_trait::async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn list_inventory(&self) -> Result<Vec<CatalogEntry>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }
}

/// Mirrors SQLite's default `LIKE`, which ignores ASCII case.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<BTreeMap<String, CustomerDetails>>,
}

impl InMemoryCustomerRepository {
    pub fn new(customers: Vec<CustomerDetails>) -> Self {
        let customers =
            customers.into_iter().map(|customer| (customer.name.clone(), customer)).collect();
        Self { customers: RwLock::new(customers) }
    }

    pub async fn save(&self, customer: CustomerDetails) {
        self.customers.write().await.insert(customer.name.clone(), customer);
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_names_by_prefix(
        &self,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<String>, RepositoryError> {
        let prefix = prefix.to_ascii_lowercase();
        let customers = self.customers.read().await;
        Ok(customers
            .keys()
            .filter(|name| name.to_ascii_lowercase().starts_with(&prefix))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CustomerDetails>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(name).cloned())
    }
}
