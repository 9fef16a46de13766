use async_trait::async_trait;
use thiserror::Error;

use quotation_core::domain::customer::CustomerDetails;
use quotation_core::domain::product::CatalogEntry;

pub mod customer;
pub mod memory;
pub mod product;

pub use customer::SqlCustomerRepository;
pub use memory::{InMemoryCustomerRepository, InMemoryInventoryRepository};
pub use product::SqlInventoryRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Every catalog entry, in catalog order.
    async fn list_inventory(&self) -> Result<Vec<CatalogEntry>, RepositoryError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Customer names starting with `prefix`, ascending, at most `limit`.
    async fn find_names_by_prefix(
        &self,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<String>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<CustomerDetails>, RepositoryError>;
}
