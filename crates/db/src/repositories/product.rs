use sqlx::Row;

use quotation_core::domain::product::CatalogEntry;
use quotation_core::pricing::{coerce_price, coerce_quantity};

use super::{InventoryRepository, RepositoryError};
use crate::DbPool;

pub struct SqlInventoryRepository {
    pool: DbPool,
}

impl SqlInventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// Numeric columns come back as text so that stray values in the catalog are
// coerced the same way as a typed cell instead of failing the whole listing.
fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<CatalogEntry, RepositoryError> {
    let text = |column: &str| -> Result<String, RepositoryError> {
        row.try_get::<Option<String>, _>(column)
            .map(Option::unwrap_or_default)
            .map_err(|e| RepositoryError::Decode(e.to_string()))
    };

    Ok(CatalogEntry {
        description: text("description")?,
        ratings: text("ratings")?,
        catalog_number: text("cat_no")?,
        make: text("make")?,
        material_name: text("material_name")?,
        available_stock: coerce_quantity(&text("total_quantity")?),
        unit_list_price: coerce_price(&text("list_price")?),
        discount_pct: coerce_price(&text("discount")?),
    })
}

#[async_trait::async_trait]
impl InventoryRepository for SqlInventoryRepository {
    async fn list_inventory(&self) -> Result<Vec<CatalogEntry>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT CAST(description AS TEXT) AS description,
                    CAST(ratings AS TEXT) AS ratings,
                    CAST(cat_no AS TEXT) AS cat_no,
                    CAST(make AS TEXT) AS make,
                    CAST(material_name AS TEXT) AS material_name,
                    CAST(total_quantity AS TEXT) AS total_quantity,
                    CAST(discount AS TEXT) AS discount,
                    CAST(list_price AS TEXT) AS list_price
             FROM inventory
             ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect::<Result<Vec<_>, _>>()
    }
}
