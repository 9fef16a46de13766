use sqlx::Row;

use quotation_core::domain::customer::CustomerDetails;

use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Turns user input into a literal `LIKE` prefix pattern.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<CustomerDetails, RepositoryError> {
    let name: String =
        row.try_get("customer_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let phone: Option<String> =
        row.try_get("phone_no").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let address: Option<String> =
        row.try_get("address").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(CustomerDetails {
        name,
        phone: phone.unwrap_or_default(),
        address: address.unwrap_or_default(),
    })
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn find_names_by_prefix(
        &self,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT customer_name FROM customers
             WHERE customer_name LIKE ? ESCAPE '\\'
             ORDER BY customer_name ASC
             LIMIT ?",
        )
        .bind(prefix_pattern(prefix))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("customer_name")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CustomerDetails>, RepositoryError> {
        let row = sqlx::query(
            "SELECT customer_name,
                    CAST(phone_no AS TEXT) AS phone_no,
                    CAST(address AS TEXT) AS address
             FROM customers WHERE customer_name = ?
             LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_customer(r)?)),
            None => Ok(None),
        }
    }
}
