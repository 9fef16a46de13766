use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Demo catalog used by `quotation seed` and by integration tests.
const SEED_INVENTORY: &[SeedInventoryItem] = &[
    SeedInventoryItem {
        description: "LED Bulb",
        ratings: "9W",
        cat_no: "LB-9",
        make: "Lumo",
        material_name: "Glass",
        total_quantity: 120,
        discount: "5",
        list_price: "10.00",
    },
    SeedInventoryItem {
        description: "Modular Switch",
        ratings: "6A",
        cat_no: "SW-6",
        make: "Gridline",
        material_name: "Polycarbonate",
        total_quantity: 400,
        discount: "8",
        list_price: "4.50",
    },
    SeedInventoryItem {
        description: "MCB Single Pole",
        ratings: "16A",
        cat_no: "MCB-16",
        make: "Voltara",
        material_name: "Thermoplastic",
        total_quantity: 60,
        discount: "12",
        list_price: "215.00",
    },
    SeedInventoryItem {
        description: "Copper Cable 2.5 sq mm",
        ratings: "1100V",
        cat_no: "CU-25",
        make: "Voltara",
        material_name: "Copper",
        total_quantity: 35,
        discount: "0",
        list_price: "1890.00",
    },
    SeedInventoryItem {
        description: "Panel Light",
        ratings: "18W",
        cat_no: "PL-18",
        make: "Lumo",
        material_name: "Aluminium",
        total_quantity: 24,
        discount: "10",
        list_price: "649.00",
    },
];

const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        name: "Acme Builders",
        phone: "555-0101",
        address: "12 Foundry Lane, Pune",
    },
    SeedCustomer {
        name: "Acorn Interiors",
        phone: "555-0102",
        address: "4 Market Street, Nashik",
    },
    SeedCustomer {
        name: "Zenith Power",
        phone: "555-0199",
        address: "88 Ring Road, Nagpur",
    },
];

/// Loads and verifies the demo catalog. Loading twice leaves a single copy.
pub struct DemoCatalog;

impl DemoCatalog {
    pub async fn load(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
        let mut tx = pool.begin().await?;
        let mut inventory_inserted = 0;
        let mut customers_inserted = 0;

        for item in SEED_INVENTORY {
            let result = sqlx::query(
                "INSERT INTO inventory
                    (description, ratings, cat_no, make, material_name,
                     total_quantity, discount, list_price, total)
                 SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL
                 WHERE NOT EXISTS (SELECT 1 FROM inventory WHERE cat_no = ?3)",
            )
            .bind(item.description)
            .bind(item.ratings)
            .bind(item.cat_no)
            .bind(item.make)
            .bind(item.material_name)
            .bind(item.total_quantity)
            .bind(item.discount)
            .bind(item.list_price)
            .execute(&mut *tx)
            .await?;
            inventory_inserted += result.rows_affected();
        }

        for customer in SEED_CUSTOMERS {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO customers (customer_name, phone_no, address)
                 VALUES (?1, ?2, ?3)",
            )
            .bind(customer.name)
            .bind(customer.phone)
            .bind(customer.address)
            .execute(&mut *tx)
            .await?;
            customers_inserted += result.rows_affected();
        }

        tx.commit().await?;

        Ok(SeedSummary {
            inventory_inserted,
            customers_inserted,
            inventory_total: SEED_INVENTORY.len(),
            customers_total: SEED_CUSTOMERS.len(),
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<SeedVerification, RepositoryError> {
        let mut checks = Vec::new();

        for item in SEED_INVENTORY {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM inventory WHERE cat_no = ?1 AND description = ?2)",
            )
            .bind(item.cat_no)
            .bind(item.description)
            .fetch_one(pool)
            .await?;
            checks.push((item.cat_no, present == 1));
        }

        for customer in SEED_CUSTOMERS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE customer_name = ?1)",
            )
            .bind(customer.name)
            .fetch_one(pool)
            .await?;
            checks.push((customer.name, present == 1));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(SeedVerification { all_present, checks })
    }

    /// Removes only the demo rows; anything else in the catalog stays.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        for item in SEED_INVENTORY {
            sqlx::query("DELETE FROM inventory WHERE cat_no = ?1")
                .bind(item.cat_no)
                .execute(&mut *tx)
                .await?;
        }
        for customer in SEED_CUSTOMERS {
            sqlx::query("DELETE FROM customers WHERE customer_name = ?1")
                .bind(customer.name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedInventoryItem {
    description: &'static str,
    ratings: &'static str,
    cat_no: &'static str,
    make: &'static str,
    material_name: &'static str,
    total_quantity: i64,
    discount: &'static str,
    list_price: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct SeedCustomer {
    name: &'static str,
    phone: &'static str,
    address: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inventory_inserted: u64,
    pub customers_inserted: u64,
    pub inventory_total: usize,
    pub customers_total: usize,
}

#[derive(Debug)]
pub struct SeedVerification {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        CustomerRepository, InventoryRepository, SqlCustomerRepository, SqlInventoryRepository,
    };
    use crate::{connect_with_settings, migrations};

    async fn migrated_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let pool = migrated_pool().await;

        let first = DemoCatalog::load(&pool).await.expect("first load");
        assert_eq!(first.inventory_inserted, SEED_INVENTORY.len() as u64);
        assert_eq!(first.customers_inserted, SEED_CUSTOMERS.len() as u64);

        let second = DemoCatalog::load(&pool).await.expect("second load");
        assert_eq!(second.inventory_inserted, 0);
        assert_eq!(second.customers_inserted, 0);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM inventory")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, SEED_INVENTORY.len() as i64);

        pool.close().await;
    }

    #[tokio::test]
    async fn seeded_rows_are_readable_through_repositories() {
        let pool = migrated_pool().await;
        DemoCatalog::load(&pool).await.expect("load");

        let verification = DemoCatalog::verify(&pool).await.expect("verify");
        assert!(verification.all_present, "checks: {:?}", verification.checks);

        let inventory =
            SqlInventoryRepository::new(pool.clone()).list_inventory().await.expect("list");
        assert_eq!(inventory[0].description, "LED Bulb");
        assert_eq!(inventory[0].available_stock, 120);

        let names = SqlCustomerRepository::new(pool.clone())
            .find_names_by_prefix("Ac", 10)
            .await
            .expect("search");
        assert_eq!(names, vec!["Acme Builders".to_string(), "Acorn Interiors".to_string()]);

        pool.close().await;
    }

    #[tokio::test]
    async fn clean_removes_demo_rows() {
        let pool = migrated_pool().await;
        DemoCatalog::load(&pool).await.expect("load");
        DemoCatalog::clean(&pool).await.expect("clean");

        let verification = DemoCatalog::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);
        assert!(verification.checks.iter().all(|(_, present)| !present));

        pool.close().await;
    }
}
