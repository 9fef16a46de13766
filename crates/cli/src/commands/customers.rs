use quotation_core::config::AppConfig;
use quotation_db::{connect_with_settings, DbPool, SqlCatalogLookup};

use crate::commands::{prepare, CommandResult};

/// `customers <prefix>`: autocomplete suggestions, one name per line.
pub fn search(prefix: &str) -> CommandResult {
    let (config, runtime) = match prepare("customers") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let lookup =
            SqlCatalogLookup::from_pool(pool.clone(), config.quotation.customer_suggestion_limit);
        let outcome = lookup.find_customers_by_prefix(prefix).await;
        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(outcome)
    });

    match result {
        Ok(outcome) => match outcome.failure {
            Some(failure) => CommandResult::failure("customers", "catalog_lookup", failure, 4),
            None if outcome.value.is_empty() => {
                CommandResult::success("customers", format!("no customers start with `{prefix}`"))
            }
            None => CommandResult::success("customers", outcome.value.join("\n")),
        },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("customers", error_class, message, exit_code)
        }
    }
}

/// `customer <name>`: contact details used to prefill the form.
pub fn details(name: &str) -> CommandResult {
    let (config, runtime) = match prepare("customer") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let lookup =
            SqlCatalogLookup::from_pool(pool.clone(), config.quotation.customer_suggestion_limit);
        let outcome = lookup.customer_details(name).await;
        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(outcome)
    });

    let outcome = match result {
        Ok(outcome) => outcome,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("customer", error_class, message, exit_code);
        }
    };

    if let Some(failure) = outcome.failure {
        return CommandResult::failure("customer", "catalog_lookup", failure, 4);
    }
    match outcome.value {
        Some(customer) => CommandResult::success(
            "customer",
            format!("{}\nphone: {}\naddress: {}", customer.name, customer.phone, customer.address),
        ),
        None => CommandResult::success("customer", format!("no saved details for `{name}`")),
    }
}

async fn open_pool(config: &AppConfig) -> Result<DbPool, (&'static str, String, u8)> {
    connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), 4u8))
}
