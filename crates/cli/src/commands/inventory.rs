use quotation_core::domain::product::CatalogEntry;
use quotation_core::export::format_money;
use quotation_db::{connect_with_settings, SqlCatalogLookup};

use crate::commands::{prepare, CommandResult};

pub fn run(json_output: bool) -> CommandResult {
    let (config, runtime) = match prepare("inventory") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let lookup =
            SqlCatalogLookup::from_pool(pool.clone(), config.quotation.customer_suggestion_limit);
        let outcome = lookup.list_inventory().await;
        pool.close().await;

        let entries: Result<Vec<CatalogEntry>, (&'static str, String, u8)> =
            match outcome.failure {
                Some(failure) => Err(("catalog_lookup", failure, 4u8)),
                None => Ok(outcome.value),
            };
        entries
    });

    let entries = match result {
        Ok(entries) => entries,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("inventory", error_class, message, exit_code);
        }
    };

    if json_output {
        return match serde_json::to_string_pretty(&entries) {
            Ok(rendered) => CommandResult::raw(rendered),
            Err(error) => CommandResult::failure("inventory", "serialization", error.to_string(), 3),
        };
    }

    CommandResult::success("inventory", render_listing(&entries))
}

fn render_listing(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "Inventory empty.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{} | {} | {} | {} | stock {} | list {} | discount {}%",
                entry.description,
                entry.ratings,
                entry.catalog_number,
                entry.make,
                entry.available_stock,
                format_money(entry.unit_list_price),
                entry.discount_pct.normalize()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use quotation_core::domain::product::CatalogEntry;
    use rust_decimal::Decimal;

    use super::render_listing;

    #[test]
    fn listing_shows_one_line_per_entry() {
        let mut bulb = CatalogEntry::new("LED Bulb", Decimal::new(10, 0)).with_stock(120);
        bulb.catalog_number = "LB-9".to_string();
        bulb.discount_pct = Decimal::new(50, 1);

        assert_eq!(
            render_listing(&[bulb]),
            "LED Bulb |  | LB-9 |  | stock 120 | list 10.00 | discount 5%"
        );
        assert_eq!(render_listing(&[]), "Inventory empty.");
    }
}
