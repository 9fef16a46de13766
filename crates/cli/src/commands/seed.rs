use crate::commands::{prepare, CommandResult};
use quotation_db::{connect_with_settings, migrations, DemoCatalog, SeedSummary};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
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

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let summary = DemoCatalog::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = DemoCatalog::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 5u8))?;

        pool.close().await;

        let failed_checks = verification
            .checks
            .iter()
            .filter_map(|(check, passed)| (!passed).then_some(*check))
            .collect::<Vec<_>>();
        let outcome: Result<SeedSummary, (&'static str, String, u8)> =
            if verification.all_present {
                Ok(summary)
            } else {
                Err(("seed_verification", verification_failure_message(&failed_checks), 5u8))
            };
        outcome
    });

    match result {
        Ok(summary) => CommandResult::success("seed", summary_message(&summary)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary_message(summary: &SeedSummary) -> String {
    format!(
        "demo catalog ready: {} inventory items, {} customers ({} items and {} customers newly inserted)",
        summary.inventory_total,
        summary.customers_total,
        summary.inventory_inserted,
        summary.customers_inserted
    )
}

fn verification_failure_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}
