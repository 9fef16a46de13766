use std::env;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use quotation_cli::commands::{config, customers, doctor, inventory, migrate, seed, session};
use serde_json::Value;

#[test]
fn migrate_returns_success_with_valid_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    with_env(&[("QUOTATION_DATABASE_URL", &url)], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("QUOTATION_DATABASE_URL", "postgres://localhost/quotation")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    with_env(&[("QUOTATION_DATABASE_URL", &url)], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");
        let first_message = first_payload["message"].as_str().unwrap_or_default();
        assert!(first_message.contains("5 inventory items, 3 customers"));
        assert!(first_message.contains("(5 items and 3 customers newly inserted)"));

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        let second_message = second_payload["message"].as_str().unwrap_or_default();
        assert!(second_message.contains("(0 items and 0 customers newly inserted)"));
    });
}

#[test]
fn inventory_json_lists_seeded_catalog_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    with_env(&[("QUOTATION_DATABASE_URL", &url)], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = inventory::run(true);
        assert_eq!(result.exit_code, 0);

        let entries = parse_payload(&result.output);
        let entries = entries.as_array().expect("inventory should be a JSON array");
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0]["description"], "LED Bulb");
        assert_eq!(entries[0]["catalog_number"], "LB-9");
        assert_eq!(entries[0]["available_stock"], 120);
        assert_eq!(entries[1]["description"], "Modular Switch");
    });
}

#[test]
fn inventory_reports_lookup_failure_on_unmigrated_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    with_env(&[("QUOTATION_DATABASE_URL", &url)], || {
        let result = inventory::run(false);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "inventory");
        assert_eq!(payload["error_class"], "catalog_lookup");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.starts_with("Error fetching inventory"));
    });
}

#[test]
fn customer_lookups_use_prefix_and_exact_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    with_env(&[("QUOTATION_DATABASE_URL", &url)], || {
        assert_eq!(seed::run().exit_code, 0);

        let search = parse_payload(&customers::search("Ac").output);
        assert_eq!(search["status"], "ok");
        assert_eq!(search["message"], "Acme Builders\nAcorn Interiors");

        let none = parse_payload(&customers::search("Q").output);
        assert_eq!(none["message"], "no customers start with `Q`");

        let details = parse_payload(&customers::details("Zenith Power").output);
        let message = details["message"].as_str().unwrap_or_default();
        assert!(message.contains("phone: 555-0199"));
        assert!(message.contains("address: 88 Ring Road, Nagpur"));
    });
}

#[test]
fn scripted_session_builds_and_exports_a_quotation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    let export_dir = dir.path().join("exports");
    let export_dir_value = export_dir.display().to_string();
    with_env(
        &[("QUOTATION_DATABASE_URL", &url), ("QUOTATION_EXPORT_DIR", &export_dir_value)],
        || {
            assert_eq!(seed::run().exit_code, 0);

            let script = "\
customer Acme
pick 0
number QT/2026/001
section Lighting
product LED Bulb
qty 1 3
show
export
quit
product Panel Light
";
            let mut transcript = Vec::new();
            let result = session::run_with_io(Cursor::new(script), &mut transcript, true);
            let transcript = String::from_utf8(transcript).expect("utf8 transcript");

            assert_eq!(result.exit_code, 0, "session failed: {}", result.output);
            assert!(transcript.contains("Customer: Acme Builders"));
            assert!(transcript.contains("0      | SECTION | --- LIGHTING ---"));
            assert!(transcript.contains("Grand Total: ₹ 30.00"));

            let exported = export_dir.join("quotation_QT-2026-001.csv");
            let csv = std::fs::read_to_string(&exported).expect("export written");
            let mut lines = csv.lines();
            assert_eq!(
                lines.next(),
                Some("Type,Description,Ratings,Cat No,Make,MaterialName,Qty,TotalQuantity,ListPrice,LP Gross Price")
            );
            assert_eq!(lines.next(), Some("SECTION,--- LIGHTING ---,,,,,,,,"));
            assert_eq!(lines.next(), Some("PRODUCT,LED Bulb,9W,LB-9,Lumo,Glass,3,120,10.00,30.00"));
            assert_eq!(lines.next(), None);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "session");
            let message = payload["message"].as_str().unwrap_or_default();
            assert!(message.contains("1 products, 1 sections"));
            assert!(message.contains("grand total ₹ 30.00"));
        },
    );
}

#[test]
fn doctor_passes_once_catalog_is_migrated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = database_url(dir.path());
    let export_dir = dir.path().join("exports").display().to_string();
    with_env(&[("QUOTATION_DATABASE_URL", &url), ("QUOTATION_EXPORT_DIR", &export_dir)], || {
        let before = parse_payload(&doctor::run(true));
        assert_eq!(before["overall_status"], "fail");

        assert_eq!(migrate::run().exit_code, 0);

        let after = parse_payload(&doctor::run(true));
        assert_eq!(after["overall_status"], "pass", "report: {after}");
        let checks = after["checks"].as_array().expect("checks array");
        assert_eq!(checks.len(), 3);
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_is_invalid() {
    with_env(&[("QUOTATION_CUSTOMER_SUGGESTION_LIMIT", "0")], || {
        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "fail");

        let checks = report["checks"].as_array().expect("checks array");
        assert_eq!(checks[0]["name"], "config_validation");
        assert_eq!(checks[0]["status"], "fail");
        assert!(checks[1..].iter().all(|check| check["status"] == "skipped"));
    });
}

#[test]
fn config_attributes_values_to_their_source() {
    with_env(&[("QUOTATION_CURRENCY_SYMBOL", "$"), ("QUOTATION_LOG_LEVEL", "debug")], || {
        let output = config::run();
        assert!(output.contains(
            "- quotation.currency_symbol = $ (source: env (QUOTATION_CURRENCY_SYMBOL))"
        ));
        assert!(output.contains("- logging.level = debug (source: env (QUOTATION_LOG_LEVEL))"));
        assert!(output.contains("- database.url = sqlite://quotation.db (source: default)"));
    });
}

fn database_url(dir: &Path) -> String {
    format!("sqlite://{}", dir.join("quotation.db").display())
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "QUOTATION_DATABASE_URL",
        "QUOTATION_DATABASE_MAX_CONNECTIONS",
        "QUOTATION_DATABASE_TIMEOUT_SECS",
        "QUOTATION_CURRENCY_SYMBOL",
        "QUOTATION_EXPORT_DIR",
        "QUOTATION_CUSTOMER_SUGGESTION_LIMIT",
        "QUOTATION_LOGGING_LEVEL",
        "QUOTATION_LOGGING_FORMAT",
        "QUOTATION_LOG_LEVEL",
        "QUOTATION_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
