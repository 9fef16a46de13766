use std::path::Path;

use quotation_core::config::{AppConfig, LoadOptions};
use quotation_db::{connect_with_settings, migrations};
use serde::Serialize;
use tempfile::NamedTempFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_export_dir(&config));
            checks.push(check_catalog_schema(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["export_dir_writable", "catalog_schema"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Writes and removes a scratch file where exports will land. A directory
/// that does not exist yet is judged by its nearest existing ancestor, since
/// the first export creates it; nothing is created here.
fn check_export_dir(config: &AppConfig) -> DoctorCheck {
    let dir = &config.quotation.export_dir;
    let Some(existing) = nearest_existing(dir) else {
        return DoctorCheck {
            name: "export_dir_writable",
            status: CheckStatus::Fail,
            details: format!("`{}` has no existing parent directory", dir.display()),
        };
    };

    if !existing.is_dir() {
        return DoctorCheck {
            name: "export_dir_writable",
            status: CheckStatus::Fail,
            details: format!("`{}` is not a directory", existing.display()),
        };
    }

    let written = NamedTempFile::new_in(existing).and_then(NamedTempFile::close);
    match written {
        Ok(()) if existing == dir.as_path() => DoctorCheck {
            name: "export_dir_writable",
            status: CheckStatus::Pass,
            details: format!("exports go to `{}`", dir.display()),
        },
        Ok(()) => DoctorCheck {
            name: "export_dir_writable",
            status: CheckStatus::Pass,
            details: format!(
                "exports go to `{}`; it will be created under `{}` on first export",
                dir.display(),
                existing.display()
            ),
        },
        Err(error) => DoctorCheck {
            name: "export_dir_writable",
            status: CheckStatus::Fail,
            details: format!("`{}` is not writable: {error}", existing.display()),
        },
    }
}

fn nearest_existing(dir: &Path) -> Option<&Path> {
    dir.ancestors()
        .map(|ancestor| if ancestor.as_os_str().is_empty() { Path::new(".") } else { ancestor })
        .find(|ancestor| ancestor.exists())
}

/// Connects and reports whether the catalog tables are migrated; nothing is
/// applied here.
fn check_catalog_schema(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "catalog_schema",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

        let present = migrations::catalog_tables_present(&pool).await;
        pool.close().await;
        present.map_err(|error| format!("failed to inspect schema: {error}"))
    });

    match result {
        Ok(true) => DoctorCheck {
            name: "catalog_schema",
            status: CheckStatus::Pass,
            details: format!(
                "connected using `{}`; {} migrations known",
                config.database.url,
                migrations::MIGRATOR.iter().count()
            ),
        },
        Ok(false) => DoctorCheck {
            name: "catalog_schema",
            status: CheckStatus::Fail,
            details: "catalog tables missing; run `quotation migrate`".to_string(),
        },
        Err(error) => {
            DoctorCheck { name: "catalog_schema", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
