use sellpoint_core::config::AppConfig;
use sellpoint_core::ProductCatalog;
use sellpoint_remote::HttpInsightClient;
use serde::Serialize;

use crate::commands::{CommandResult, LoadedConfig, EXIT_CONFIG, EXIT_RUNTIME};

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

pub fn run(loaded: &LoadedConfig, json_output: bool) -> CommandResult {
    let report = build_report(loaded);
    let exit_code = match (report.overall_status, loaded) {
        (CheckStatus::Pass, _) => 0,
        (_, Err(_)) => EXIT_CONFIG,
        (_, Ok(_)) => EXIT_RUNTIME,
    };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(loaded: &LoadedConfig) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(config));
            checks.push(check_insight_client(config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_load", "insight_client"] {
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

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    let (source, result) = match &config.catalog.path {
        Some(path) => (path.display().to_string(), ProductCatalog::load(path)),
        None => ("builtin".to_string(), Ok(ProductCatalog::builtin())),
    };

    match result {
        Ok(catalog) => {
            let manufacturers = catalog.list_manufacturers();
            let products: usize = manufacturers
                .iter()
                .filter_map(|manufacturer| catalog.list_products(manufacturer).ok())
                .map(<[_]>::len)
                .sum();
            DoctorCheck {
                name: "catalog_load",
                status: CheckStatus::Pass,
                details: format!(
                    "{} manufacturers and {products} products loaded from {source}",
                    manufacturers.len()
                ),
            }
        }
        Err(error) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: format!("failed to load catalog from {source}: {error}"),
        },
    }
}

fn check_insight_client(config: &AppConfig) -> DoctorCheck {
    match HttpInsightClient::from_config(&config.remote) {
        Ok(client) => DoctorCheck {
            name: "insight_client",
            status: CheckStatus::Pass,
            details: format!(
                "proxy `{}` with {}s timeout; local fallback covers remote failures",
                client.endpoint(),
                config.remote.timeout_secs
            ),
        },
        Err(error) => {
            DoctorCheck { name: "insight_client", status: CheckStatus::Fail, details: error.to_string() }
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
