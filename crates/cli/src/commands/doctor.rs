use std::path::PathBuf;

use serde::Serialize;

use planwise_core::config::{AppConfig, LoadOptions};
use planwise_core::profile::build_user_profiles;
use planwise_core::recommend::RecommendationEngine;
use planwise_data::{Dataset, DatasetPaths};

use super::overrides_for;

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

pub fn run(data_dir: Option<PathBuf>, json_output: bool) -> String {
    let report = build_report(data_dir);

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

fn build_report(data_dir: Option<PathBuf>) -> DoctorReport {
    let mut checks = Vec::new();

    let options =
        LoadOptions { overrides: overrides_for(data_dir), ..LoadOptions::default() };
    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });

            let paths = DatasetPaths::from_config(&config.data);
            checks.push(check_data_files(&paths));

            match Dataset::load(&paths) {
                Ok(dataset) => {
                    checks.push(DoctorCheck {
                        name: "dataset_load",
                        status: CheckStatus::Pass,
                        details: format!(
                            "{} users, {} subscriptions, {} plans, {} billing rows, {} log rows",
                            dataset.users.len(),
                            dataset.subscriptions.len(),
                            dataset.plans.len(),
                            dataset.billing.len(),
                            dataset.logs.len()
                        ),
                    });
                    checks.push(check_engine(&dataset));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "dataset_load",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(DoctorCheck {
                        name: "engine_readiness",
                        status: CheckStatus::Skipped,
                        details: "skipped because the dataset did not load".to_string(),
                    });
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["data_files", "dataset_load", "engine_readiness"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks
        .iter()
        .all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_data_files(paths: &DatasetPaths) -> DoctorCheck {
    let missing = paths.missing();
    if missing.is_empty() {
        DoctorCheck {
            name: "data_files",
            status: CheckStatus::Pass,
            details: "all five input files are present".to_string(),
        }
    } else {
        let listed: Vec<String> =
            missing.iter().map(|path| format!("`{}`", path.display())).collect();
        DoctorCheck {
            name: "data_files",
            status: CheckStatus::Fail,
            details: format!("missing input files: {}", listed.join(", ")),
        }
    }
}

fn check_engine(dataset: &Dataset) -> DoctorCheck {
    let profiles = build_user_profiles(&dataset.users, &dataset.subscriptions, &dataset.plans);
    let engine = RecommendationEngine::new(&dataset.plans, &dataset.subscriptions, &profiles);
    let matrix = engine.interaction_matrix();

    let collaborative = if matrix.user_count() < 2 {
        "collaborative scoring degraded (fewer than 2 rated users)"
    } else {
        "collaborative scoring available"
    };

    DoctorCheck {
        name: "engine_readiness",
        status: CheckStatus::Pass,
        details: format!(
            "{} profiles, {}x{} interaction matrix; {collaborative}",
            profiles.len(),
            matrix.user_count(),
            matrix.plan_count()
        ),
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
