pub mod doctor;
pub mod explain;
pub mod overview;
pub mod plans;
pub mod popular;
pub mod profile;
pub mod recommend;
pub mod seed;

use std::path::PathBuf;

use serde::Serialize;

use planwise_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use planwise_core::profile::build_user_profiles;
use planwise_core::recommend::RecommendationEngine;
use planwise_data::{Dataset, DatasetPaths};

/// Exit code for configuration load or validation failures.
pub(crate) const EXIT_CONFIG: u8 = 2;
/// Exit code for dataset load failures (missing or malformed files).
pub(crate) const EXIT_DATA: u8 = 3;
/// Exit code when a command requires an identifier that does not exist.
pub(crate) const EXIT_UNKNOWN_ID: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn with_data(
        command: &str,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Immutable per-invocation snapshot shared by the query commands.
pub(crate) struct EngineContext {
    pub config: AppConfig,
    pub dataset: Dataset,
    pub engine: RecommendationEngine,
}

pub(crate) fn overrides_for(data_dir: Option<PathBuf>) -> ConfigOverrides {
    ConfigOverrides { data_dir, ..ConfigOverrides::default() }
}

pub(crate) fn load_config(
    command: &str,
    data_dir: Option<PathBuf>,
) -> Result<AppConfig, CommandResult> {
    let options =
        LoadOptions { overrides: overrides_for(data_dir), ..LoadOptions::default() };
    match AppConfig::load(options) {
        Ok(config) => {
            init_logging(&config);
            Ok(config)
        }
        Err(error) => Err(CommandResult::failure(
            command,
            "config_validation",
            error.to_string(),
            EXIT_CONFIG,
        )),
    }
}

/// Load config and dataset, then build the engine snapshot. Every failure
/// maps to a structured command result.
pub(crate) fn load_context(
    command: &str,
    data_dir: Option<PathBuf>,
) -> Result<EngineContext, CommandResult> {
    let config = load_config(command, data_dir)?;

    let paths = DatasetPaths::from_config(&config.data);
    let dataset = match Dataset::load(&paths) {
        Ok(dataset) => dataset,
        Err(error) => {
            return Err(CommandResult::failure(
                command,
                "data_load",
                error.to_string(),
                EXIT_DATA,
            ))
        }
    };

    let profiles = build_user_profiles(&dataset.users, &dataset.subscriptions, &dataset.plans);
    let engine = RecommendationEngine::new(&dataset.plans, &dataset.subscriptions, &profiles);

    tracing::info!(
        users = dataset.users.len(),
        subscriptions = dataset.subscriptions.len(),
        plans = dataset.plans.len(),
        "dataset loaded and engine built"
    );

    Ok(EngineContext { config, dataset, engine })
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // try_init: commands run back to back inside one test process.
    let _ = match config.logging.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
}
