use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommend::DEFAULT_TOP_N;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data: DataConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Where the five CSV exports live and what they are called.
#[derive(Clone, Debug)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub users_file: String,
    pub subscriptions_file: String,
    pub plans_file: String,
    pub billing_file: String,
    pub logs_file: String,
}

impl DataConfig {
    pub fn users_path(&self) -> PathBuf {
        self.dir.join(&self.users_file)
    }

    pub fn subscriptions_path(&self) -> PathBuf {
        self.dir.join(&self.subscriptions_file)
    }

    pub fn plans_path(&self) -> PathBuf {
        self.dir.join(&self.plans_file)
    }

    pub fn billing_path(&self) -> PathBuf {
        self.dir.join(&self.billing_file)
    }

    pub fn logs_path(&self) -> PathBuf {
        self.dir.join(&self.logs_file)
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub default_top_n: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub default_top_n: Option<usize>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                dir: PathBuf::from("data"),
                users_file: "User_Data.csv".to_string(),
                subscriptions_file: "Subscriptions.csv".to_string(),
                plans_file: "Subscription_Plans.csv".to_string(),
                billing_file: "Billing_Information.csv".to_string(),
                logs_file: "Subscription_Logs.csv".to_string(),
            },
            engine: EngineConfig { default_top_n: DEFAULT_TOP_N },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Load with defaults < file < environment < explicit overrides
    /// precedence, then validate.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("planwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data) = patch.data {
            if let Some(dir) = data.dir {
                self.data.dir = PathBuf::from(dir);
            }
            if let Some(users_file) = data.users_file {
                self.data.users_file = users_file;
            }
            if let Some(subscriptions_file) = data.subscriptions_file {
                self.data.subscriptions_file = subscriptions_file;
            }
            if let Some(plans_file) = data.plans_file {
                self.data.plans_file = plans_file;
            }
            if let Some(billing_file) = data.billing_file {
                self.data.billing_file = billing_file;
            }
            if let Some(logs_file) = data.logs_file {
                self.data.logs_file = logs_file;
            }
        }

        if let Some(engine) = patch.engine {
            if let Some(default_top_n) = engine.default_top_n {
                self.engine.default_top_n = default_top_n;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PLANWISE_DATA_DIR") {
            self.data.dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("PLANWISE_DATA_USERS_FILE") {
            self.data.users_file = value;
        }
        if let Some(value) = read_env("PLANWISE_DATA_SUBSCRIPTIONS_FILE") {
            self.data.subscriptions_file = value;
        }
        if let Some(value) = read_env("PLANWISE_DATA_PLANS_FILE") {
            self.data.plans_file = value;
        }
        if let Some(value) = read_env("PLANWISE_DATA_BILLING_FILE") {
            self.data.billing_file = value;
        }
        if let Some(value) = read_env("PLANWISE_DATA_LOGS_FILE") {
            self.data.logs_file = value;
        }

        if let Some(value) = read_env("PLANWISE_ENGINE_DEFAULT_TOP_N") {
            self.engine.default_top_n = parse_usize("PLANWISE_ENGINE_DEFAULT_TOP_N", &value)?;
        }

        let log_level =
            read_env("PLANWISE_LOGGING_LEVEL").or_else(|| read_env("PLANWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PLANWISE_LOGGING_FORMAT").or_else(|| read_env("PLANWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.data.dir = data_dir;
        }
        if let Some(default_top_n) = overrides.default_top_n {
            self.engine.default_top_n = default_top_n;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("data.dir must not be empty".to_string()));
        }

        for (key, value) in [
            ("data.users_file", &self.data.users_file),
            ("data.subscriptions_file", &self.data.subscriptions_file),
            ("data.plans_file", &self.data.plans_file),
            ("data.billing_file", &self.data.billing_file),
            ("data.logs_file", &self.data.logs_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }

        if self.engine.default_top_n == 0 {
            return Err(ConfigError::Validation(
                "engine.default_top_n must be greater than zero".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("planwise.toml"), PathBuf::from("config/planwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data: Option<DataPatch>,
    engine: Option<EnginePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    dir: Option<String>,
    users_file: Option<String>,
    subscriptions_file: Option<String>,
    plans_file: Option<String>,
    billing_file: Option<String>,
    logs_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    default_top_n: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
