use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub nlu: NluConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct NluConfig {
    /// Prediction endpoint host, e.g. "westeurope.api.cognitive.microsoft.com".
    pub host: String,
    pub app_id: String,
    pub api_key: Option<SecretString>,
    pub slot: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub instrumentation_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub nlu_host: Option<String>,
    pub nlu_app_id: Option<String>,
    pub nlu_api_key: Option<String>,
    pub log_level: Option<String>,
    pub telemetry_enabled: Option<bool>,
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
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nlu: NluConfig {
                host: "westeurope.api.cognitive.microsoft.com".to_string(),
                app_id: String::new(),
                api_key: None,
                slot: "production".to_string(),
                timeout_secs: 10,
            },
            telemetry: TelemetryConfig { enabled: false, instrumentation_key: None },
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

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    nlu: Option<NluPatch>,
    telemetry: Option<TelemetryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct NluPatch {
    host: Option<String>,
    app_id: Option<String>,
    api_key: Option<String>,
    slot: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TelemetryPatch {
    enabled: Option<bool>,
    instrumentation_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("wayfare.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(nlu) = patch.nlu {
            if let Some(host) = nlu.host {
                self.nlu.host = host;
            }
            if let Some(app_id) = nlu.app_id {
                self.nlu.app_id = app_id;
            }
            if let Some(api_key) = nlu.api_key {
                self.nlu.api_key = Some(api_key.into());
            }
            if let Some(slot) = nlu.slot {
                self.nlu.slot = slot;
            }
            if let Some(timeout_secs) = nlu.timeout_secs {
                self.nlu.timeout_secs = timeout_secs;
            }
        }

        if let Some(telemetry) = patch.telemetry {
            if let Some(enabled) = telemetry.enabled {
                self.telemetry.enabled = enabled;
            }
            if let Some(instrumentation_key) = telemetry.instrumentation_key {
                self.telemetry.instrumentation_key = Some(instrumentation_key.into());
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
        if let Some(value) = read_env("WAYFARE_NLU_HOST") {
            self.nlu.host = value;
        }
        if let Some(value) = read_env("WAYFARE_NLU_APP_ID") {
            self.nlu.app_id = value;
        }
        if let Some(value) = read_env("WAYFARE_NLU_API_KEY") {
            self.nlu.api_key = Some(value.into());
        }
        if let Some(value) = read_env("WAYFARE_NLU_SLOT") {
            self.nlu.slot = value;
        }
        if let Some(value) = read_env("WAYFARE_NLU_TIMEOUT_SECS") {
            self.nlu.timeout_secs = parse_u64("WAYFARE_NLU_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("WAYFARE_TELEMETRY_ENABLED") {
            self.telemetry.enabled = parse_bool("WAYFARE_TELEMETRY_ENABLED", &value)?;
        }
        if let Some(value) = read_env("WAYFARE_TELEMETRY_INSTRUMENTATION_KEY") {
            self.telemetry.instrumentation_key = Some(value.into());
        }

        if let Some(value) = read_env("WAYFARE_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("WAYFARE_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.nlu_host {
            self.nlu.host = host;
        }
        if let Some(app_id) = overrides.nlu_app_id {
            self.nlu.app_id = app_id;
        }
        if let Some(api_key) = overrides.nlu_api_key {
            self.nlu.api_key = Some(api_key.into());
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(enabled) = overrides.telemetry_enabled {
            self.telemetry.enabled = enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nlu.host.trim().is_empty() {
            return Err(ConfigError::Validation("nlu.host must not be empty".to_string()));
        }
        if self.nlu.timeout_secs == 0 {
            return Err(ConfigError::Validation("nlu.timeout_secs must be positive".to_string()));
        }
        if self.telemetry.enabled && self.telemetry.instrumentation_key.is_none() {
            return Err(ConfigError::Validation(
                "telemetry.instrumentation_key is required when telemetry is enabled".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("wayfare.toml"), PathBuf::from("config/wayfare.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
