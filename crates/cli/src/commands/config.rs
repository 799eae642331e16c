use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;
use wayfare_core::config::AppConfig;

pub fn run(config: &AppConfig, explicit_path: Option<&Path>) -> String {
    let config_file_path = detect_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line("nlu.host", &config.nlu.host, source("nlu.host", "WAYFARE_NLU_HOST")));
    lines.push(render_line(
        "nlu.app_id",
        if config.nlu.app_id.is_empty() { "<unset>" } else { &config.nlu.app_id },
        source("nlu.app_id", "WAYFARE_NLU_APP_ID"),
    ));

    let api_key = config
        .nlu
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line("nlu.api_key", &api_key, source("nlu.api_key", "WAYFARE_NLU_API_KEY")));

    lines.push(render_line("nlu.slot", &config.nlu.slot, source("nlu.slot", "WAYFARE_NLU_SLOT")));
    lines.push(render_line(
        "nlu.timeout_secs",
        &config.nlu.timeout_secs.to_string(),
        source("nlu.timeout_secs", "WAYFARE_NLU_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "telemetry.enabled",
        &config.telemetry.enabled.to_string(),
        source("telemetry.enabled", "WAYFARE_TELEMETRY_ENABLED"),
    ));
    let instrumentation_key =
        if config.telemetry.instrumentation_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "telemetry.instrumentation_key",
        instrumentation_key,
        source("telemetry.instrumentation_key", "WAYFARE_TELEMETRY_INSTRUMENTATION_KEY"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "WAYFARE_LOG_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "WAYFARE_LOG_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("wayfare.toml"), PathBuf::from("config/wayfare.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.chars().count() < 8 {
        return "<redacted>".to_string();
    }
    let prefix: String = trimmed.chars().take(4).collect();
    format!("{prefix}***")
}
