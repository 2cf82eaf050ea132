use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sellpoint_core::config::{ConfigOverrides, LoadOptions};
use toml::Value;

use crate::commands::{config_failure, CommandResult, LoadedConfig};

pub fn run(loaded: &LoadedConfig, options: &LoadOptions) -> CommandResult {
    let config = match loaded {
        Ok(config) => config,
        Err(error) => return config_failure("config", error),
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        if let Some(flag) = override_flag(&options.overrides, key_path) {
            return format!("override ({flag})");
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];

    lines.push(render_line(
        "remote.endpoint",
        &config.remote.endpoint,
        source("remote.endpoint", &["SELLPOINT_REMOTE_ENDPOINT"]),
    ));
    lines.push(render_line(
        "remote.timeout_secs",
        &config.remote.timeout_secs.to_string(),
        source("remote.timeout_secs", &["SELLPOINT_REMOTE_TIMEOUT_SECS"]),
    ));

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());
    lines.push(render_line(
        "catalog.path",
        &catalog_path,
        source("catalog.path", &["SELLPOINT_CATALOG_PATH"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["SELLPOINT_LOGGING_LEVEL", "SELLPOINT_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["SELLPOINT_LOGGING_FORMAT", "SELLPOINT_LOG_FORMAT"]),
    ));

    CommandResult::text(lines.join("\n"))
}

fn override_flag(overrides: &ConfigOverrides, key_path: &str) -> Option<&'static str> {
    let (is_set, flag) = match key_path {
        "remote.endpoint" => (overrides.remote_endpoint.is_some(), "--endpoint"),
        "remote.timeout_secs" => (overrides.remote_timeout_secs.is_some(), "--timeout-secs"),
        "catalog.path" => (overrides.catalog_path.is_some(), "--catalog"),
        "logging.level" => (overrides.log_level.is_some(), "--log-level"),
        _ => (false, ""),
    };
    is_set.then_some(flag)
}

fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    let root = PathBuf::from("sellpoint.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/sellpoint.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
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
