use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://get-note-proxy.891646025.workers.dev";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

/// Insight proxy settings. The proxy injects service credentials server-side,
/// so no API key is ever configured here.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
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
    pub remote_endpoint: Option<String>,
    pub remote_timeout_secs: Option<u64>,
    pub catalog_path: Option<PathBuf>,
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
            remote: RemoteConfig {
                endpoint: DEFAULT_REMOTE_ENDPOINT.to_string(),
                timeout_secs: 15,
            },
            catalog: CatalogConfig::default(),
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
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("sellpoint.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(remote) = patch.remote {
            if let Some(endpoint) = remote.endpoint {
                self.remote.endpoint = endpoint;
            }
            if let Some(timeout_secs) = remote.timeout_secs {
                self.remote.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
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
        if let Some(value) = read_env("SELLPOINT_REMOTE_ENDPOINT") {
            self.remote.endpoint = value;
        }
        if let Some(value) = read_env("SELLPOINT_REMOTE_TIMEOUT_SECS") {
            self.remote.timeout_secs = parse_u64("SELLPOINT_REMOTE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SELLPOINT_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("SELLPOINT_LOGGING_LEVEL").or_else(|| read_env("SELLPOINT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SELLPOINT_LOGGING_FORMAT").or_else(|| read_env("SELLPOINT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.remote_endpoint {
            self.remote.endpoint = endpoint;
        }
        if let Some(timeout_secs) = overrides.remote_timeout_secs {
            self.remote.timeout_secs = timeout_secs;
        }
        if let Some(path) = overrides.catalog_path {
            self.catalog.path = Some(path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_remote(&self.remote)?;
        validate_catalog(&self.catalog)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("sellpoint.toml"), PathBuf::from("config/sellpoint.toml")]
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

fn validate_remote(remote: &RemoteConfig) -> Result<(), ConfigError> {
    let endpoint = remote.endpoint.trim();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(
            "remote.endpoint must start with http:// or https://".to_string(),
        ));
    }

    if remote.timeout_secs == 0 || remote.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "remote.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if let Some(path) = &catalog.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    remote: Option<RemotePatch>,
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RemotePatch {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, DEFAULT_REMOTE_ENDPOINT,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const ENV_KEYS: &[&str] = &[
        "SELLPOINT_REMOTE_ENDPOINT",
        "SELLPOINT_REMOTE_TIMEOUT_SECS",
        "SELLPOINT_CATALOG_PATH",
        "SELLPOINT_LOGGING_LEVEL",
        "SELLPOINT_LOGGING_FORMAT",
        "SELLPOINT_LOG_LEVEL",
        "SELLPOINT_LOG_FORMAT",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_point_at_insight_proxy() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);

        let config = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("does-not-exist/sellpoint.toml")),
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.remote.endpoint == DEFAULT_REMOTE_ENDPOINT, "default endpoint expected")?;
        ensure(config.remote.timeout_secs == 15, "default timeout should be 15s")?;
        ensure(config.catalog.path.is_none(), "builtin catalog should be the default")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);

        env::set_var("TEST_SELLPOINT_PROXY_HOST", "proxy.internal.example");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("sellpoint.toml");
            fs::write(
                &path,
                r#"
[remote]
endpoint = "https://${TEST_SELLPOINT_PROXY_HOST}/query"
timeout_secs = 5

[catalog]
path = "catalog/products.toml"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.remote.endpoint == "https://proxy.internal.example/query",
                "endpoint should be interpolated from environment",
            )?;
            ensure(config.remote.timeout_secs == 5, "timeout should come from file")?;
            ensure(
                config.catalog.path == Some(PathBuf::from("catalog/products.toml")),
                "catalog path should come from file",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_SELLPOINT_PROXY_HOST"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);
        clear_vars(&["TEST_SELLPOINT_UNSET_VAR"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("sellpoint.toml");
        fs::write(&path, "[remote]\nendpoint = \"${TEST_SELLPOINT_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let error = match AppConfig::load(LoadOptions {
            config_path: Some(path),
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected interpolation failure".to_string()),
            Err(error) => error,
        };
        ensure(
            matches!(error, ConfigError::MissingEnvInterpolation { ref var } if var == "TEST_SELLPOINT_UNSET_VAR"),
            "interpolation error should name the variable",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);

        env::set_var("SELLPOINT_LOG_LEVEL", "warn");
        env::set_var("SELLPOINT_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(ENV_KEYS);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);

        env::set_var("SELLPOINT_REMOTE_ENDPOINT", "https://from-env.example");
        env::set_var("SELLPOINT_REMOTE_TIMEOUT_SECS", "20");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("sellpoint.toml");
            fs::write(
                &path,
                r#"
[remote]
endpoint = "https://from-file.example"
timeout_secs = 10

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    remote_endpoint: Some("https://from-override.example".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.remote.endpoint == "https://from-override.example",
                "override endpoint should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.remote.timeout_secs == 20, "env timeout should win over file")?;
            Ok(())
        })();

        clear_vars(ENV_KEYS);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);

        env::set_var("SELLPOINT_REMOTE_ENDPOINT", "ftp://proxy.example");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("remote.endpoint")
            );
            ensure(has_message, "validation failure should mention remote.endpoint")
        })();

        clear_vars(ENV_KEYS);
        result
    }

    #[test]
    fn invalid_timeout_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ENV_KEYS);

        env::set_var("SELLPOINT_REMOTE_TIMEOUT_SECS", "soon");
        let invalid = AppConfig::load(LoadOptions::default());
        clear_vars(ENV_KEYS);

        let zero = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                remote_timeout_secs: Some(0),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        ensure(
            matches!(invalid, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "SELLPOINT_REMOTE_TIMEOUT_SECS"),
            "non-numeric timeout should be an invalid override",
        )?;
        ensure(
            matches!(zero, Err(ConfigError::Validation(ref message)) if message.contains("remote.timeout_secs")),
            "zero timeout should fail validation",
        )
    }
}
