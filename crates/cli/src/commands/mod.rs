pub mod catalog;
pub mod config;
pub mod doctor;
pub mod insight;
pub mod lookup;
pub mod session;

use sellpoint_core::{
    config::{AppConfig, ConfigError},
    CatalogError, CuratedFallback, InsightCache, InsightOrchestrator, ProductCatalog,
};
use sellpoint_remote::HttpInsightClient;
use serde::Serialize;
use serde_json::Value;

pub const EXIT_RUNTIME: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_INVALID_ARGUMENT: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
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

    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
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

/// Configuration as loaded once per invocation; commands decide how to report
/// a load failure.
pub type LoadedConfig = Result<AppConfig, ConfigError>;

pub(crate) type HttpOrchestrator = InsightOrchestrator<HttpInsightClient, CuratedFallback>;

pub(crate) fn load_config<'a>(
    command: &str,
    loaded: &'a LoadedConfig,
) -> Result<&'a AppConfig, CommandResult> {
    loaded.as_ref().map_err(|error| config_failure(command, error))
}

pub(crate) fn config_failure(command: &str, error: &ConfigError) -> CommandResult {
    CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
}

pub(crate) fn load_catalog(command: &str, config: &AppConfig) -> Result<ProductCatalog, CommandResult> {
    match &config.catalog.path {
        Some(path) => ProductCatalog::load(path).map_err(|error| catalog_failure(command, &error)),
        None => Ok(ProductCatalog::builtin()),
    }
}

pub(crate) fn catalog_failure(command: &str, error: &CatalogError) -> CommandResult {
    let error_class = if error.is_not_found() { "not_found" } else { "catalog_load" };
    CommandResult::failure(command, error_class, error.to_string(), EXIT_CATALOG)
}

pub(crate) fn build_orchestrator(
    command: &str,
    config: &AppConfig,
) -> Result<HttpOrchestrator, CommandResult> {
    let client = HttpInsightClient::from_config(&config.remote).map_err(|error| {
        CommandResult::failure(command, "client_build", error.to_string(), EXIT_RUNTIME)
    })?;
    Ok(InsightOrchestrator::new(client, CuratedFallback, InsightCache::new()))
}

pub(crate) fn build_runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime",
            format!("failed to initialize async runtime: {error}"),
            EXIT_RUNTIME,
        )
    })
}
