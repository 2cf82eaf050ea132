use chrono::Utc;
use sellpoint_core::{config::AppConfig, GenerationGuard, ProductRecord};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    commands::{
        build_orchestrator, build_runtime, catalog_failure, insight::invalid_argument,
        insight::resolve_and_present, load_catalog, load_config, CommandResult, LoadedConfig,
    },
    render::{InsightReport, ReportPresenter, TerminalPresenter},
};

#[derive(Debug, Serialize)]
struct LookupReport<'a> {
    manufacturer: &'a str,
    product: &'a str,
    category: Option<&'a str>,
    selling_points: &'a [String],
    insights: Option<InsightReport>,
    resolved_at: String,
}

pub fn run(
    loaded: &LoadedConfig,
    manufacturer: &str,
    product_name: &str,
    json_output: bool,
) -> CommandResult {
    let config = match load_config("lookup", loaded) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let catalog = match load_catalog("lookup", config) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };
    let product = match catalog.find_product(manufacturer, product_name) {
        Ok(product) => product,
        Err(error) => return catalog_failure("lookup", &error),
    };

    info!(
        event_name = "lookup.product_selected",
        manufacturer = %manufacturer,
        product = %product.name,
        has_category = product.insight_category().is_some(),
        "product selected for lookup"
    );

    if json_output {
        lookup_json(config, manufacturer, product)
    } else {
        lookup_text(config, manufacturer, product)
    }
}

fn lookup_text(
    config: &AppConfig,
    manufacturer: &str,
    product: &ProductRecord,
) -> CommandResult {
    let mut presenter = TerminalPresenter::default();
    presenter.show_product(manufacturer, product);

    let Some(category) = product.insight_category() else {
        return CommandResult::text(presenter.finish());
    };

    let orchestrator = match build_orchestrator("lookup", config) {
        Ok(orchestrator) => orchestrator,
        Err(result) => return result,
    };
    let runtime = match build_runtime("lookup") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let guard = GenerationGuard::default();

    match runtime.block_on(resolve_and_present(&orchestrator, &guard, category, &mut presenter)) {
        Ok(()) => CommandResult::text(presenter.finish()),
        Err(error) => invalid_argument("lookup", &error),
    }
}

fn lookup_json(
    config: &AppConfig,
    manufacturer: &str,
    product: &ProductRecord,
) -> CommandResult {
    let category = product.insight_category();

    let insights = match category {
        Some(category) => {
            let orchestrator = match build_orchestrator("lookup", config) {
                Ok(orchestrator) => orchestrator,
                Err(result) => return result,
            };
            let runtime = match build_runtime("lookup") {
                Ok(runtime) => runtime,
                Err(result) => return result,
            };
            let guard = GenerationGuard::default();
            let mut presenter = ReportPresenter::default();

            if let Err(error) = runtime.block_on(resolve_and_present(
                &orchestrator,
                &guard,
                category,
                &mut presenter,
            )) {
                return invalid_argument("lookup", &error);
            }
            presenter.into_report()
        }
        None => None,
    };

    let report = LookupReport {
        manufacturer,
        product: &product.name,
        category,
        selling_points: &product.selling_points,
        insights,
        resolved_at: Utc::now().to_rfc3339(),
    };

    CommandResult::success_with_data(
        "lookup",
        format!("{} selling points for {}", product.selling_points.len(), product.name),
        Some(json!(report)),
    )
}
