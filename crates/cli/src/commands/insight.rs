use sellpoint_core::{
    present_outcome, FallbackSource, GenerationGuard, InsightOrchestrator, InsightPresenter,
    InsightSource, ResolveError,
};
use serde_json::json;
use tracing::debug;

use crate::{
    commands::{
        build_orchestrator, build_runtime, load_config, CommandResult, LoadedConfig,
        EXIT_INVALID_ARGUMENT,
    },
    render::{ReportPresenter, TerminalPresenter},
};

/// Shows the loading state, resolves `category` and renders the outcome unless a
/// newer query superseded it in the meantime.
pub(crate) async fn resolve_and_present<S, F>(
    orchestrator: &InsightOrchestrator<S, F>,
    guard: &GenerationGuard,
    category: &str,
    presenter: &mut impl InsightPresenter,
) -> Result<(), ResolveError>
where
    S: InsightSource,
    F: FallbackSource,
{
    let ticket = guard.begin();
    presenter.show_loading(category);

    let outcome = orchestrator.resolve(category).await?;
    if !guard.is_current(ticket) {
        debug!(
            event_name = "insight.present.stale_outcome",
            category = %category,
            provenance = %outcome.provenance(),
            "dropping outcome of superseded query"
        );
        return Ok(());
    }

    present_outcome(presenter, category, &outcome);
    Ok(())
}

pub fn run(loaded: &LoadedConfig, category: &str, json_output: bool) -> CommandResult {
    let config = match load_config("insight", loaded) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let orchestrator = match build_orchestrator("insight", config) {
        Ok(orchestrator) => orchestrator,
        Err(result) => return result,
    };
    let runtime = match build_runtime("insight") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let guard = GenerationGuard::default();

    if json_output {
        let mut presenter = ReportPresenter::default();
        let result = runtime.block_on(resolve_and_present(
            &orchestrator,
            &guard,
            category,
            &mut presenter,
        ));
        return match result {
            Ok(()) => CommandResult::success_with_data(
                "insight",
                format!("insights resolved for {category}"),
                Some(json!(presenter.into_report())),
            ),
            Err(error) => invalid_argument("insight", &error),
        };
    }

    let mut presenter = TerminalPresenter::default();
    match runtime.block_on(resolve_and_present(&orchestrator, &guard, category, &mut presenter)) {
        Ok(()) => CommandResult::text(presenter.finish()),
        Err(error) => invalid_argument("insight", &error),
    }
}

pub(crate) fn invalid_argument(command: &str, error: &ResolveError) -> CommandResult {
    CommandResult::failure(command, "invalid_argument", error.to_string(), EXIT_INVALID_ARGUMENT)
}
