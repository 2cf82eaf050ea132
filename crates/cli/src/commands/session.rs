//! Interactive lookups sharing one insight cache and one generation guard.
//!
//! Each input line is `manufacturer<TAB>product`. A line that arrives while an
//! earlier lookup is still resolving supersedes it: the earlier outcome still
//! populates the cache but is not rendered.

use std::io::Write;
use std::sync::Arc;

use sellpoint_core::{
    present_outcome, FallbackSource, GenerationGuard, InsightOrchestrator, InsightPresenter,
    InsightSource, ProductCatalog, ProductRecord, QueryTicket, ResolutionOutcome, ResolveError,
};
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
    commands::{
        build_orchestrator, build_runtime, load_catalog, load_config, CommandResult, LoadedConfig,
        EXIT_RUNTIME,
    },
    render::{InsightReport, ReportPresenter, TerminalPresenter},
};

pub const FIELD_SEPARATOR: char = '\t';

#[derive(Debug, Serialize)]
pub struct SessionEntry {
    pub manufacturer: String,
    pub product: String,
    pub category: Option<String>,
    pub selling_points: Vec<String>,
    pub insights: Option<InsightReport>,
    pub superseded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub rendered: String,
}

impl SessionEntry {
    fn completed(
        manufacturer: &str,
        product: &ProductRecord,
        resolution: Option<(&str, &ResolutionOutcome)>,
    ) -> Self {
        let mut terminal = TerminalPresenter::default();
        let mut report = ReportPresenter::default();
        terminal.show_product(manufacturer, product);
        if let Some((category, outcome)) = resolution {
            terminal.show_loading(category);
            present_outcome(&mut terminal, category, outcome);
            present_outcome(&mut report, category, outcome);
        }

        Self {
            manufacturer: manufacturer.to_owned(),
            product: product.name.clone(),
            category: product.insight_category().map(str::to_owned),
            selling_points: product.selling_points.clone(),
            insights: report.into_report(),
            superseded: false,
            error: None,
            rendered: terminal.finish(),
        }
    }

    fn superseded(manufacturer: &str, product: &ProductRecord) -> Self {
        Self { superseded: true, ..Self::completed(manufacturer, product, None) }
    }

    fn rejected(manufacturer: &str, product: &str, message: String) -> Self {
        Self {
            manufacturer: manufacturer.to_owned(),
            product: product.to_owned(),
            category: None,
            selling_points: Vec::new(),
            insights: None,
            superseded: false,
            rendered: format!("⚠️ {message}"),
            error: Some(message),
        }
    }
}

struct Resolved {
    ticket: QueryTicket,
    manufacturer: String,
    product: ProductRecord,
    category: String,
    outcome: Result<ResolutionOutcome, ResolveError>,
}

pub fn run(loaded: &LoadedConfig, json_output: bool) -> CommandResult {
    let config = match load_config("session", loaded) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let catalog = match load_catalog("session", config) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };
    let orchestrator = match build_orchestrator("session", config) {
        Ok(orchestrator) => Arc::new(orchestrator),
        Err(result) => return result,
    };
    let runtime = match build_runtime("session") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let guard = GenerationGuard::default();

    let mut entries = Vec::new();
    let mut stdout = std::io::stdout();
    let mut emit = |entry: SessionEntry| {
        if !json_output && !entry.superseded {
            if let Err(error) = writeln!(stdout, "{}\n", entry.rendered) {
                warn!(event_name = "session.render.write_failed", error = %error);
            }
        }
        entries.push(entry);
    };

    let input = BufReader::new(tokio::io::stdin());
    if let Err(error) = runtime.block_on(drive(orchestrator, &guard, &catalog, input, &mut emit))
    {
        return CommandResult::failure(
            "session",
            "input",
            format!("failed to read session input: {error}"),
            EXIT_RUNTIME,
        );
    }

    let superseded = entries.iter().filter(|entry| entry.superseded).count();
    let message =
        format!("session closed after {} lookups ({superseded} superseded)", entries.len());
    if json_output {
        CommandResult::success_with_data("session", message, Some(json!(entries)))
    } else {
        CommandResult::text(message)
    }
}

/// Reads lookups from `input` until it closes and every pending resolution
/// has settled, handing each finished entry to `emit` in completion order.
pub(crate) async fn drive<S, F, R, E>(
    orchestrator: Arc<InsightOrchestrator<S, F>>,
    guard: &GenerationGuard,
    catalog: &ProductCatalog,
    input: R,
    emit: &mut E,
) -> std::io::Result<()>
where
    S: InsightSource + 'static,
    F: FallbackSource + 'static,
    R: AsyncBufRead + Unpin,
    E: FnMut(SessionEntry),
{
    let mut lines = input.lines();
    let mut pending = JoinSet::new();
    let mut input_open = true;

    while input_open || !pending.is_empty() {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    if let Some(entry) =
                        accept_line(&orchestrator, guard, catalog, &line, &mut pending)
                    {
                        emit(entry);
                    }
                }
                None => input_open = false,
            },
            Some(joined) = pending.join_next(), if !pending.is_empty() => match joined {
                Ok(resolved) => emit(settle(guard, resolved)),
                Err(error) => warn!(
                    event_name = "session.resolve.join_failed",
                    error = %error,
                    "insight resolution task did not complete"
                ),
            },
        }
    }

    Ok(())
}

fn accept_line<S, F>(
    orchestrator: &Arc<InsightOrchestrator<S, F>>,
    guard: &GenerationGuard,
    catalog: &ProductCatalog,
    line: &str,
    pending: &mut JoinSet<Resolved>,
) -> Option<SessionEntry>
where
    S: InsightSource + 'static,
    F: FallbackSource + 'static,
{
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some((manufacturer, product_name)) = line.split_once(FIELD_SEPARATOR) else {
        return Some(SessionEntry::rejected(
            "",
            line,
            "expected `manufacturer<TAB>product`".to_owned(),
        ));
    };
    let (manufacturer, product_name) = (manufacturer.trim(), product_name.trim());
    let product = match catalog.find_product(manufacturer, product_name) {
        Ok(product) => product.clone(),
        Err(error) => {
            return Some(SessionEntry::rejected(manufacturer, product_name, error.to_string()))
        }
    };

    let ticket = guard.begin();
    info!(
        event_name = "session.product_selected",
        manufacturer = %manufacturer,
        product = %product.name,
        has_category = product.insight_category().is_some(),
        "product selected in session"
    );

    let Some(category) = product.insight_category().map(str::to_owned) else {
        return Some(SessionEntry::completed(manufacturer, &product, None));
    };

    let orchestrator = Arc::clone(orchestrator);
    let manufacturer = manufacturer.to_owned();
    pending.spawn(async move {
        let outcome = orchestrator.resolve(&category).await;
        Resolved { ticket, manufacturer, product, category, outcome }
    });
    None
}

fn settle(guard: &GenerationGuard, resolved: Resolved) -> SessionEntry {
    let Resolved { ticket, manufacturer, product, category, outcome } = resolved;

    if !guard.is_current(ticket) {
        debug!(
            event_name = "insight.present.stale_outcome",
            category = %category,
            "dropping outcome of superseded query"
        );
        return SessionEntry::superseded(&manufacturer, &product);
    }

    match outcome {
        Ok(outcome) => SessionEntry::completed(&manufacturer, &product, Some((category.as_str(), &outcome))),
        Err(error) => SessionEntry::rejected(&manufacturer, &product.name, error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use sellpoint_core::{
        CuratedFallback, FetchError, GenerationGuard, InsightCache, InsightOrchestrator,
        InsightSource, ProductCatalog, Provenance,
    };
    use serde_json::{json, Value};
    use tokio::io::{AsyncWriteExt, BufReader};
    use tokio::sync::Notify;

    use super::{drive, SessionEntry};

    const ANTIBIOTIC_LINE: &str = "重庆药友\t可乐必妥 左氧氟沙星片 0.5g*4片";
    const CARDIO_LINE: &str = "达仁堂\t达仁堂 速效救心丸 120丸";

    /// Answers immediately, except for `gated_category`, which waits for `gate`.
    #[derive(Clone, Default)]
    struct StubSource {
        calls: Arc<AtomicUsize>,
        gate: Arc<Notify>,
        gated_category: Option<&'static str>,
    }

    impl StubSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InsightSource for StubSource {
        async fn fetch(&self, category: &str) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gated_category == Some(category) {
                self.gate.notified().await;
            }
            Ok(json!({ "answer": format!("{category}市场需求稳定增长。{category}临床应用广泛") }))
        }
    }

    async fn feed_lines(mut writer: tokio::io::DuplexStream, lines: &[&str]) {
        for line in lines {
            writer.write_all(format!("{line}\n").as_bytes()).await.expect("write line");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    fn provenance(entry: &SessionEntry) -> Option<Provenance> {
        entry.insights.as_ref().map(|report| report.provenance)
    }

    #[tokio::test]
    async fn repeated_category_is_served_from_cache_with_one_remote_call() {
        let source = StubSource::default();
        let orchestrator =
            Arc::new(InsightOrchestrator::new(source.clone(), CuratedFallback, InsightCache::new()));
        let catalog = ProductCatalog::builtin();
        let guard = GenerationGuard::default();
        let (writer, reader) = tokio::io::duplex(1024);
        let mut entries = Vec::new();
        let mut record = |entry: SessionEntry| entries.push(entry);

        let (result, ()) = tokio::join!(
            drive(orchestrator, &guard, &catalog, BufReader::new(reader), &mut record),
            feed_lines(writer, &[ANTIBIOTIC_LINE, ANTIBIOTIC_LINE]),
        );
        result.expect("session input");

        assert_eq!(entries.len(), 2);
        assert_eq!(provenance(&entries[0]), Some(Provenance::Fetched));
        assert_eq!(provenance(&entries[1]), Some(Provenance::Cached));
        assert!(entries[1].rendered.contains("💡 抗生素市场需求稳定增长"));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn newer_line_supersedes_pending_lookup() {
        let source = StubSource { gated_category: Some("抗生素"), ..StubSource::default() };
        let gate = Arc::clone(&source.gate);
        let orchestrator =
            Arc::new(InsightOrchestrator::new(source.clone(), CuratedFallback, InsightCache::new()));
        let catalog = ProductCatalog::builtin();
        let guard = GenerationGuard::default();
        let (writer, reader) = tokio::io::duplex(1024);
        let mut entries = Vec::new();
        let mut record = |entry: SessionEntry| entries.push(entry);

        let feed = async move {
            feed_lines(writer, &[ANTIBIOTIC_LINE, CARDIO_LINE]).await;
            gate.notify_one();
        };
        let (result, ()) = tokio::join!(
            drive(Arc::clone(&orchestrator), &guard, &catalog, BufReader::new(reader), &mut record),
            feed,
        );
        result.expect("session input");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category.as_deref(), Some("心血管中成药"));
        assert_eq!(provenance(&entries[0]), Some(Provenance::Fetched));
        assert!(entries[1].superseded);
        assert_eq!(entries[1].category.as_deref(), Some("抗生素"));
        assert_eq!(entries[1].insights, None);
        assert_eq!(orchestrator.cache().len(), 2);
    }

    #[tokio::test]
    async fn malformed_and_unknown_lines_are_reported_without_remote_calls() {
        let source = StubSource::default();
        let orchestrator =
            Arc::new(InsightOrchestrator::new(source.clone(), CuratedFallback, InsightCache::new()));
        let catalog = ProductCatalog::builtin();
        let guard = GenerationGuard::default();
        let input: &[u8] = "没有分隔符的输入\n\n达仁堂\t不存在的商品\n".as_bytes();
        let mut entries = Vec::new();
        let mut record = |entry: SessionEntry| entries.push(entry);

        drive(orchestrator, &guard, &catalog, input, &mut record).await.expect("session input");

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.error.is_some() && !entry.superseded));
        assert_eq!(entries[1].manufacturer, "达仁堂");
        assert_eq!(source.calls(), 0);
    }
}
