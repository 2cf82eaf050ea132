use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::insight::{CategoryInsights, Provenance, ResolutionOutcome};

pub const LOCAL_SOURCE_NOTE: &str = "(数据来源：本地知识库)";
pub const LOADING_MESSAGE: &str = "正在获取品类洞察...";
pub const UNAVAILABLE_MESSAGE: &str = "暂时无法获取品类洞察，请稍后再试";

/// Rendering callbacks invoked around an insight resolution.
pub trait InsightPresenter {
    fn show_loading(&mut self, category: &str);
    fn show_insights(&mut self, category: &str, insights: &CategoryInsights, provenance: Provenance);
    fn show_error(&mut self, category: &str);
}

pub fn present_outcome(
    presenter: &mut impl InsightPresenter,
    category: &str,
    outcome: &ResolutionOutcome,
) {
    match outcome.insights() {
        Some(insights) if !insights.is_empty() => {
            presenter.show_insights(category, insights, outcome.provenance())
        }
        _ => presenter.show_error(category),
    }
}

pub fn provenance_note(provenance: Provenance) -> Option<&'static str> {
    match provenance {
        Provenance::FallbackLocal => Some(LOCAL_SOURCE_NOTE),
        Provenance::Cached | Provenance::Fetched | Provenance::Error => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Drops outcomes of queries that were superseded while their fetch was pending.
#[derive(Debug, Default)]
pub struct GenerationGuard {
    current: AtomicU64,
}

impl GenerationGuard {
    pub fn begin(&self) -> QueryTicket {
        QueryTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}
