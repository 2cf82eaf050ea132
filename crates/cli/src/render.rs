use sellpoint_core::{
    presentation::{provenance_note, LOADING_MESSAGE, UNAVAILABLE_MESSAGE},
    CategoryInsights, InsightPresenter, ProductRecord, Provenance,
};
use serde::Serialize;

/// Line-oriented terminal rendering of a product lookup.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    lines: Vec<String>,
}

impl TerminalPresenter {
    pub fn show_product(&mut self, manufacturer: &str, product: &ProductRecord) {
        self.lines.push(format!("{manufacturer} · {}", product.name));
        if let Some(category) = product.insight_category() {
            self.lines.push(format!("品类：{category}"));
        }

        self.lines.push("核心卖点：".to_string());
        for (index, point) in product.selling_points.iter().enumerate() {
            self.lines.push(format!("  {}. {point}", index + 1));
        }
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

impl InsightPresenter for TerminalPresenter {
    fn show_loading(&mut self, category: &str) {
        self.lines.push(format!("品类洞察（{category}）："));
        self.lines.push(format!("  {LOADING_MESSAGE}"));
    }

    fn show_insights(&mut self, _category: &str, insights: &CategoryInsights, provenance: Provenance) {
        for insight in insights {
            self.lines.push(format!("  💡 {insight}"));
        }
        if let Some(note) = provenance_note(provenance) {
            self.lines.push(format!("  {note}"));
        }
    }

    fn show_error(&mut self, _category: &str) {
        self.lines.push(format!("  ⚠️ {UNAVAILABLE_MESSAGE}"));
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InsightReport {
    pub category: String,
    pub provenance: Provenance,
    pub items: Vec<String>,
    pub note: Option<&'static str>,
}

/// Captures the presented outcome as a serializable report.
#[derive(Debug, Default)]
pub struct ReportPresenter {
    report: Option<InsightReport>,
}

impl ReportPresenter {
    pub fn into_report(self) -> Option<InsightReport> {
        self.report
    }
}

impl InsightPresenter for ReportPresenter {
    fn show_loading(&mut self, _category: &str) {}

    fn show_insights(&mut self, category: &str, insights: &CategoryInsights, provenance: Provenance) {
        self.report = Some(InsightReport {
            category: category.to_string(),
            provenance,
            items: insights.items().to_vec(),
            note: provenance_note(provenance),
        });
    }

    fn show_error(&mut self, category: &str) {
        self.report = Some(InsightReport {
            category: category.to_string(),
            provenance: Provenance::Error,
            items: vec![UNAVAILABLE_MESSAGE.to_string()],
            note: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use sellpoint_core::{
        present_outcome, CategoryInsights, InsightPresenter, ProductCatalog, Provenance,
        ResolutionOutcome,
    };

    use crate::render::{ReportPresenter, TerminalPresenter};

    #[test]
    fn terminal_output_numbers_selling_points_and_notes_local_source() {
        let catalog = ProductCatalog::builtin();
        let product = catalog.find_product("达仁堂", "达仁堂 速效救心丸 120丸").expect("product");
        let mut presenter = TerminalPresenter::default();

        presenter.show_product("达仁堂", product);
        presenter.show_loading("心血管中成药");
        present_outcome(
            &mut presenter,
            "心血管中成药",
            &ResolutionOutcome::FallbackLocal(CategoryInsights::single("急救类药物是家庭常备药")),
        );
        let output = presenter.finish();

        assert!(output.starts_with("达仁堂 · 达仁堂 速效救心丸 120丸"));
        assert!(output.contains("品类：心血管中成药"));
        assert!(output.contains("  1. 速效救心丸突出速效和救心"));
        assert!(output.contains("💡 急救类药物是家庭常备药"));
        assert!(output.ends_with("(数据来源：本地知识库)"));
    }

    #[test]
    fn report_presenter_records_error_state() {
        let mut presenter = ReportPresenter::default();
        present_outcome(&mut presenter, "抗生素", &ResolutionOutcome::Error);

        let report = presenter.into_report().expect("report");
        assert_eq!(report.provenance, Provenance::Error);
        assert_eq!(report.items, vec!["暂时无法获取品类洞察，请稍后再试"]);
    }
}
