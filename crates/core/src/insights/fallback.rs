use crate::domain::insight::CategoryInsights;

/// Local insight source used when the remote service cannot be reached.
pub trait FallbackSource: Send + Sync {
    fn get(&self, category: &str) -> CategoryInsights;
}

const CURATED: &[(&str, [&str; 3])] = &[
    (
        "抗生素",
        [
            "抗生素市场规模持续增长，呼吸系统用药占比最高",
            "左氧氟沙星作为第三代喹诺酮类药物，临床认可度极高",
            "政策趋向于规范抗生素使用，原研品质更具竞争优势",
        ],
    ),
    (
        "肝病辅助用药",
        [
            "中国是肝病大国，护肝药物市场需求刚性且稳定",
            "谷胱甘肽不仅用于肝病，在医美领域也有广泛应用",
            "患者依从性关键在于疗效确切和副作用小",
        ],
    ),
    (
        "心血管中成药",
        [
            "心血管病患病人数增加，中成药在预防和康复期优势明显",
            "急救类药物是家庭常备药，复购率和品牌忠诚度极高",
            "速效救心丸品牌认知度高达90%以上，是品类代名词",
        ],
    ),
];

/// Curated per-category table with a templated default for unknown categories.
#[derive(Clone, Copy, Debug, Default)]
pub struct CuratedFallback;

impl CuratedFallback {
    pub fn known_categories() -> impl Iterator<Item = &'static str> {
        CURATED.iter().map(|(category, _)| *category)
    }

    fn generic(category: &str) -> CategoryInsights {
        CategoryInsights::new(vec![
            format!("{category} 市场需求稳步上升"),
            format!("{category} 品类产品在临床端有广泛应用基础"),
            format!("患者对 {category} 类药物的品牌认知度正在提高"),
        ])
    }
}

impl FallbackSource for CuratedFallback {
    fn get(&self, category: &str) -> CategoryInsights {
        CURATED
            .iter()
            .find(|(known, _)| *known == category)
            .map(|(_, lines)| {
                CategoryInsights::new(lines.iter().map(|line| (*line).to_owned()).collect())
            })
            .unwrap_or_else(|| Self::generic(category))
    }
}
