use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub selling_points: Vec<String>,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        category: Option<&str>,
        selling_points: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.map(str::to_owned),
            selling_points: selling_points.into_iter().map(Into::into).collect(),
        }
    }

    /// Category usable for an insight lookup. Blank categories count as absent.
    pub fn insight_category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|category| !category.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::ProductRecord;

    #[test]
    fn blank_category_is_not_an_insight_category() {
        let product = ProductRecord::new("test", Some("  "), ["point"]);
        assert_eq!(product.insight_category(), None);

        let product = ProductRecord::new("test", Some(" 抗生素 "), ["point"]);
        assert_eq!(product.insight_category(), Some("抗生素"));
    }
}
