use serde::{Deserialize, Serialize};

/// Ordered insight statements for one category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryInsights(Vec<String>);

impl CategoryInsights {
    pub fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    pub fn single(item: impl Into<String>) -> Self {
        Self(vec![item.into()])
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for CategoryInsights {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a CategoryInsights {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Cached,
    Fetched,
    FallbackLocal,
    Error,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cached => "cached",
            Self::Fetched => "fetched",
            Self::FallbackLocal => "fallback_local",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Cached(CategoryInsights),
    Fetched(CategoryInsights),
    FallbackLocal(CategoryInsights),
    Error,
}

impl ResolutionOutcome {
    pub fn provenance(&self) -> Provenance {
        match self {
            Self::Cached(_) => Provenance::Cached,
            Self::Fetched(_) => Provenance::Fetched,
            Self::FallbackLocal(_) => Provenance::FallbackLocal,
            Self::Error => Provenance::Error,
        }
    }

    pub fn insights(&self) -> Option<&CategoryInsights> {
        match self {
            Self::Cached(insights) | Self::Fetched(insights) | Self::FallbackLocal(insights) => {
                Some(insights)
            }
            Self::Error => None,
        }
    }
}
