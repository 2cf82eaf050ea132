use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::insight::CategoryInsights;

/// Process-lifetime store of remotely resolved insights, keyed by category.
///
/// Entries are write-once: the first stored value for a category is kept for
/// the lifetime of the cache. Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct InsightCache {
    entries: Arc<Mutex<HashMap<String, CategoryInsights>>>,
}

impl InsightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<CategoryInsights> {
        match self.entries.lock() {
            Ok(entries) => entries.get(category).cloned(),
            Err(poisoned) => poisoned.into_inner().get(category).cloned(),
        }
    }

    /// Returns `false` when the category already had an entry.
    pub fn store(&self, category: &str, insights: CategoryInsights) -> bool {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        if entries.contains_key(category) {
            return false;
        }
        entries.insert(category.to_owned(), insights);
        true
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
