//! Violation deduplication and grouping.

use std::collections::BTreeMap;

use floe_core::types::collections::FxHashMap;

use super::violation::{DedupKey, Violation};
use crate::graph::ModelId;

/// Insertion-ordered store keyed by `(model_id, rule_id, column)`.
///
/// The first violation for a key wins and keeps its position. A later
/// duplicate with a stronger severity replaces it in place, so a warning can
/// never mask an error on the same key.
#[derive(Debug, Default)]
pub struct ViolationStore {
    entries: Vec<Violation>,
    index: FxHashMap<DedupKey, usize>,
    duplicates: usize,
}

impl ViolationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            duplicates: 0,
        }
    }

    /// Returns `false` when the key was already present.
    pub fn insert(&mut self, violation: Violation) -> bool {
        let key = violation.dedup_key();
        if let Some(&i) = self.index.get(&key) {
            self.duplicates += 1;
            if violation.severity < self.entries[i].severity {
                tracing::debug!(
                    model = %violation.model_id,
                    rule = %violation.rule_id,
                    "duplicate escalates severity"
                );
                self.entries[i] = violation;
            }
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(violation);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates
    }

    pub fn get(&self, model_id: &str, rule_id: &str, column: Option<&str>) -> Option<&Violation> {
        let key = (model_id.to_string(), rule_id.to_string(), column.map(str::to_string));
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    /// Freeze into the ordered list plus a per-model grouping.
    pub fn finalize(self) -> (Vec<Violation>, BTreeMap<ModelId, Vec<Violation>>) {
        let mut by_model: BTreeMap<ModelId, Vec<Violation>> = BTreeMap::new();
        for v in &self.entries {
            by_model.entry(v.model_id.clone()).or_default().push(v.clone());
        }
        (self.entries, by_model)
    }
}

impl Extend<Violation> for ViolationStore {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}
