// File: src/core/index.rs
use crate::core::normalize::normalize;
use crate::core::types::SymptomCatalogEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every distinct normalized symptom in the catalog, sorted.
///
/// Sorting makes all symptoms sharing a prefix contiguous, so a prefix query
/// is two binary searches. O(log n + m) for m results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomIndex {
    symptoms: Vec<String>,
}

impl SymptomIndex {
    pub fn from_entries(entries: &[SymptomCatalogEntry]) -> Self {
        let set: BTreeSet<&str> = entries
            .iter()
            .flat_map(|e| e.symptoms.iter().map(String::as_str))
            .collect();
        Self {
            symptoms: set.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms
            .binary_search_by(|s| s.as_str().cmp(symptom))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    /// All indexed symptoms starting with the normalized `prefix`, in sorted
    /// order. A prefix that is empty after normalization yields nothing.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let prefix = normalize(prefix);
        if prefix.is_empty() || self.symptoms.is_empty() {
            return vec![];
        }

        let start = self.symptoms.partition_point(|s| s.as_str() < prefix.as_str());
        self.symptoms[start..]
            .iter()
            .take_while(|s| s.starts_with(&prefix))
            .cloned()
            .collect()
    }
}
