// File: src/core/scoring.rs
use crate::core::normalize::normalize_all;
use crate::core::types::{Diagnosis, SeverityTable, SymptomCatalogEntry, Weight};
use std::collections::HashSet;
use tracing::debug;

/// Ranks catalog rows against a set of user symptoms by summed severity.
pub struct ScoringEngine<'a> {
    entries: &'a [SymptomCatalogEntry],
    severity: &'a SeverityTable,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(entries: &'a [SymptomCatalogEntry], severity: &'a SeverityTable) -> Self {
        Self { entries, severity }
    }

    /// Severity of one symptom. Unknown symptoms weigh 0.
    pub fn weight(&self, symptom: &str) -> Weight {
        self.severity.get(symptom).copied().unwrap_or(0)
    }

    /// Sum of weights over the symptoms `entry` shares with `user`.
    /// `None` when they share nothing.
    pub fn score_entry(&self, entry: &SymptomCatalogEntry, user: &HashSet<String>) -> Option<Weight> {
        let mut matched = entry
            .symptoms
            .iter()
            .filter(|s| user.contains(s.as_str()))
            .peekable();
        matched.peek()?;
        Some(matched.map(|s| self.weight(s)).sum())
    }

    /// Picks the best-scoring catalog row for `symptoms`.
    ///
    /// Only rows with a positive score are candidates. On equal scores the
    /// row that comes first in the catalog wins.
    pub fn predict<I, S>(&self, symptoms: I) -> Diagnosis
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let user: HashSet<String> = normalize_all(symptoms).collect();
        if user.is_empty() || self.entries.is_empty() {
            return Diagnosis::InsufficientInformation;
        }
        let input_count = user.len();

        let mut best: Option<(&SymptomCatalogEntry, Weight)> = None;
        for entry in self.entries {
            let Some(score) = self.score_entry(entry, &user) else {
                continue;
            };
            if score <= 0 {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entry, score));
            }
        }

        match best {
            Some((entry, score)) => {
                debug!(disease = %entry.disease, score, input_count, "diagnosis identified");
                Diagnosis::Identified {
                    disease: entry.disease.clone(),
                    input_count,
                    score,
                }
            }
            None => {
                debug!(input_count, "no catalog row scored above zero");
                Diagnosis::NoLikelyDisease { input_count }
            }
        }
    }
}
