// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Text returned when there is nothing to score.
pub const INSUFFICIENT_INFORMATION: &str = "Not enough information.";
/// Text returned when symptoms were given but no disease scored above zero.
pub const NO_LIKELY_DISEASE: &str = "Could not identify a likely disease.";
/// Single line returned by precaution lookup when a disease has none.
pub const NO_PRECAUTIONS: &str = "No specific precautions found.";

/// Severity weight attached to a symptom. Source data is not range-checked.
pub type Weight = i64;

/// Normalized symptom name -> severity weight.
pub type SeverityTable = HashMap<String, Weight>;

/// Disease identifier -> ordered, non-empty precaution lines.
pub type PrecautionTable = HashMap<String, Vec<String>>;

/// One row of the disease/symptom catalog.
/// A disease may occur in several rows; each row is scored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomCatalogEntry {
    pub disease: String,
    /// Normalized, de-duplicated, in column order.
    pub symptoms: Vec<String>,
}

/// Outcome of a diagnosis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnosis {
    /// No usable symptoms were supplied, or the catalog is empty.
    InsufficientInformation,
    /// Symptoms were supplied but no catalog row scored above zero.
    NoLikelyDisease { input_count: usize },
    Identified {
        disease: String,
        /// Distinct user symptoms supplied, not the number that matched.
        input_count: usize,
        score: Weight,
    },
}

impl Diagnosis {
    pub fn is_identified(&self) -> bool {
        matches!(self, Diagnosis::Identified { .. })
    }

    pub fn disease(&self) -> Option<&str> {
        match self {
            Diagnosis::Identified { disease, .. } => Some(disease.as_str()),
            _ => None,
        }
    }

    /// The disease name, or the sentinel text for the two no-diagnosis outcomes.
    pub fn label(&self) -> &str {
        match self {
            Diagnosis::InsufficientInformation => INSUFFICIENT_INFORMATION,
            Diagnosis::NoLikelyDisease { .. } => NO_LIKELY_DISEASE,
            Diagnosis::Identified { disease, .. } => disease.as_str(),
        }
    }

    /// `(disease-or-sentinel, input count)`. Sentinels always carry 0.
    pub fn into_pair(self) -> (String, usize) {
        match self {
            Diagnosis::Identified {
                disease,
                input_count,
                ..
            } => (disease, input_count),
            other => (other.label().to_string(), 0),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_distinct() {
        assert_ne!(INSUFFICIENT_INFORMATION, NO_LIKELY_DISEASE);
        assert_eq!(
            Diagnosis::InsufficientInformation.into_pair(),
            (INSUFFICIENT_INFORMATION.to_string(), 0)
        );
        assert_eq!(
            Diagnosis::NoLikelyDisease { input_count: 3 }.into_pair(),
            (NO_LIKELY_DISEASE.to_string(), 0)
        );
    }

    #[test]
    fn identified_pair_carries_input_count() {
        let d = Diagnosis::Identified {
            disease: "Flu".into(),
            input_count: 2,
            score: 8,
        };
        assert!(d.is_identified());
        assert_eq!(d.disease(), Some("Flu"));
        assert_eq!(d.to_string(), "Flu");
        assert_eq!(d.into_pair(), ("Flu".to_string(), 2));
    }
}
