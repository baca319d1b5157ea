//! Diagnosis reports and the optional enrichment collaborators.
//!
//! The model answers on its own; a description provider (e.g. a scraped
//! summary) and a narrative generator (e.g. a hosted language model) may add
//! text around the result. Neither can change the diagnosis, and their
//! failures only leave the corresponding field empty.

use crate::core::engine::DiagnosisModel;
use crate::core::normalize::normalize_all;
use crate::core::types::Diagnosis;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

pub type EnrichmentError = Box<dyn std::error::Error + Send + Sync>;

/// Looks up a human-readable description of a disease.
pub trait DescriptionProvider {
    fn describe(&self, disease: &str) -> Result<Option<String>, EnrichmentError>;
}

/// Produces free-text commentary for a symptom list.
pub trait NarrativeGenerator {
    fn narrate(&self, symptoms: &[String], disease: &str) -> Result<Option<String>, EnrichmentError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub patient: Patient,
    pub created_at: DateTime<Local>,
    /// Normalized, in the order given.
    pub symptoms: Vec<String>,
    pub diagnosis: Diagnosis,
    pub precautions: Vec<String>,
    pub description: Option<String>,
    pub narrative: Option<String>,
}

impl DiagnosisReport {
    /// Human-readable body shown to the user.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DiagnosisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DIAGNOSIS REPORT")?;
        writeln!(f, "================")?;
        if let Some(name) = &self.patient.name {
            writeln!(f, "User: {name}")?;
        }
        if let Some(city) = &self.patient.city {
            writeln!(f, "Location: {city}")?;
        }
        writeln!(f, "Date: {}", self.created_at.format("%d %B %Y, %I:%M %p"))?;

        writeln!(f, "\nProvided Symptoms:")?;
        for s in &self.symptoms {
            writeln!(f, "- {s}")?;
        }

        writeln!(f, "\nLikely Condition: {}", self.diagnosis)?;
        if let Some(description) = &self.description {
            writeln!(f, "\n{description}")?;
        }

        if self.diagnosis.is_identified() {
            writeln!(f, "\nPrecautions:")?;
            for p in &self.precautions {
                writeln!(f, "- {p}")?;
            }
        }

        if let Some(narrative) = &self.narrative {
            writeln!(f, "\n--- ANALYSIS ---\n{narrative}")?;
        }
        writeln!(f, "\nDisclaimer: this is an automated assistant, not a doctor.")
    }
}

/// Assembles a report from the model and whichever collaborators are present.
pub struct ReportBuilder<'a> {
    model: &'a DiagnosisModel,
    describer: Option<&'a dyn DescriptionProvider>,
    narrator: Option<&'a dyn NarrativeGenerator>,
    patient: Patient,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(model: &'a DiagnosisModel) -> Self {
        Self {
            model,
            describer: None,
            narrator: None,
            patient: Patient::default(),
        }
    }

    pub fn describer(mut self, describer: &'a dyn DescriptionProvider) -> Self {
        self.describer = Some(describer);
        self
    }

    pub fn narrator(mut self, narrator: &'a dyn NarrativeGenerator) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn patient(mut self, patient: Patient) -> Self {
        self.patient = patient;
        self
    }

    pub fn build<S: AsRef<str>>(&self, symptoms: &[S]) -> DiagnosisReport {
        let mut seen = std::collections::HashSet::new();
        let symptoms: Vec<String> = normalize_all(symptoms)
            .filter(|s| seen.insert(s.clone()))
            .collect();

        let diagnosis = self.model.predict(&symptoms);
        let mut report = DiagnosisReport {
            patient: self.patient.clone(),
            created_at: Local::now(),
            symptoms,
            diagnosis,
            precautions: Vec::new(),
            description: None,
            narrative: None,
        };

        // Enrichment only makes sense for a real disease name.
        let Some(disease) = report.diagnosis.disease().map(str::to_string) else {
            return report;
        };
        report.precautions = self.model.get_precautions(&disease);

        if let Some(describer) = self.describer {
            report.description = describer.describe(&disease).unwrap_or_else(|e| {
                warn!(%disease, error = %e, "description lookup failed");
                None
            });
        }
        if let Some(narrator) = self.narrator {
            report.narrative = narrator
                .narrate(&report.symptoms, &disease)
                .unwrap_or_else(|e| {
                    warn!(%disease, error = %e, "narrative generation failed");
                    None
                });
        }
        report
    }
}
