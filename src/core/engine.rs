use crate::config::CatalogPaths;
use crate::core::catalog::{Catalog, LoadReport};
use crate::core::scoring::ScoringEngine;
use crate::core::types::{Diagnosis, NO_PRECAUTIONS};
use crate::error::CatalogError;
use std::path::Path;
use tracing::info;

// The diagnosis model is a read-only catalog plus the operations over it.
// It holds no per-request state, so one instance can serve many callers.
pub struct DiagnosisModel {
    catalog: Catalog,
    load_report: LoadReport,
}

impl DiagnosisModel {
    /// Builds the model from the three reference tables. Unreadable tables
    /// are logged and left empty; see [`DiagnosisModel::load_report`].
    pub fn load(paths: &CatalogPaths) -> Self {
        let (catalog, load_report) = Catalog::load(paths);
        Self {
            catalog,
            load_report,
        }
    }

    pub fn load_from(symptoms: &Path, severity: &Path, precautions: &Path) -> Self {
        Self::load(&CatalogPaths::new(symptoms, severity, precautions))
    }

    /// Strict variant of [`DiagnosisModel::load`].
    pub fn try_load(paths: &CatalogPaths) -> Result<Self, CatalogError> {
        Ok(Self::from_catalog(Catalog::try_load(paths)?))
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            load_report: LoadReport::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Catalog symptoms starting with `prefix`, sorted. Unlimited.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.catalog.index.suggest(prefix)
    }

    pub fn predict<I, S>(&self, symptoms: I) -> Diagnosis
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let diagnosis =
            ScoringEngine::new(&self.catalog.entries, &self.catalog.severity).predict(symptoms);
        info!(outcome = %diagnosis, "prediction complete");
        diagnosis
    }

    /// Precautions for an exact disease identifier. Always at least one line.
    pub fn get_precautions(&self, disease: &str) -> Vec<String> {
        match self.catalog.precautions.get(disease) {
            Some(lines) if !lines.is_empty() => lines.clone(),
            _ => vec![NO_PRECAUTIONS.to_string()],
        }
    }
}
