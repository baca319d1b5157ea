//! Loads the three reference tables (disease/symptom rows, symptom severity
//! weights, disease precautions) from CSV files with a header row.
//!
//! Layout expected in every table: first column is the key, remaining
//! columns are values. Rows may have different lengths and empty cells;
//! empty cells are dropped rather than kept as empty strings.
//!
//! ```text
//! Disease,Symptom_1,Symptom_2,Symptom_3
//! Flu, fever, cough,
//! Migraine, headache,,
//! ```

use crate::config::CatalogPaths;
use crate::core::index::SymptomIndex;
use crate::core::normalize::normalize;
use crate::core::types::{PrecautionTable, SeverityTable, SymptomCatalogEntry, Weight};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// All reference data, built once and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<SymptomCatalogEntry>,
    pub severity: SeverityTable,
    pub precautions: PrecautionTable,
    pub index: SymptomIndex,
}

/// Names one of the three reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Symptoms,
    Severity,
    Precautions,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Table::Symptoms => "symptom catalog",
            Table::Severity => "severity table",
            Table::Precautions => "precaution table",
        })
    }
}

/// Which tables came up empty because their file could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub degraded: Vec<Table>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }

    pub fn is_degraded(&self, table: Table) -> bool {
        self.degraded.contains(&table)
    }
}

impl Catalog {
    /// Loads every table, degrading any unreadable one to empty.
    /// Never fails; the report says what was lost.
    pub fn load(paths: &CatalogPaths) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        let entries = soft(
            read_catalog_file(&paths.symptoms),
            Table::Symptoms,
            &paths.symptoms,
            &mut report,
        );
        let severity = soft(
            read_severity_file(&paths.severity),
            Table::Severity,
            &paths.severity,
            &mut report,
        );
        let precautions = soft(
            read_precautions_file(&paths.precautions),
            Table::Precautions,
            &paths.precautions,
            &mut report,
        );

        let catalog = Self::from_parts(entries, severity, precautions);
        catalog.log_summary();
        (catalog, report)
    }

    /// Like [`Catalog::load`], but the first unreadable table is an error.
    pub fn try_load(paths: &CatalogPaths) -> Result<Self, CatalogError> {
        let catalog = Self::from_parts(
            read_catalog_file(&paths.symptoms)?,
            read_severity_file(&paths.severity)?,
            read_precautions_file(&paths.precautions)?,
        );
        catalog.log_summary();
        Ok(catalog)
    }

    pub fn from_parts(
        entries: Vec<SymptomCatalogEntry>,
        severity: SeverityTable,
        precautions: PrecautionTable,
    ) -> Self {
        let index = SymptomIndex::from_entries(&entries);
        Self {
            entries,
            severity,
            precautions,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn log_summary(&self) {
        info!(
            rows = self.entries.len(),
            symptoms = self.index.len(),
            weights = self.severity.len(),
            precautions = self.precautions.len(),
            "catalog loaded"
        );
    }
}

fn soft<T: Default>(
    result: Result<T, CatalogError>,
    table: Table,
    path: &Path,
    report: &mut LoadReport,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(%table, path = %path.display(), error = %e, "degraded load, table left empty");
            report.degraded.push(table);
            T::default()
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

/// A row the CSV layer could not decode (bad UTF-8, broken quoting) is
/// skipped with a warning. Only I/O failures abort the table.
fn usable_row(
    result: Result<csv::StringRecord, csv::Error>,
    row: usize,
) -> Result<Option<csv::StringRecord>, CatalogError> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_io_error() => Err(e.into()),
        Err(e) => {
            warn!(row, error = %e, "malformed row skipped");
            Ok(None)
        }
    }
}

/// Non-empty trimmed cells after the key column.
fn value_cells(record: &csv::StringRecord) -> impl Iterator<Item = &str> {
    record.iter().skip(1).map(str::trim).filter(|c| !c.is_empty())
}

/// Parses the disease/symptom table. Rows without a disease name are skipped.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<SymptomCatalogEntry>, CatalogError> {
    let mut entries = Vec::new();
    for (row_idx, result) in csv_reader(reader).records().enumerate() {
        let Some(record) = usable_row(result, row_idx + 1)? else {
            continue;
        };
        let disease = record.get(0).map(str::trim).unwrap_or_default();
        if disease.is_empty() {
            debug!(row = row_idx + 1, "catalog row without disease skipped");
            continue;
        }

        let mut seen = HashSet::new();
        let symptoms = value_cells(&record)
            .map(normalize)
            .filter(|s| seen.insert(s.clone()))
            .collect();

        entries.push(SymptomCatalogEntry {
            disease: disease.to_string(),
            symptoms,
        });
    }
    Ok(entries)
}

/// Parses the symptom/weight table. Rows whose weight is not an integer are
/// skipped; a repeated symptom keeps the last weight seen.
pub fn read_severity<R: Read>(reader: R) -> Result<SeverityTable, CatalogError> {
    let mut table = SeverityTable::new();
    for (row_idx, result) in csv_reader(reader).records().enumerate() {
        let Some(record) = usable_row(result, row_idx + 1)? else {
            continue;
        };
        let symptom = normalize(record.get(0).unwrap_or_default());
        if symptom.is_empty() {
            continue;
        }
        let cell = record.get(1).map(str::trim).unwrap_or_default();
        match cell.parse::<Weight>() {
            Ok(weight) => {
                table.insert(symptom, weight);
            }
            Err(e) => {
                warn!(row = row_idx + 1, %symptom, weight = cell, error = %e, "bad severity weight, row skipped");
            }
        }
    }
    Ok(table)
}

/// Parses the disease/precaution table. The first row for a disease wins;
/// rows with no precaution text are left out.
pub fn read_precautions<R: Read>(reader: R) -> Result<PrecautionTable, CatalogError> {
    let mut table = PrecautionTable::new();
    for (row_idx, result) in csv_reader(reader).records().enumerate() {
        let Some(record) = usable_row(result, row_idx + 1)? else {
            continue;
        };
        let disease = record.get(0).map(str::trim).unwrap_or_default();
        if disease.is_empty() || table.contains_key(disease) {
            continue;
        }
        let lines: Vec<String> = value_cells(&record).map(str::to_string).collect();
        if !lines.is_empty() {
            table.insert(disease.to_string(), lines);
        }
    }
    Ok(table)
}

pub fn read_catalog_file(path: &Path) -> Result<Vec<SymptomCatalogEntry>, CatalogError> {
    read_catalog(open(path)?)
}

pub fn read_severity_file(path: &Path) -> Result<SeverityTable, CatalogError> {
    read_severity(open(path)?)
}

pub fn read_precautions_file(path: &Path) -> Result<PrecautionTable, CatalogError> {
    read_precautions(open(path)?)
}
