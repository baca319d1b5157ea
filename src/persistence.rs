// File: src/persistence.rs
use crate::core::catalog::Catalog;
use crate::core::engine::DiagnosisModel;
use crate::error::{CatalogError, ReportError};
use crate::report::DiagnosisReport;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

const REPORT_PREFIX: &str = "report_";
const REPORT_EXT: &str = "json";

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// File-name-safe form of a patient name.
fn slug(name: &str) -> String {
    let s: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if s.is_empty() {
        "anonymous".to_string()
    } else {
        s
    }
}

/// Writes `report` as JSON under `dir` and returns its path. The write goes
/// through a temp file in the same directory, so readers never see a partial
/// report.
pub fn save_report(dir: &Path, report: &DiagnosisReport) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir)?;

    let name = slug(report.patient.name.as_deref().unwrap_or_default());
    let stamp = report.created_at.format("%Y-%m-%d_%H-%M-%S").to_string();

    let mut temp_file = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(&temp_file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    drop(writer);

    // Same-second reports get a `_n` suffix; persist_noclobber makes the
    // name claim atomic against concurrent writers.
    let mut seq = 0u32;
    loop {
        let path = dir.join(report_file_name(&name, &stamp, seq));
        match temp_file.persist_noclobber(&path) {
            Ok(_) => {
                info!(path = %path.display(), "report saved");
                return Ok(path);
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                temp_file = e.file;
                seq += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn report_file_name(name: &str, stamp: &str, seq: u32) -> String {
    match seq {
        0 => format!("{REPORT_PREFIX}{name}_{stamp}.{REPORT_EXT}"),
        n => format!("{REPORT_PREFIX}{name}_{stamp}_{n}.{REPORT_EXT}"),
    }
}

pub fn load_report(path: &Path) -> Result<DiagnosisReport, ReportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Saved reports in `dir`, newest first. A missing directory is an empty history.
pub fn list_reports(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e.into()),
    };

    let mut reports = Vec::new();
    for entry in read {
        let path = entry?.path();
        let is_report = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(REPORT_PREFIX))
            && path.extension().is_some_and(|e| e == REPORT_EXT);
        if is_report {
            reports.push(path);
        }
    }
    reports.sort_by_cached_key(|p| std::cmp::Reverse(sort_key(p)));
    Ok(reports)
}

/// `(timestamp, sequence)` of a report file name. The timestamp is located
/// from the right, so a patient slug never takes part in the ordering.
fn sort_key(path: &Path) -> (String, u32) {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    // report_<name>_YYYY-MM-DD_HH-MM-SS[_n]
    let parts: Vec<&str> = stem.split('_').collect();
    let Some(i) = parts.iter().rposition(|p| is_date(p)) else {
        return (stem.to_string(), 0);
    };
    let stamp = parts[i..parts.len().min(i + 2)].join("_");
    let seq = parts.get(i + 2).and_then(|n| n.parse().ok()).unwrap_or(0);
    (stamp, seq)
}

fn is_date(part: &str) -> bool {
    chrono::NaiveDate::parse_from_str(part, "%Y-%m-%d").is_ok()
}

/// Serializes the loaded catalog so a later start can skip CSV parsing.
pub fn save_catalog_snapshot(model: &DiagnosisModel, path: &Path) -> Result<(), CatalogError> {
    let parent_dir = parent_or_cwd(path);
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(&temp_file);
    bincode::serialize_into(&mut writer, model.catalog())?;
    writer.flush()?;
    drop(writer);

    temp_file.persist(path)?;
    Ok(())
}

pub fn load_catalog_snapshot(path: &Path) -> Result<DiagnosisModel, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: Catalog = bincode::deserialize_from(BufReader::new(file))?;
    info!(path = %path.display(), rows = catalog.entries.len(), "catalog snapshot loaded");
    Ok(DiagnosisModel::from_catalog(catalog))
}
