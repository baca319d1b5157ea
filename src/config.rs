use std::env;
use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "Symptom Intake";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the default data directory.
pub const DATA_DIR_ENV: &str = "SYMPTOM_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_REPORTS_DIR: &str = "reports";

pub const SYMPTOMS_FILE: &str = "dataset.csv";
pub const SEVERITY_FILE: &str = "Symptom-severity.csv";
pub const PRECAUTIONS_FILE: &str = "symptom_precaution.csv";

/// How many autocomplete hits the front end shows.
pub const SUGGESTION_DISPLAY_LIMIT: usize = 8;

pub fn default_log_filter() -> &'static str {
    "info,diagnosis_core=info"
}

/// `$SYMPTOM_DATA_DIR` if set, else `./data`.
pub fn data_dir() -> PathBuf {
    env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Locations of the three reference tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub symptoms: PathBuf,
    pub severity: PathBuf,
    pub precautions: PathBuf,
}

impl CatalogPaths {
    pub fn new(
        symptoms: impl Into<PathBuf>,
        severity: impl Into<PathBuf>,
        precautions: impl Into<PathBuf>,
    ) -> Self {
        Self {
            symptoms: symptoms.into(),
            severity: severity.into(),
            precautions: precautions.into(),
        }
    }

    /// The default file names under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            dir.join(SYMPTOMS_FILE),
            dir.join(SEVERITY_FILE),
            dir.join(PRECAUTIONS_FILE),
        )
    }
}

impl Default for CatalogPaths {
    fn default() -> Self {
        Self::in_dir(&data_dir())
    }
}
