use diagnosis_core::config::CatalogPaths;
use diagnosis_core::core::catalog::Table;
use diagnosis_core::persistence::{
    list_reports, load_catalog_snapshot, load_report, save_catalog_snapshot, save_report,
};
use diagnosis_core::report::{Patient, ReportBuilder};
use diagnosis_core::{
    normalize, Diagnosis, DiagnosisModel, INSUFFICIENT_INFORMATION, NO_LIKELY_DISEASE,
    NO_PRECAUTIONS,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DATASET: &str = "\
Disease,Symptom_1,Symptom_2,Symptom_3
Flu, fever, cough,
Migraine, headache,,
Fatigue syndrome, feeling_tired,,
";

const SEVERITY: &str = "\
Symptom,weight
fever,5
Cough,3
 headache ,2
feeling_tired,1
";

const PRECAUTIONS: &str = "\
Disease,Precaution_1,Precaution_2,Precaution_3
Flu,rest,drink fluids,
Fatigue syndrome,,,
";

fn write_catalog(dir: &Path) -> CatalogPaths {
    let paths = CatalogPaths::in_dir(dir);
    fs::write(&paths.symptoms, DATASET).unwrap();
    fs::write(&paths.severity, SEVERITY).unwrap();
    fs::write(&paths.precautions, PRECAUTIONS).unwrap();
    paths
}

fn loaded() -> (TempDir, DiagnosisModel) {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_catalog(dir.path());
    let model = DiagnosisModel::load(&paths);
    assert!(model.load_report().is_complete());
    (dir, model)
}

#[test]
fn predicts_flu_and_migraine() {
    let (_dir, model) = loaded();
    assert_eq!(model.predict(["fever"]).into_pair(), ("Flu".to_string(), 1));
    assert_eq!(
        model.predict(["headache"]).into_pair(),
        ("Migraine".to_string(), 1)
    );
    assert_eq!(
        model.predict(["notasymptom"]).into_pair(),
        (NO_LIKELY_DISEASE.to_string(), 0)
    );
}

#[test]
fn empty_input_and_unknown_symptom_sentinels_differ() {
    let (_dir, model) = loaded();
    let empty = model.predict(Vec::<String>::new());
    let unknown = model.predict(["zzz-not-a-real-symptom"]);
    assert_eq!(empty, Diagnosis::InsufficientInformation);
    assert!(matches!(unknown, Diagnosis::NoLikelyDisease { .. }));
    assert_eq!(empty.label(), INSUFFICIENT_INFORMATION);
    assert_ne!(empty.label(), unknown.label());
}

#[test]
fn precautions_for_every_catalog_disease_are_non_empty() {
    let (_dir, model) = loaded();
    for entry in &model.catalog().entries {
        assert!(!model.get_precautions(&entry.disease).is_empty());
    }
    assert_eq!(model.get_precautions("Flu"), vec!["rest", "drink fluids"]);
    assert_eq!(model.get_precautions("Migraine"), vec![NO_PRECAUTIONS]);
    assert_eq!(model.get_precautions("Fatigue syndrome"), vec![NO_PRECAUTIONS]);
}

#[test]
fn suggests_by_prefix_in_sorted_order() {
    let (_dir, model) = loaded();
    assert_eq!(model.suggest("fe"), vec!["feeling_tired", "fever"]);
    assert!(model.suggest("").is_empty());
    for p in ["c", "H", " fe", "x"] {
        for r in model.suggest(p) {
            assert!(normalize(&r).starts_with(&normalize(p)));
        }
    }
}

#[test]
fn missing_severity_file_degrades_to_no_match() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_catalog(dir.path());
    fs::remove_file(&paths.severity).unwrap();

    let model = DiagnosisModel::load(&paths);
    assert!(model.load_report().is_degraded(Table::Severity));
    assert!(!model.load_report().is_degraded(Table::Symptoms));
    assert_eq!(model.suggest("he"), vec!["headache"]);
    assert_eq!(
        model.predict(["fever"]),
        Diagnosis::NoLikelyDisease { input_count: 1 }
    );
    assert!(DiagnosisModel::try_load(&paths).is_err());
}

#[test]
fn missing_catalog_degrades_to_insufficient_information() {
    let dir = tempfile::tempdir().unwrap();
    let paths = CatalogPaths::in_dir(dir.path());
    let model = DiagnosisModel::load_from(&paths.symptoms, &paths.severity, &paths.precautions);
    assert_eq!(model.load_report().degraded.len(), 3);
    assert_eq!(model.predict(["fever"]), Diagnosis::InsufficientInformation);
    assert!(model.suggest("f").is_empty());
    assert_eq!(model.get_precautions("Flu"), vec![NO_PRECAUTIONS]);
}

#[test]
fn reports_are_saved_listed_and_reloaded() {
    let (dir, model) = loaded();
    let reports_dir = dir.path().join("reports");
    let builder = ReportBuilder::new(&model).patient(Patient {
        name: Some("Ada Lovelace".into()),
        city: None,
    });

    let first = builder.build(&["fever", "cough"]);
    let path = save_report(&reports_dir, &first).unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("report_Ada_Lovelace_"));

    let second = builder.build(&["headache"]);
    let second_path = save_report(&reports_dir, &second).unwrap();
    assert_ne!(path, second_path);

    let listed = list_reports(&reports_dir).unwrap();
    assert_eq!(listed, vec![second_path.clone(), path.clone()]);

    // Even when it shares a second with the previous one, the latest lists first.
    let third = builder.build(&["cough"]);
    let third_path = save_report(&reports_dir, &third).unwrap();
    assert_eq!(list_reports(&reports_dir).unwrap()[0], third_path);

    let back = load_report(&path).unwrap();
    assert_eq!(back, first);
    assert_eq!(back.diagnosis.disease(), Some("Flu"));
    assert_eq!(back.precautions, vec!["rest", "drink fluids"]);
}

#[test]
fn snapshot_restores_an_equivalent_model() {
    let (dir, model) = loaded();
    let snapshot = dir.path().join("cache").join("catalog.bin");
    save_catalog_snapshot(&model, &snapshot).unwrap();

    let restored = load_catalog_snapshot(&snapshot).unwrap();
    assert_eq!(restored.catalog().entries, model.catalog().entries);
    assert_eq!(restored.suggest("fe"), model.suggest("fe"));
    assert_eq!(restored.predict(["cough"]), model.predict(["cough"]));
    assert_eq!(restored.get_precautions("Flu"), model.get_precautions("Flu"));
}

#[test]
fn history_sorts_on_timestamp_not_patient_name() {
    let (dir, model) = loaded();
    let reports_dir = dir.path().join("reports");

    let mut older = ReportBuilder::new(&model)
        .patient(Patient {
            name: Some("Zed".into()),
            city: None,
        })
        .build(&["fever"]);
    older.created_at = older.created_at - chrono::Duration::days(2);
    let mut newer = ReportBuilder::new(&model)
        .patient(Patient {
            name: Some("Amy".into()),
            city: None,
        })
        .build(&["headache"]);
    newer.created_at = newer.created_at - chrono::Duration::days(1);

    let older_path = save_report(&reports_dir, &older).unwrap();
    let newer_path = save_report(&reports_dir, &newer).unwrap();
    assert_eq!(
        list_reports(&reports_dir).unwrap(),
        vec![newer_path, older_path]
    );
}
