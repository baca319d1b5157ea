use clap::Parser;
use crossterm::style::Stylize;
use diagnosis_core::config::{self, CatalogPaths};
use diagnosis_core::persistence::{list_reports, load_catalog_snapshot, save_catalog_snapshot, save_report};
use diagnosis_core::report::{Patient, ReportBuilder};
use diagnosis_core::{normalize, DiagnosisModel};
use std::io::{self, stdin, stdout, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Collects symptoms and suggests the most likely condition")]
#[command(version, long_about = None)]
struct Cli {
    /// Directory holding dataset.csv, Symptom-severity.csv and symptom_precaution.csv
    #[arg(long, env = config::DATA_DIR_ENV, default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Where diagnosis reports are written
    #[arg(long, default_value = config::DEFAULT_REPORTS_DIR)]
    reports_dir: PathBuf,

    /// Compiled catalog cache; read if present, written after a CSV load
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Name recorded on saved reports
    #[arg(long)]
    name: Option<String>,

    /// City recorded on saved reports
    #[arg(long)]
    city: Option<String>,

    /// Do not write reports to disk
    #[arg(long)]
    no_save: bool,
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let model = load_model(&cli);
    let patient = Patient {
        name: cli.name.clone(),
        city: cli.city.clone(),
    };

    let mut symptoms: Vec<String> = Vec::new();
    let mut out = stdout();
    print_banner(&mut out, &patient)?;

    for line in stdin().lock().lines() {
        let input = line?;
        let cmd = input.trim();

        match cmd.to_lowercase().as_str() {
            "" => {}
            "exit" | "quit" => break,
            "clear" => {
                symptoms.clear();
                writeln!(out, "{}", "Symptom list cleared.".dark_grey())?;
            }
            "history" => print_history(&mut out, &cli.reports_dir)?,
            c if c.contains("diagnose") => {
                if symptoms.is_empty() {
                    writeln!(out, "{}", "Please provide a symptom.".yellow())?;
                } else {
                    let report = ReportBuilder::new(&model)
                        .patient(patient.clone())
                        .build(&symptoms);
                    writeln!(out, "\n{}", report.render())?;
                    if !cli.no_save {
                        match save_report(&cli.reports_dir, &report) {
                            Ok(path) => writeln!(
                                out,
                                "A copy of this report has been saved as {}",
                                path.display().to_string().green()
                            )?,
                            Err(e) => writeln!(out, "{} {e}", "Error saving report:".red())?,
                        }
                    }
                    symptoms.clear();
                }
            }
            c if c.starts_with('?') => {
                let suggestions = model.suggest(&c[1..]);
                print_suggestions(&mut out, &suggestions)?;
            }
            _ => {
                for token in cmd.split(',') {
                    let symptom = normalize(token);
                    if symptom.is_empty() || symptoms.contains(&symptom) {
                        continue;
                    }
                    if !model.catalog().index.contains(&symptom) {
                        let close = model.suggest(&symptom);
                        if !close.is_empty() {
                            writeln!(out, "'{symptom}' is not in the catalog. Did you mean:")?;
                            print_suggestions(&mut out, &close)?;
                        }
                    }
                    symptoms.push(symptom);
                }
                writeln!(
                    out,
                    "Symptom noted ({} so far). Add another or type 'diagnose' to proceed.",
                    symptoms.len()
                )?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    writeln!(out, "\nGoodbye.")?;
    Ok(())
}

fn load_model(cli: &Cli) -> DiagnosisModel {
    if let Some(snapshot) = cli.snapshot.as_deref().filter(|p| p.exists()) {
        match load_catalog_snapshot(snapshot) {
            Ok(model) => return model,
            Err(e) => tracing::warn!(error = %e, "snapshot unreadable, loading CSV tables"),
        }
    }

    let model = DiagnosisModel::load(&CatalogPaths::in_dir(&cli.data_dir));
    if let Some(snapshot) = &cli.snapshot {
        if model.load_report().is_complete() {
            if let Err(e) = save_catalog_snapshot(&model, snapshot) {
                tracing::warn!(error = %e, "could not write catalog snapshot");
            }
        }
    }
    model
}

fn print_banner(out: &mut impl Write, patient: &Patient) -> io::Result<()> {
    writeln!(out, "{}", format!("{} v{}", config::APP_NAME, config::APP_VERSION).bold())?;
    writeln!(out, "---------------------------------------------------------------")?;
    if let Some(name) = &patient.name {
        match &patient.city {
            Some(city) => writeln!(out, "Welcome, {name} from {city}.")?,
            None => writeln!(out, "Welcome, {name}.")?,
        }
    }
    writeln!(out, "Tell me your first symptom. When you're ready, type 'diagnose'.")?;
    writeln!(out, "'?<prefix>' suggests symptoms, 'history' lists reports, 'exit' quits.")?;
    write!(out, "> ")?;
    out.flush()
}

fn print_suggestions(out: &mut impl Write, suggestions: &[String]) -> io::Result<()> {
    if suggestions.is_empty() {
        return writeln!(out, "{}", "No matching symptoms.".dark_grey());
    }
    for s in suggestions.iter().take(config::SUGGESTION_DISPLAY_LIMIT) {
        writeln!(out, "  {}", s.as_str().cyan())?;
    }
    let hidden = suggestions.len().saturating_sub(config::SUGGESTION_DISPLAY_LIMIT);
    if hidden > 0 {
        writeln!(out, "  {}", format!("... and {hidden} more").dark_grey())?;
    }
    Ok(())
}

fn print_history(out: &mut impl Write, dir: &Path) -> io::Result<()> {
    match list_reports(dir) {
        Ok(reports) if reports.is_empty() => writeln!(out, "No history found."),
        Ok(reports) => {
            for path in reports {
                writeln!(out, "  {}", path.display())?;
            }
            Ok(())
        }
        Err(e) => writeln!(out, "{} {e}", "Error reading history:".red()),
    }
}
