use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ifc_thermal::config::ThermalConfig;
use ifc_thermal::export::{export_csv_dir, export_json};
use ifc_thermal::parser::read_model_file;
use ifc_thermal::thermal::process_batch;
use ifc_thermal::ui::App;

#[derive(Parser, Debug)]
#[command(name = "ifc-thermal")]
#[command(about = "IFC Thermal - U-values and areas of envelope elements from IFC models")]
#[command(version)]
struct Args {
    /// Path to an IFC file or a JSON array of element records
    #[arg(required = true)]
    file: PathBuf,

    /// Thermal defaults (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Export report sheets as CSV files into this directory
    #[arg(long, value_name = "DIR")]
    csv: Option<PathBuf>,

    /// Export the report to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ThermalConfig::load(path)?,
        None => ThermalConfig::default(),
    };

    let records = read_model_file(&args.file)?;
    let source = args.file.display().to_string();
    let report = process_batch(&source, records, &config);

    if let Some(csv_dir) = &args.csv {
        let written = export_csv_dir(&report, csv_dir)?;
        println!("Exported {} CSV sheets to: {}", written.len(), csv_dir.display());
    }

    if let Some(json_path) = &args.json {
        export_json(&report, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    if args.csv.is_some() || args.json.is_some() {
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = App::new(report).run(terminal);
    ratatui::restore();
    result
}
