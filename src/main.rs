use anyhow::{Context, anyhow};
use avoidable_attendances::utils::io::{read_parquet, write_parquet};
use avoidable_attendances::{
    AttendanceColumns, ClassifierConfig, DEFAULT_VERDICT_COLUMN, available_parallelism,
    classify, combine_batches, with_verdict_column,
};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "avoidable-attendances",
    version,
    about = "Classify emergency department attendances as avoidable",
    long_about = "Classify emergency department attendances in a Parquet file as avoidable.\n\n\
                  Supports SNOMED CT (ECDS) and HES A&E coded data."
)]
struct Cli {
    /// Parquet file of attendances
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// JSON classifier configuration (replaces the column and standard flags)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// ED type column
    #[arg(long = "type-ed", value_name = "COLUMN", required_unless_present = "config")]
    type_ed: Option<String>,

    /// Attendance discharge (disposal) column
    #[arg(long, value_name = "COLUMN", required_unless_present = "config")]
    discharge: Option<String>,

    /// Attendance category column
    #[arg(long, value_name = "COLUMN", required_unless_present = "config")]
    category: Option<String>,

    /// Arrival mode column
    #[arg(long = "arrival-mode", value_name = "COLUMN", required_unless_present = "config")]
    arrival_mode: Option<String>,

    /// Investigation column (repeat for each column, in order)
    #[arg(long = "investigation", value_name = "COLUMN")]
    investigations: Vec<String>,

    /// Treatment column (repeat for each column, in order)
    #[arg(long = "treatment", value_name = "COLUMN")]
    treatments: Vec<String>,

    /// Clinical coding standard: snomed or hes
    #[arg(long, default_value = "snomed")]
    standard: String,

    /// Worker threads (default: available parallelism)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// JSON vocabulary replacing the built-in code lists
    #[arg(long, value_name = "PATH")]
    vocabulary: Option<PathBuf>,

    /// Write the input with a verdict column appended to this Parquet file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Name of the appended verdict column
    #[arg(long = "column-name", default_value = DEFAULT_VERDICT_COLUMN)]
    column_name: String,
}

fn build_config(cli: &Cli) -> anyhow::Result<ClassifierConfig> {
    let mut config = if let Some(path) = &cli.config {
        ClassifierConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
    } else {
        let required = |value: &Option<String>, flag: &str| {
            value.clone().ok_or_else(|| anyhow!("--{flag} is required"))
        };
        let columns = AttendanceColumns::new(
            required(&cli.type_ed, "type-ed")?,
            required(&cli.discharge, "discharge")?,
            required(&cli.category, "category")?,
            required(&cli.arrival_mode, "arrival-mode")?,
        )
        .with_investigations(cli.investigations.iter().cloned())
        .with_treatments(cli.treatments.iter().cloned());

        ClassifierConfig::new(columns)
            .with_coding_standard(cli.standard.as_str())
            .with_threads(available_parallelism())
    };

    if let Some(n_threads) = cli.threads {
        config.n_threads = n_threads;
    }
    if let Some(path) = &cli.vocabulary {
        config.vocabulary_path = Some(path.clone());
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    config.validate()?;
    info!(
        "Classifying with the {} standard on {} threads",
        config.coding_standard, config.n_threads
    );

    let start = Instant::now();
    let batches = read_parquet(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let Some(combined) = combine_batches(&batches)? else {
        warn!("Input is empty, nothing to classify");
        return Ok(());
    };
    drop(batches);
    let verdicts = classify(&combined, &config)?;

    let avoidable = verdicts.iter().filter(|&&v| v).count();
    info!(
        "Found {avoidable} avoidable attendances out of {} in {:?}",
        verdicts.len(),
        start.elapsed()
    );

    if let Some(output) = &cli.output {
        let classified = with_verdict_column(&combined, verdicts, &cli.column_name)?;
        write_parquet(output, &classified)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    Ok(())
}
