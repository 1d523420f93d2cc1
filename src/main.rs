//! Tariff Engine CLI
//!
//! Reads a roster CSV and a JSON configuration, runs the engine and writes the
//! augmented roster.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

use tariff_engine::records::{load_table, write_table_to_path};
use tariff_engine::{Engine, EngineConfig, RunSummary, TariffLoadReport};

#[derive(Debug, Parser)]
#[command(name = "tariff_engine", version, about = "Compute premiums and family benefits for an insurance roster")]
struct Args {
    /// Roster CSV with a header row
    #[arg(short, long)]
    input: PathBuf,

    /// Engine configuration (JSON)
    #[arg(short, long, default_value = tariff_engine::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Where to write the augmented roster
    #[arg(short, long, default_value = "processed.csv")]
    output: PathBuf,

    /// Optional JSON run report
    #[arg(long)]
    summary: Option<PathBuf>,
}

/// JSON run report
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    input: &'a str,
    run_at: String,
    engine_version: &'static str,
    summary: &'a RunSummary,
    tariff: &'a TariffLoadReport,
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = EngineConfig::from_path(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let engine = Engine::from_config(&config);

    let table = load_table(&args.input)
        .with_context(|| format!("reading roster {}", args.input.display()))?;
    println!("Loaded {} rows from {}", table.len(), args.input.display());

    let outcome = engine.run(table);

    write_table_to_path(&args.output, &outcome.table)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let summary = &outcome.summary;
    println!("\nSummary:");
    println!("  Rows:            {}", summary.input_rows);
    println!("  Excluded:        {}", summary.excluded_rows);
    println!("  Households:      {}", summary.households);
    println!("  Eligible:        {}", summary.eligible);
    println!("  Benefit applied: {}", summary.applied);
    println!("  Transitions:     {}", summary.transition_records);
    println!("  Total premium:   {:.2}", summary.total_premium);
    println!("  Total benefit:   {:.2}", summary.total_benefit);

    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    if let Some(path) = &args.summary {
        let input = args.input.display().to_string();
        let report = RunReport {
            input: &input,
            run_at: chrono::Utc::now().to_rfc3339(),
            engine_version: env!("CARGO_PKG_VERSION"),
            summary,
            tariff: engine.tariff_report(),
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
        };
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
    }

    println!("\nResults written to: {}", args.output.display());
    Ok(())
}
