//! Process many roster files with one configuration
//!
//! Usage: run_batch --config config.json rosters/*.csv
//!
//! Rosters are independent, so they run in parallel. Each input `x.csv` is
//! written next to it as `x_processed.csv`.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tariff_engine::records::{load_table, write_table_to_path};
use tariff_engine::{Engine, EngineConfig, RecordTable};

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Run the tariff engine over several rosters in parallel")]
struct Args {
    /// Engine configuration (JSON)
    #[arg(short, long, default_value = tariff_engine::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Roster CSV files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster".to_string());
    input.with_file_name(format!("{stem}_processed.csv"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = EngineConfig::from_path(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let engine = Engine::from_config(&config);

    let start = Instant::now();
    let tables = args
        .inputs
        .iter()
        .map(|path| load_table(path).with_context(|| format!("reading roster {}", path.display())))
        .collect::<Result<Vec<RecordTable>>>()?;
    println!("Loaded {} roster(s) in {:?}", tables.len(), start.elapsed());

    let run_start = Instant::now();
    let outcomes = engine.run_batch(tables);
    println!("Processed in {:?}", run_start.elapsed());

    println!("{:<40} {:>8} {:>10} {:>9} {:>14} {:>14}", "Roster", "Rows", "Households", "Applied", "Premium", "Benefit");
    println!("{}", "-".repeat(100));

    for (input, outcome) in args.inputs.iter().zip(&outcomes) {
        let output = output_path(input);
        write_table_to_path(&output, &outcome.table)
            .with_context(|| format!("writing {}", output.display()))?;

        let s = &outcome.summary;
        println!(
            "{:<40} {:>8} {:>10} {:>9} {:>14.2} {:>14.2}",
            input.display().to_string(),
            s.input_rows,
            s.households,
            s.applied,
            s.total_premium,
            s.total_benefit
        );
        for warning in &outcome.warnings {
            eprintln!("  {}: {warning}", input.display());
        }
    }

    Ok(())
}
