use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use bizfin_core::models::FilingStatus;
use bizfin_data::TaxTableLoader;

/// Validate a tax tables CSV file and print a summary.
///
/// The file must contain, for every tax year it covers, all four filing
/// statuses with strictly increasing bracket limits and an unbounded top
/// bracket. See the loader documentation for the column layout.
#[derive(Parser, Debug)]
#[command(name = "table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax table data
    #[arg(short, long)]
    file: PathBuf,

    /// Year to use as the fallback for unknown years
    #[arg(short, long, default_value_t = 2024)]
    default_year: i32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tables = TaxTableLoader::load_path(&args.file, args.default_year)
        .with_context(|| format!("Failed to load tables from: {}", args.file.display()))?;

    println!("Loaded tables from: {}", args.file.display());
    println!("Default year: {}", tables.default_year());

    for year in tables.known_years() {
        for status in FilingStatus::ALL {
            let resolved = tables.resolve(year, status);
            println!(
                "{year} {status}: {} brackets, standard deduction {}, SS wage base {}",
                resolved.brackets.len(),
                resolved.standard_deduction,
                resolved.ss_wage_base,
            );
        }
    }

    Ok(())
}
