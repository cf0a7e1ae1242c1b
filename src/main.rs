use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use resumen::{
    calibration,
    catalog::{Catalog, NEIGHBORHOODS},
    cli::{Cli, Command},
    driver, tables,
};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn run_aggregate(results_dir: &Path, output: &Path) -> Result<()> {
    let catalog = Catalog::standard();
    let outcome = driver::aggregate(results_dir, &catalog);

    driver::print_report(&outcome);
    driver::write_master_csv(output, &outcome.rows)?;

    println!("\nMaster results written to {}", output.display());
    Ok(())
}

fn run_calibrate(results_dir: &Path, output: &Path, neighborhood: &str) -> Result<()> {
    if !NEIGHBORHOODS.contains(&neighborhood) {
        anyhow::bail!(
            "Invalid value for --neighborhood: {} (expected one of: {})",
            neighborhood,
            NEIGHBORHOODS.join(", ")
        );
    }

    let phase0_dir = results_dir.join("phase0");
    if !phase0_dir.is_dir() {
        anyhow::bail!(
            "Phase 0 results directory not found: {}",
            phase0_dir.display()
        );
    }

    let catalog = Catalog::standard();
    let outcome = calibration::extract(results_dir, &catalog.instances, neighborhood);

    calibration::print_report(&outcome);
    calibration::write_calibrated_temps(output, &outcome.temperatures)?;

    println!("\nCalibrated temperatures written to {}", output.display());
    Ok(())
}

fn run_tables(results_dir: &Path, output: &Path) -> Result<()> {
    fs::create_dir_all(output)
        .map_err(|e| anyhow::anyhow!("failed to create output directory {}: {e}", output.display()))?;

    let catalog = Catalog::standard();
    tables::generate_all(results_dir, output, &catalog)?;

    println!("\nAll tables saved to {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match args.command {
        Command::Aggregate {
            results_dir,
            output,
        } => run_aggregate(&results_dir, &output),
        Command::Calibrate {
            results_dir,
            output,
            neighborhood,
        } => run_calibrate(&results_dir, &output, &neighborhood),
        Command::Tables {
            results_dir,
            output,
        } => run_tables(&results_dir, &output),
    }
}
