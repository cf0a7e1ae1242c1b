//! CLI argument parsing for Resumen

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "resumen")]
#[command(version)]
#[command(about = "Aggregate and analyze simulated-annealing experiment results", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate all run CSVs into a master results table
    Aggregate {
        /// Root results directory
        #[arg(long = "results-dir", value_name = "DIR", default_value = "results")]
        results_dir: PathBuf,

        /// Output CSV path
        #[arg(long, value_name = "FILE", default_value = "master_results.csv")]
        output: PathBuf,
    },

    /// Extract calibrated initial temperatures from phase-0 warmup stats
    Calibrate {
        /// Root results directory
        #[arg(long = "results-dir", value_name = "DIR", default_value = "results")]
        results_dir: PathBuf,

        /// Output JSON file path
        #[arg(long, value_name = "FILE", default_value = "calibrated_temps.json")]
        output: PathBuf,

        /// Which phase-0 neighborhood's warmup to use for calibration
        #[arg(long, value_name = "ID", default_value = "phase0-Swap")]
        neighborhood: String,
    },

    /// Generate LaTeX tables for the experiment report
    Tables {
        /// Root results directory
        #[arg(long = "results-dir", value_name = "DIR", default_value = "results")]
        results_dir: PathBuf,

        /// Output directory for .tex files
        #[arg(long, value_name = "DIR", default_value = "tables")]
        output: PathBuf,
    },
}
