//! Resumen - aggregation and statistical-inference pipeline for
//! simulated-annealing experiment logs
//!
//! This library turns the raw per-run CSV tables written by a TSPTW
//! simulated-annealing campaign into report-ready artifacts:
//! - per-(config, instance) summary statistics with a NaN/Inf validation
//!   pass (`summary`, `driver`)
//! - calibrated initial temperatures extracted from the phase-0 warmup
//!   (`calibration`)
//! - paired significance tests between configurations: Wilcoxon
//!   signed-rank, paired t-test, Cohen's d (`comparison`)
//! - the report's LaTeX tables (`tables`)
//!
//! The batch contract throughout is collect-all-errors: missing or empty
//! inputs become diagnostics, never aborts.

pub mod calibration;
pub mod catalog;
pub mod cli;
pub mod comparison;
pub mod driver;
pub mod error;
pub mod run_store;
pub mod summary;
pub mod tables;
