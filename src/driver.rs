//! Aggregation driver: cross-product iteration over the catalog
//!
//! Enumerates every (phase, config, instance) cell, loads and summarizes
//! each, and partitions the results into master-table rows and diagnostics.
//! One missing or empty input never aborts the batch: the cell is skipped,
//! the failure is recorded, and the run still exits successfully with a
//! report of what was skipped. The only fatal condition is an unusable
//! output path.

use std::path::Path;

use anyhow::{Context, Result};

use crate::catalog::{runs_path, Catalog};
use crate::error::{Diagnostic, PipelineError};
use crate::run_store;
use crate::summary::{self, NumericAnomaly, SummaryRecord};

/// One row of the consolidated master table.
#[derive(Debug, Clone)]
pub struct MasterRow {
    pub phase: String,
    pub config: String,
    pub instance: String,
    pub record: SummaryRecord,
}

impl MasterRow {
    /// Cell label used in validation warnings, e.g. `EXP-01A/inst2`
    pub fn cell(&self) -> String {
        format!("{}/{}", self.config, self.instance)
    }
}

/// Everything a full aggregation pass produces.
#[derive(Debug)]
pub struct AggregationOutcome {
    pub rows: Vec<MasterRow>,
    /// Missing/empty/malformed cells, in catalog order
    pub diagnostics: Vec<Diagnostic>,
    /// NaN/Inf findings from the validation pass
    pub anomalies: Vec<NumericAnomaly>,
    /// Phases whose results directory was absent entirely
    pub skipped_phases: Vec<String>,
}

fn summarize_cell(path: &Path) -> Result<SummaryRecord, PipelineError> {
    let outcomes = run_store::load_runs(path)?;
    if outcomes.is_empty() {
        return Err(PipelineError::EmptyGroup {
            context: path.display().to_string(),
        });
    }
    summary::summarize(&outcomes)
}

/// Run the full aggregation over a catalog.
///
/// Infallible by design: per-cell failures land in `diagnostics`, and the
/// NaN/Inf validation pass reports findings without raising.
pub fn aggregate(results_dir: &Path, catalog: &Catalog) -> AggregationOutcome {
    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();
    let mut skipped_phases = Vec::new();

    for phase in &catalog.phases {
        let phase_dir = results_dir.join(&phase.dir);
        if !phase_dir.is_dir() {
            skipped_phases.push(format!("phase{} ({})", phase.number, phase_dir.display()));
            continue;
        }

        for config in &phase.configs {
            for instance in &catalog.instances {
                let path = runs_path(results_dir, &phase.dir, instance, config);
                match summarize_cell(&path) {
                    Ok(record) => rows.push(MasterRow {
                        phase: phase.number.clone(),
                        config: config.clone(),
                        instance: instance.clone(),
                        record,
                    }),
                    Err(error) => diagnostics.push(Diagnostic::new(
                        format!("{}/{}/{}", phase.number, config, instance),
                        error,
                    )),
                }
            }
        }
    }

    let cells: Vec<String> = rows.iter().map(MasterRow::cell).collect();
    let anomalies = summary::find_anomalies(
        cells
            .iter()
            .map(String::as_str)
            .zip(rows.iter().map(|r| &r.record)),
    );
    for anomaly in &anomalies {
        tracing::warn!(
            "numeric anomaly: {}={} for {}",
            anomaly.column,
            anomaly.value,
            anomaly.cell
        );
    }

    AggregationOutcome {
        rows,
        diagnostics,
        anomalies,
        skipped_phases,
    }
}

/// Write the master results CSV.
///
/// Fitness statistics carry one decimal, feasibility three, matching the
/// reference tables downstream tooling was built against.
pub fn write_master_csv(path: &Path, rows: &[MasterRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;

    writer.write_record([
        "phase",
        "config",
        "instance",
        "num_runs",
        "best",
        "mean",
        "std",
        "median",
        "q1",
        "q3",
        "feasible_rate",
        "mean_time_s",
    ])?;

    for row in rows {
        let r = &row.record;
        writer.write_record([
            row.phase.clone(),
            row.config.clone(),
            row.instance.clone(),
            r.num_runs.to_string(),
            format!("{:.1}", r.best),
            format!("{:.1}", r.mean),
            format!("{:.1}", r.std),
            format!("{:.1}", r.median),
            format!("{:.1}", r.q1),
            format!("{:.1}", r.q3),
            format!("{:.3}", r.feasible_rate),
            format!("{:.1}", r.mean_time_s),
        ])?;
    }

    writer.flush().context("failed to flush master results")?;
    Ok(())
}

/// Print the end-of-run report to stdout.
pub fn print_report(outcome: &AggregationOutcome) {
    for phase in &outcome.skipped_phases {
        println!("Skipping {phase}: directory not found");
    }

    println!(
        "\nProcessed {} config-instance combinations",
        outcome.rows.len()
    );

    if !outcome.diagnostics.is_empty() {
        println!("\nMissing or empty inputs ({}):", outcome.diagnostics.len());
        for diagnostic in &outcome.diagnostics {
            println!("  - {diagnostic}");
        }
    }

    if outcome.anomalies.is_empty() {
        println!("Validation: No NaN/Inf values found");
    } else {
        for anomaly in &outcome.anomalies {
            println!(
                "WARNING: {}={} for {}",
                anomaly.column, anomaly.value, anomaly.cell
            );
        }
    }
}
