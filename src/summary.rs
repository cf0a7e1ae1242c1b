//! Summary statistics over a group of trial outcomes
//!
//! Reduces one (phase, config, instance) group to central tendency,
//! dispersion, and feasibility metrics. Conventions match the reference
//! outputs the report was built from: population standard deviation
//! (divide by N) for descriptive statistics, percentiles by linear
//! interpolation between order statistics, and execution time reported in
//! seconds.
//!
//! The NaN/Inf validation pass lives here too. It is deliberately
//! non-fatal: a batch with an anomalous cell still gets written in full,
//! and the anomalies are surfaced as warnings for operator review.

use crate::error::{PipelineError, Result};
use crate::run_store::TrialOutcome;

/// Derived statistics for one result group.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub num_runs: usize,
    /// Minimum best_fitness across runs
    pub best: f64,
    pub mean: f64,
    /// Population standard deviation (divide by N)
    pub std: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    /// Fraction of runs with a true feasible flag, in [0, 1]
    pub feasible_rate: f64,
    /// Mean execution time, converted from milliseconds to seconds
    pub mean_time_s: f64,
}

/// One NaN/Inf finding from the batch validation pass.
#[derive(Debug, Clone)]
pub struct NumericAnomaly {
    /// Cell label, e.g. `EXP-01A/inst2`
    pub cell: String,
    pub column: &'static str,
    pub value: f64,
}

/// Arithmetic mean. Zero for an empty slice (callers guard emptiness
/// before interpreting the result).
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N, not N-1).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>();
    (sum_sq / values.len() as f64).sqrt()
}

/// Percentile of sorted data by linear interpolation between order
/// statistics: index = (p / 100) * (n - 1), interpolating between the
/// neighboring ranks when the index is fractional.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let index = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Reduce a result group to its summary record.
///
/// # Errors
/// `EmptyGroup` when `outcomes` is empty. An empty group must fail loudly
/// here rather than propagate NaN into the output table.
pub fn summarize(outcomes: &[TrialOutcome]) -> Result<SummaryRecord> {
    if outcomes.is_empty() {
        return Err(PipelineError::EmptyGroup {
            context: "result group".to_string(),
        });
    }

    let fitnesses: Vec<f64> = outcomes.iter().map(|o| o.best_fitness).collect();
    let times_ms: Vec<f64> = outcomes.iter().map(|o| o.execution_time_ms).collect();
    let feasible_count = outcomes.iter().filter(|o| o.feasible).count();

    let mut sorted = fitnesses.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(SummaryRecord {
        num_runs: outcomes.len(),
        best: sorted[0],
        mean: mean(&fitnesses),
        std: population_std(&fitnesses),
        median: percentile(&sorted, 50.0),
        q1: percentile(&sorted, 25.0),
        q3: percentile(&sorted, 75.0),
        feasible_rate: feasible_count as f64 / outcomes.len() as f64,
        mean_time_s: mean(&times_ms) / 1000.0,
    })
}

impl SummaryRecord {
    /// Numeric columns inspected by the batch validation pass.
    pub fn numeric_columns(&self) -> [(&'static str, f64); 8] {
        [
            ("best", self.best),
            ("mean", self.mean),
            ("std", self.std),
            ("median", self.median),
            ("q1", self.q1),
            ("q3", self.q3),
            ("feasible_rate", self.feasible_rate),
            ("mean_time_s", self.mean_time_s),
        ]
    }
}

/// Scan a batch of summary records for NaN/Inf values.
///
/// Returns findings instead of failing: the caller reports them as
/// warnings and the batch is still written.
pub fn find_anomalies<'a, I>(records: I) -> Vec<NumericAnomaly>
where
    I: IntoIterator<Item = (&'a str, &'a SummaryRecord)>,
{
    let mut anomalies = Vec::new();
    for (cell, record) in records {
        for (column, value) in record.numeric_columns() {
            if value.is_nan() || value.is_infinite() {
                anomalies.push(NumericAnomaly {
                    cell: cell.to_string(),
                    column,
                    value,
                });
            }
        }
    }
    anomalies
}
