//! Calibrated temperature extraction from phase-0 warmup statistics
//!
//! Phase 0 runs the warmup procedure alone and records the distribution of
//! the final temperature per instance. Later phases skip their own warmup
//! and start from the calibrated value extracted here: the warmup MEAN.
//!
//! The coefficient of variation is computed purely as a diagnostic. A high
//! CV means the warmup did not converge to a stable temperature and the
//! operator should consider a longer warmup, but the calibrated value is
//! still emitted; withholding it would break every downstream phase over a
//! quality warning.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::warmup_stats_path;
use crate::error::{Diagnostic, PipelineError};

/// CV above this flags an instance for a longer warmup.
pub const HIGH_VARIANCE_CV: f64 = 0.30;

/// Warmup temperature statistics as written by the optimizer.
/// Extra keys (`min`, `max`, ...) are tolerated and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WarmupStats {
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
}

/// Per-instance calibration result.
#[derive(Debug, Clone)]
pub struct CalibrationRecord {
    pub instance: String,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    /// std / mean, +inf when mean <= 0
    pub cv: f64,
    /// CV exceeded [`HIGH_VARIANCE_CV`]
    pub high_variance: bool,
}

/// Outcome of a calibration pass over all instances.
#[derive(Debug)]
pub struct CalibrationOutcome {
    /// instance -> calibrated initial temperature (the warmup mean),
    /// sorted for stable JSON output
    pub temperatures: BTreeMap<String, f64>,
    pub records: Vec<CalibrationRecord>,
    /// Instances skipped for missing or unparseable stats files
    pub diagnostics: Vec<Diagnostic>,
}

/// Coefficient of variation of the warmup temperature.
///
/// Positive infinity when the mean is not positive: a zero or negative
/// mean temperature makes the ratio meaningless, and +inf guarantees the
/// high-variance flag fires instead of a division panic.
pub fn coefficient_of_variation(mean: f64, std: f64) -> f64 {
    if mean <= 0.0 {
        f64::INFINITY
    } else {
        std / mean
    }
}

impl CalibrationRecord {
    pub fn from_stats(instance: &str, stats: &WarmupStats) -> Self {
        let cv = coefficient_of_variation(stats.mean, stats.std);
        Self {
            instance: instance.to_string(),
            mean: stats.mean,
            std: stats.std,
            median: stats.median,
            q1: stats.q1,
            q3: stats.q3,
            cv,
            high_variance: cv > HIGH_VARIANCE_CV,
        }
    }
}

/// Load one instance's warmup stats record.
pub fn load_warmup_stats(path: &Path) -> Result<WarmupStats, PipelineError> {
    let raw = fs::read_to_string(path).map_err(|_| PipelineError::MissingFile {
        path: path.to_path_buf(),
    })?;
    serde_json::from_str(&raw).map_err(|e| PipelineError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Extract calibrated temperatures for every instance.
///
/// A missing stats file omits that instance from the output map and
/// records a diagnostic; it never aborts the batch. High-variance
/// instances are flagged and warned about but still calibrated.
pub fn extract(results_dir: &Path, instances: &[String], neighborhood: &str) -> CalibrationOutcome {
    let mut outcome = CalibrationOutcome {
        temperatures: BTreeMap::new(),
        records: Vec::new(),
        diagnostics: Vec::new(),
    };

    for instance in instances {
        let path = warmup_stats_path(results_dir, instance, neighborhood);
        let stats = match load_warmup_stats(&path) {
            Ok(stats) => stats,
            Err(PipelineError::MissingFile { path }) => {
                outcome.diagnostics.push(Diagnostic::new(
                    format!("phase0/{instance}"),
                    PipelineError::MissingCalibrationInput {
                        instance: instance.clone(),
                        path,
                    },
                ));
                continue;
            }
            Err(error) => {
                outcome
                    .diagnostics
                    .push(Diagnostic::new(format!("phase0/{instance}"), error));
                continue;
            }
        };

        let record = CalibrationRecord::from_stats(instance, &stats);
        if record.high_variance {
            tracing::warn!(
                "High variance for {}: CV = {:.3} (sigma={:.1}, mu={:.1}). \
                 Consider extended warmup duration.",
                instance,
                record.cv,
                record.std,
                record.mean
            );
        }

        outcome.temperatures.insert(instance.clone(), record.mean);
        outcome.records.push(record);
    }

    outcome
}

/// Print the per-instance calibration summary to stdout.
pub fn print_report(outcome: &CalibrationOutcome) {
    for record in &outcome.records {
        println!(
            "{}: mu(T) = {:.1}, sigma(T) = {:.1}, median = {:.1}, IQR = [{:.1}, {:.1}], CV = {:.3}",
            record.instance, record.mean, record.std, record.median, record.q1, record.q3, record.cv
        );
    }
    for diagnostic in &outcome.diagnostics {
        eprintln!("Warning: {diagnostic}");
    }
}

/// Write the instance -> temperature map as pretty JSON.
pub fn write_calibrated_temps(path: &Path, temperatures: &BTreeMap<String, f64>) -> Result<()> {
    let json = serde_json::to_string_pretty(temperatures).context("serialize calibrated temps")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write calibrated temps to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_stats(dir: &Path, instance: &str, neighborhood: &str, body: &str) {
        let phase0 = dir.join("phase0");
        fs::create_dir_all(&phase0).unwrap();
        fs::write(
            phase0.join(format!("{instance}_{neighborhood}_warmup_stats.json")),
            body,
        )
        .unwrap();
    }

    #[test]
    fn test_cv_normal_case() {
        assert!((coefficient_of_variation(1000.0, 400.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_cv_zero_mean_is_infinite() {
        assert!(coefficient_of_variation(0.0, 5.0).is_infinite());
        assert!(coefficient_of_variation(-1.0, 5.0).is_infinite());
    }

    #[test]
    fn test_high_variance_still_calibrated() {
        // CV = 0.4 > 0.30: flag set, value still emitted
        let stats = WarmupStats {
            mean: 1000.0,
            std: 400.0,
            median: 950.0,
            q1: 700.0,
            q3: 1200.0,
        };
        let record = CalibrationRecord::from_stats("inst1", &stats);
        assert!(record.high_variance);
        assert_eq!(record.mean, 1000.0);
    }

    #[test]
    fn test_low_variance_not_flagged() {
        let stats = WarmupStats {
            mean: 1000.0,
            std: 100.0,
            median: 990.0,
            q1: 930.0,
            q3: 1080.0,
        };
        let record = CalibrationRecord::from_stats("inst1", &stats);
        assert!(!record.high_variance);
        assert!((record.cv - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_extract_missing_instance_omitted() {
        let dir = TempDir::new().unwrap();
        write_stats(
            dir.path(),
            "inst1",
            "phase0-Swap",
            r#"{"mean": 5000.0, "std": 250.0, "median": 4900.0, "q1": 4800.0, "q3": 5200.0}"#,
        );

        let instances = vec!["inst1".to_string(), "inst2".to_string()];
        let outcome = extract(dir.path(), &instances, "phase0-Swap");

        assert_eq!(outcome.temperatures.len(), 1);
        assert_eq!(outcome.temperatures["inst1"], 5000.0);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(matches!(
            outcome.diagnostics[0].error,
            PipelineError::MissingCalibrationInput { .. }
        ));
    }

    #[test]
    fn test_extract_tolerates_extra_keys() {
        let dir = TempDir::new().unwrap();
        write_stats(
            dir.path(),
            "inst1",
            "phase0-Swap",
            r#"{"mean": 5000.0, "std": 250.0, "median": 4900.0, "q1": 4800.0,
                "q3": 5200.0, "min": 4400.0, "max": 5800.0}"#,
        );

        let outcome = extract(dir.path(), &["inst1".to_string()], "phase0-Swap");
        assert_eq!(outcome.temperatures["inst1"], 5000.0);
    }

    #[test]
    fn test_extract_malformed_json_is_diagnostic_not_abort() {
        let dir = TempDir::new().unwrap();
        write_stats(dir.path(), "inst1", "phase0-Swap", "not json at all");
        write_stats(
            dir.path(),
            "inst2",
            "phase0-Swap",
            r#"{"mean": 900.0, "std": 30.0, "median": 890.0, "q1": 870.0, "q3": 930.0}"#,
        );

        let instances = vec!["inst1".to_string(), "inst2".to_string()];
        let outcome = extract(dir.path(), &instances, "phase0-Swap");

        assert_eq!(outcome.temperatures.len(), 1);
        assert!(outcome.temperatures.contains_key("inst2"));
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(matches!(
            outcome.diagnostics[0].error,
            PipelineError::Malformed { .. }
        ));
    }

    #[test]
    fn test_write_calibrated_temps_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut temps = BTreeMap::new();
        temps.insert("inst1".to_string(), 5000.0);
        temps.insert("inst_concours".to_string(), 7250.5);

        let path = dir.path().join("calibrated_temps.json");
        write_calibrated_temps(&path, &temps).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, f64> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, temps);
    }
}
