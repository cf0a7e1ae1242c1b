//! Error kinds for the aggregation pipeline
//!
//! The pipeline's central failure-handling contract is collect-all-errors:
//! every per-cell failure (missing file, empty group, too few matched runs)
//! is caught at the cell boundary and converted into a [`Diagnostic`] entry,
//! so one bad input never aborts a batch. The only process-fatal condition
//! is an unusable output path, which is handled with `anyhow` at the binary
//! boundary.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors for aggregation and comparison operations
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing input file: {path}")]
    MissingFile { path: PathBuf },

    #[error("no data rows in {context}")]
    EmptyGroup { context: String },

    #[error("only {found} matched run ids between {left} and {right} (need at least 2)")]
    InsufficientPairs {
        left: String,
        right: String,
        found: usize,
    },

    #[error("warmup stats missing for {instance}: {path}")]
    MissingCalibrationInput { instance: String, path: PathBuf },

    #[error("failed to parse {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// One skipped cell of the (phase, config, instance) cross-product.
///
/// Diagnostics are accumulated during a batch and enumerated in the final
/// report; they never carry control flow across the batch boundary.
#[derive(Debug)]
pub struct Diagnostic {
    /// Cell label, e.g. `1/EXP-01A/inst2`
    pub cell: String,
    pub error: PipelineError,
}

impl Diagnostic {
    pub fn new(cell: impl Into<String>, error: PipelineError) -> Self {
        Self {
            cell: cell.into(),
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.cell, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message_includes_path() {
        let err = PipelineError::MissingFile {
            path: PathBuf::from("results/exp01/inst1_EXP-01A_runs.csv"),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing input file"));
        assert!(msg.contains("inst1_EXP-01A_runs.csv"));
    }

    #[test]
    fn test_insufficient_pairs_message() {
        let err = PipelineError::InsufficientPairs {
            left: "EXP-04A".to_string(),
            right: "EXP-04B".to_string(),
            found: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("only 1 matched run ids"));
        assert!(msg.contains("EXP-04A"));
        assert!(msg.contains("EXP-04B"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(
            "1/EXP-01A/inst2",
            PipelineError::EmptyGroup {
                context: "results/exp01/inst2_EXP-01A_runs.csv".to_string(),
            },
        );
        let msg = diag.to_string();
        assert!(msg.starts_with("1/EXP-01A/inst2: "));
        assert!(msg.contains("no data rows"));
    }
}
