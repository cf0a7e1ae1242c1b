//! Loading of per-run trial tables
//!
//! Each `{inst}_{config}_runs.csv` holds one row per independent trial of a
//! configuration on an instance. The optimizer writes more columns than the
//! pipeline consumes (`total_distance`, `violations`, ...); deserialization
//! keys off the header row and ignores the rest.
//!
//! Boolean-ish text is everywhere in these tables (`"true"`, `"1"`,
//! `"1.0"`, exported by different optimizer builds), so the truthiness
//! predicate lives here, once, and every consumer goes through it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{PipelineError, Result};

/// One independent trial of a configuration on an instance.
///
/// Immutable once loaded; `run_id` is unique within a well-formed group,
/// but duplicates are tolerated (indexing by id is last-write-wins).
#[derive(Debug, Clone, Deserialize)]
pub struct TrialOutcome {
    pub run_id: u64,
    /// Lower-is-better objective value
    pub best_fitness: f64,
    pub execution_time_ms: f64,
    /// Absent column or unrecognized text parse as `false`
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub feasible: bool,
}

/// Permissive boolean parsing shared by every consumer.
///
/// A field is true when, case-insensitively, it equals `"true"`, `"1"`,
/// or `"1.0"`. Anything else (including empty text) is false.
pub fn is_truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "1.0"
    )
}

fn deserialize_truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(is_truthy).unwrap_or(false))
}

/// Load all trial outcomes from a runs CSV.
///
/// # Errors
/// - `MissingFile` when `path` does not exist
/// - `Malformed` when a row cannot be deserialized
///
/// A file that exists but has no data rows returns an empty vector, not an
/// error; callers decide whether empty is fatal for their context.
pub fn load_runs(path: &Path) -> Result<Vec<TrialOutcome>> {
    if !path.is_file() {
        return Err(PipelineError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| PipelineError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut outcomes = Vec::new();
    for row in reader.deserialize() {
        let outcome: TrialOutcome = row.map_err(|e| PipelineError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Index a group by run id. Duplicate ids resolve to the last row seen.
pub fn index_by_run(outcomes: &[TrialOutcome]) -> HashMap<u64, &TrialOutcome> {
    let mut by_run = HashMap::with_capacity(outcomes.len());
    for outcome in outcomes {
        by_run.insert(outcome.run_id, outcome);
    }
    by_run
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_is_truthy_accepted_forms() {
        assert!(is_truthy("true"));
        assert!(is_truthy("True"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("1"));
        assert!(is_truthy("1.0"));
        assert!(is_truthy(" 1 "));
    }

    #[test]
    fn test_is_truthy_rejected_forms() {
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("0.0"));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("2"));
    }

    #[test]
    fn test_load_runs_basic() {
        let file = write_csv(
            "run_id,best_fitness,execution_time_ms,feasible\n\
             0,1234.5,60000,true\n\
             1,1250.0,61000,false\n",
        );
        let outcomes = load_runs(file.path()).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].run_id, 0);
        assert_eq!(outcomes[0].best_fitness, 1234.5);
        assert!(outcomes[0].feasible);
        assert!(!outcomes[1].feasible);
    }

    #[test]
    fn test_load_runs_tolerates_extra_columns() {
        let file = write_csv(
            "run_id,config,best_fitness,best_step,final_fitness,final_temperature,\
             violations,feasible,total_distance,total_time,execution_time_ms\n\
             0,EXP-01A,1234.5,99,1300.0,0.01,0,1,540.2,410.0,60000\n",
        );
        let outcomes = load_runs(file.path()).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].best_fitness, 1234.5);
        assert!(outcomes[0].feasible);
        assert_eq!(outcomes[0].execution_time_ms, 60000.0);
    }

    #[test]
    fn test_load_runs_numeric_feasible_forms() {
        let file = write_csv(
            "run_id,best_fitness,execution_time_ms,feasible\n\
             0,100.0,1000,1.0\n\
             1,110.0,1000,0.0\n\
             2,120.0,1000,garbage\n",
        );
        let outcomes = load_runs(file.path()).unwrap();
        assert!(outcomes[0].feasible);
        assert!(!outcomes[1].feasible);
        assert!(!outcomes[2].feasible);
    }

    #[test]
    fn test_load_runs_missing_feasible_column() {
        let file = write_csv(
            "run_id,best_fitness,execution_time_ms\n\
             0,100.0,1000\n",
        );
        let outcomes = load_runs(file.path()).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].feasible);
    }

    #[test]
    fn test_load_runs_header_only_is_empty_not_error() {
        let file = write_csv("run_id,best_fitness,execution_time_ms,feasible\n");
        let outcomes = load_runs(file.path()).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_load_runs_missing_file() {
        let err = load_runs(Path::new("/nonexistent/inst1_EXP-01A_runs.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingFile { .. }));
    }

    #[test]
    fn test_load_runs_malformed_numeric() {
        let file = write_csv(
            "run_id,best_fitness,execution_time_ms,feasible\n\
             0,not_a_number,1000,true\n",
        );
        let err = load_runs(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Malformed { .. }));
    }

    #[test]
    fn test_index_by_run_last_write_wins() {
        let file = write_csv(
            "run_id,best_fitness,execution_time_ms,feasible\n\
             0,100.0,1000,true\n\
             0,200.0,2000,false\n\
             1,150.0,1500,true\n",
        );
        let outcomes = load_runs(file.path()).unwrap();
        assert_eq!(outcomes.len(), 3);

        let by_run = index_by_run(&outcomes);
        assert_eq!(by_run.len(), 2);
        assert_eq!(by_run[&0].best_fitness, 200.0);
        assert_eq!(by_run[&1].best_fitness, 150.0);
    }
}
