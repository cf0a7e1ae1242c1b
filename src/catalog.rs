//! Experiment catalog: phases, configurations, instances
//!
//! The campaign's cross-product of (phase x configuration x instance) is
//! plain data handed to the driver, not module-level state, so the driver
//! can be exercised against a synthetic catalog in tests.

use std::path::{Path, PathBuf};

/// The two phase-0 warmup neighborhoods eligible for calibration.
pub const NEIGHBORHOODS: [&str; 2] = ["phase0-Swap", "phase0-TwoOpt"];

/// One experimental phase: its report number, its results subdirectory,
/// and the configuration ids it ran.
#[derive(Debug, Clone)]
pub struct PhaseSpec {
    /// Phase number as shown in the report tables ("0".."4")
    pub number: String,
    /// Subdirectory of the results root holding this phase's files
    pub dir: String,
    /// Configuration ids run in this phase
    pub configs: Vec<String>,
}

/// Full experiment catalog handed to the aggregation driver.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub instances: Vec<String>,
    pub phases: Vec<PhaseSpec>,
}

impl Catalog {
    /// The catalog of the TSPTW campaign: five phases over four instances.
    pub fn standard() -> Self {
        let phases = vec![
            PhaseSpec {
                number: "0".to_string(),
                dir: "phase0".to_string(),
                configs: vec!["phase0-Swap".to_string(), "phase0-TwoOpt".to_string()],
            },
            PhaseSpec {
                number: "1".to_string(),
                dir: "exp01".to_string(),
                configs: vec![
                    "EXP-01A".to_string(),
                    "EXP-01B".to_string(),
                    "EXP-01C".to_string(),
                    "EXP-01D".to_string(),
                ],
            },
            PhaseSpec {
                number: "2".to_string(),
                dir: "exp02".to_string(),
                configs: vec!["EXP-02A".to_string(), "EXP-02B".to_string()],
            },
            PhaseSpec {
                number: "3".to_string(),
                dir: "exp03".to_string(),
                configs: vec![
                    "EXP-03A".to_string(),
                    "EXP-03B".to_string(),
                    "EXP-03C".to_string(),
                    "EXP-03D".to_string(),
                ],
            },
            PhaseSpec {
                number: "4".to_string(),
                dir: "exp04".to_string(),
                configs: vec!["EXP-04A".to_string(), "EXP-04B".to_string()],
            },
        ];

        Self {
            instances: vec![
                "inst1".to_string(),
                "inst2".to_string(),
                "inst3".to_string(),
                "inst_concours".to_string(),
            ],
            phases,
        }
    }

    /// Total number of (phase, config, instance) cells enumerated.
    pub fn cell_count(&self) -> usize {
        self.phases.iter().map(|p| p.configs.len()).sum::<usize>() * self.instances.len()
    }
}

/// Short instance label used in report tables.
pub fn short_label(instance: &str) -> &str {
    match instance {
        "inst_concours" => "concours",
        other => other,
    }
}

/// Path of a per-run results table: `{dir}/{inst}_{config}_runs.csv`
pub fn runs_path(results_dir: &Path, phase_dir: &str, instance: &str, config: &str) -> PathBuf {
    results_dir
        .join(phase_dir)
        .join(format!("{instance}_{config}_runs.csv"))
}

/// Path of a per-run convergence table: `{dir}/{inst}_{config}_convergence.csv`
pub fn convergence_path(
    results_dir: &Path,
    phase_dir: &str,
    instance: &str,
    config: &str,
) -> PathBuf {
    results_dir
        .join(phase_dir)
        .join(format!("{instance}_{config}_convergence.csv"))
}

/// Path of a phase-0 warmup statistics record:
/// `phase0/{inst}_{neighborhood}_warmup_stats.json`
pub fn warmup_stats_path(results_dir: &Path, instance: &str, neighborhood: &str) -> PathBuf {
    results_dir
        .join("phase0")
        .join(format!("{instance}_{neighborhood}_warmup_stats.json"))
}
