#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Default bounded wait for one compiler or harness invocation, in seconds.
fn default_run_timeout() -> u64 {
    30
}

/// Default maximum score for a task when the config omits one.
fn default_out_of() -> f64 {
    100.0
}

/// Maps one gradable task onto its submission folder and harness.
///
/// Several tasks may share one folder (two sub-parts graded from the same
/// submitted code), each with its own harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task identifier as it appears in reports, e.g. `Q1A`.
    pub id:      String,
    /// Folder holding the task's code, relative to the student's root.
    pub folder:  String,
    /// Harness source file injected into the folder and executed.
    pub harness: String,
    /// Maximum score the harness can award for this task.
    #[serde(default = "default_out_of")]
    pub out_of:  f64,
}

/// Grading session configuration, loaded from a JSON file.
///
/// Nothing about the task table is baked into the binary; the orchestrator
/// receives this value at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Ordered task table; summaries follow this order, not discovery order.
    pub tasks:            Vec<TaskSpec>,
    /// Directory holding the harness sources named by the task table.
    pub harness_dir:      PathBuf,
    /// Bounded wait for one compiler or harness invocation, in seconds.
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: u64,
}

impl GradingConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Could not parse config file {}", path.display()))?;
        ensure!(!config.tasks.is_empty(), "task table must not be empty");
        Ok(config)
    }

    /// Resolves a task identifier to its folder/harness entry.
    ///
    /// Identifiers outside the table resolve to `None`; callers treat that
    /// as a failed task, never a crash.
    pub fn resolve(&self, task_id: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Bounded wait for a single compiler or harness invocation.
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}
