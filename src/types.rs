#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// One submitter: a roster identifier plus the resolved root of their
/// extracted submission tree. The root is resolved once and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Identifier as it appears in the roster.
    pub id:   String,
    /// Root directory containing this student's task folders.
    pub root: PathBuf,
}

impl Student {
    /// Creates a student, rejecting empty identifiers up front.
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Result<Self> {
        let id = id.into();
        ensure!(!id.trim().is_empty(), "student identifier must not be empty");
        Ok(Self {
            id,
            root: root.into(),
        })
    }
}

/// Structure-check verdicts for one submission folder, as reported by a
/// [`crate::pipeline::StructureInspector`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StructureReport {
    /// File and class names follow the hand-in rules.
    pub naming_correct:   bool,
    /// The submitted folder hierarchy matches the hand-in rules.
    pub proper_hierarchy: bool,
    /// The required file headers are present.
    pub has_headers:      bool,
}

impl Default for StructureReport {
    fn default() -> Self {
        Self {
            naming_correct:   true,
            proper_hierarchy: true,
            has_headers:      true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
/// One question's raw outcome, captured before any penalty model runs.
/// Instances are built once per task run and never mutated.
pub struct GradingResult {
    /// Score the harness reported.
    pub raw_score:         f64,
    /// Maximum score the harness could have reported.
    pub max_score:         f64,
    /// The submission failed to compile.
    #[builder(default)]
    pub compilation_error: bool,
    /// File and class names follow the hand-in rules.
    #[builder(default = true)]
    pub naming_correct:    bool,
    /// The submitted folder hierarchy matches the hand-in rules.
    #[builder(default = true)]
    pub proper_hierarchy:  bool,
    /// The required file headers are present.
    #[builder(default = true)]
    pub has_headers:       bool,
}

impl GradingResult {
    /// Builds a result from a raw score and a structure report.
    pub fn from_report(
        raw_score: f64,
        max_score: f64,
        compilation_error: bool,
        report: StructureReport,
    ) -> Self {
        Self {
            raw_score,
            max_score,
            compilation_error,
            naming_correct: report.naming_correct,
            proper_hierarchy: report.proper_hierarchy,
            has_headers: report.has_headers,
        }
    }
}
