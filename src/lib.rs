//! # tally
//!
//! A batch autograder: for each student and each configured task it injects
//! a grading harness into the submitted code, compiles it, runs it, parses
//! the reported score, and applies a layered penalty model to produce final
//! grades and audit reports.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Two-stage penalty calculator: compounding per-question percentages plus
/// external adjustments, with per-call audit reports
pub mod calculator;
/// Grading session configuration: the task table and its mapping
pub mod config;
/// The orchestrator looping students and tasks, and report rendering
pub mod grade;
/// Grammars for harness transcripts and the external penalties source
pub mod parsers;
/// The single-stage penalty model: pluggable deduction strategies
pub mod penalty;
/// The per-task execution pipeline and its capability seams
pub mod pipeline;
/// Subprocess execution with bounded waits
pub mod process;
/// Externally loaded per-student penalty records
pub mod records;
/// Core value types shared across the crate
pub mod types;
/// Tool discovery helpers
pub mod util;

pub use crate::{
    calculator::{AuditReport, GradeCalculator, QuestionResult},
    config::{GradingConfig, TaskSpec},
    grade::{Grader, StudentSummary, overview_table},
    penalty::{PenaltyEngine, PenaltyStrategy, ProcessedScore},
    pipeline::{Pipeline, TaskFailure, TaskOutcome},
    records::{PenaltyRecord, PenaltyTable},
    types::{GradingResult, Student, StructureReport},
};
