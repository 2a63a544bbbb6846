#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use anyhow::{Result, ensure};
use itertools::Itertools;

use crate::{records::PenaltyTable, types::GradingResult};

/// Share of the running subtotal removed for a structural defect.
const STRUCTURAL_RATE: f64 = 0.20;

/// Share of the running subtotal removed for missing headers.
const HEADER_RATE: f64 = 0.20;

/// Share of the running subtotal removed for a compilation failure.
const COMPILATION_RATE: f64 = 0.50;

/// One question's inputs to the two-stage calculator.
#[derive(Debug, Clone, Copy)]
pub struct QuestionResult {
    /// Score before any penalty.
    pub raw_score:         f64,
    /// The submitted structure (hierarchy) was wrong.
    pub structural_error:  bool,
    /// Required file headers were missing.
    pub header_error:      bool,
    /// The question's code failed to compile.
    pub compilation_error: bool,
}

impl From<&GradingResult> for QuestionResult {
    fn from(result: &GradingResult) -> Self {
        Self {
            raw_score:         result.raw_score,
            structural_error:  !result.proper_hierarchy,
            header_error:      !result.has_headers,
            compilation_error: result.compilation_error,
        }
    }
}

/// Ordered audit trail for one penalty computation.
///
/// Each calculator call returns its own report, so nothing leaks between
/// students and there is no buffer to drain.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// Report lines, in the order the deductions were applied.
    lines: Vec<String>,
}

impl AuditReport {
    /// Appends one line to the report.
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The report lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Display for AuditReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.iter().join("\n"))
    }
}

/// Computes whole-submission totals: compounding per-question percentage
/// penalties first, then externally loaded adjustments, clamped at zero.
pub struct GradeCalculator {
    /// External per-student adjustments, loaded once per session.
    penalties: PenaltyTable,
}

impl GradeCalculator {
    /// Creates a calculator over a loaded penalty table.
    pub fn new(penalties: PenaltyTable) -> Self {
        Self { penalties }
    }

    /// Applies the per-question penalty ladder to one raw score.
    ///
    /// Deductions compound on the running subtotal, in a fixed order:
    /// structural, then header, then compilation. `100` with structural and
    /// header defects yields `64.0`, not `60.0`.
    pub fn question_subtotal(question: &QuestionResult, audit: &mut AuditReport) -> f64 {
        let mut subtotal = question.raw_score;

        if question.structural_error {
            let deduction = subtotal * STRUCTURAL_RATE;
            subtotal -= deduction;
            audit.push(format!(
                "  structural error: -{deduction:.2} (subtotal {subtotal:.2})"
            ));
        }
        if question.header_error {
            let deduction = subtotal * HEADER_RATE;
            subtotal -= deduction;
            audit.push(format!(
                "  header error: -{deduction:.2} (subtotal {subtotal:.2})"
            ));
        }
        if question.compilation_error {
            let deduction = subtotal * COMPILATION_RATE;
            subtotal -= deduction;
            audit.push(format!(
                "  compilation error: -{deduction:.2} (subtotal {subtotal:.2})"
            ));
        }

        subtotal
    }

    /// Grades a whole submission.
    ///
    /// Sums every question's post-penalty subtotal, then applies each of the
    /// student's external adjustments exactly once, then clamps at zero.
    /// Returns the final grade with the audit report for this call.
    ///
    /// An empty identifier or an empty question list is a caller-contract
    /// violation and aborts before any work.
    pub fn grade_submission(
        &self,
        student_id: &str,
        questions: &[QuestionResult],
    ) -> Result<(f64, AuditReport)> {
        ensure!(
            !student_id.trim().is_empty(),
            "student identifier must not be empty"
        );
        ensure!(!questions.is_empty(), "no grading results to process");

        let mut audit = AuditReport::default();
        let mut total = 0.0;

        for (index, question) in questions.iter().enumerate() {
            audit.push(format!(
                "Question {}: raw {:.2}",
                index + 1,
                question.raw_score
            ));
            let subtotal = Self::question_subtotal(question, &mut audit);
            audit.push(format!("  subtotal: {subtotal:.2}"));
            total += subtotal;
        }

        audit.push(format!("Subtotal before adjustments: {total:.2}"));

        let records = self.penalties.lookup(student_id);
        if records.is_empty() {
            audit.push("No external penalties found");
        } else {
            for record in records {
                total += record.value;
                audit.push(format!(
                    "External adjustment: {:+.2} ({})",
                    record.value, record.reason
                ));
            }
        }

        let final_grade = total.max(0.0);
        audit.push(format!("Final grade: {final_grade:.2}"));

        Ok((final_grade, audit))
    }
}
