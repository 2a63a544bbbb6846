#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Result, ensure};
use tabled::{
    Table, Tabled,
    settings::{Modify, Panel, Style, Width, object::Rows},
};
use tracing::info;

use crate::{
    calculator::QuestionResult,
    config::GradingConfig,
    pipeline::{
        Compiler, HarnessStore, PermissiveInspector, Pipeline, Runner, StructureInspector,
        TaskFailure, TaskOutcome,
    },
    types::{GradingResult, Student, StructureReport},
};

/// Formats a score with at least one decimal place: `3.0`, `0.0`, `3.25`.
pub fn fmt_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        format!("{score}")
    }
}

/// One student's graded row: ordered task outcomes and the raw total,
/// before any penalty model runs.
#[derive(Debug)]
pub struct StudentSummary {
    /// Student identifier.
    pub student:  String,
    /// `(task id, outcome)` pairs, in task-table order.
    pub outcomes: Vec<(String, TaskOutcome)>,
    /// Sum of every task's score.
    pub total:    f64,
}

impl StudentSummary {
    /// Per-task fragments (`taskId:score`), each followed by two spaces,
    /// joined in declared task order.
    pub fn fragments(&self) -> String {
        self.outcomes
            .iter()
            .map(|(id, outcome)| format!("{id}:{}  ", fmt_score(outcome.score())))
            .collect()
    }

    /// The one-line report: `studentId: A:3.0  B:0.0  Total: 3.0`.
    pub fn line(&self) -> String {
        format!("{}: {}Total: {}", self.student, self.fragments(), fmt_score(self.total))
    }
}

/// Drives the outer loop over students and the inner loop over tasks.
///
/// Produces the raw, pre-penalty picture; the penalty models are applied
/// separately over what this emits.
pub struct Grader<C, H, R, I = PermissiveInspector> {
    /// Session configuration: ordered task table plus mapping.
    config:    GradingConfig,
    /// Per-task execution pipeline.
    pipeline:  Pipeline<C, H, R>,
    /// Structure-check collaborator feeding the penalty models.
    inspector: I,
}

impl<C, H, R, I> Grader<C, H, R, I>
where
    C: Compiler,
    H: HarnessStore,
    R: Runner,
    I: StructureInspector,
{
    /// Assembles a grader from a configuration and its collaborators.
    pub fn new(config: GradingConfig, pipeline: Pipeline<C, H, R>, inspector: I) -> Self {
        Self {
            config,
            pipeline,
            inspector,
        }
    }

    /// The session configuration this grader runs with.
    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grades one student across the configured task table, in order.
    ///
    /// Task failures convert to zero-score outcomes and the loop continues
    /// with the next task. An empty identifier is a caller-contract
    /// violation and aborts before any work.
    pub fn grade_student(&self, student: &Student) -> Result<StudentSummary> {
        ensure!(
            !student.id.trim().is_empty(),
            "student identifier must not be empty"
        );

        let mut outcomes = Vec::with_capacity(self.config.tasks.len());
        let mut total = 0.0;

        for task in &self.config.tasks {
            let outcome = self.grade_task(student, &task.id);
            info!(
                "{}: {} scored {}",
                student.id,
                task.id,
                fmt_score(outcome.score())
            );
            total += outcome.score();
            outcomes.push((task.id.clone(), outcome));
        }

        Ok(StudentSummary {
            student: student.id.clone(),
            outcomes,
            total,
        })
    }

    /// Grades every student, in roster order.
    pub fn grade_all(&self, students: &[Student]) -> Result<Vec<StudentSummary>> {
        students
            .iter()
            .map(|student| self.grade_student(student))
            .collect()
    }

    /// Resolves and runs a single task for `student`.
    ///
    /// Identifiers outside the task table fail the task with
    /// [`TaskFailure::UnknownTask`]; they never crash the run.
    pub fn grade_task(&self, student: &Student, task_id: &str) -> TaskOutcome {
        let Some(task) = self.config.resolve(task_id) else {
            return TaskOutcome::Failed(TaskFailure::UnknownTask(task_id.to_string()));
        };
        let dir = student.root.join(&task.folder);
        self.pipeline.run_task(&dir, &task.harness)
    }

    /// Builds one [`GradingResult`] per task outcome, combining the
    /// pipeline's compile verdict with the inspector's structure report.
    pub fn grading_results(&self, student: &Student, summary: &StudentSummary) -> Vec<GradingResult> {
        summary
            .outcomes
            .iter()
            .map(|(task_id, outcome)| {
                let (out_of, report) = match self.config.resolve(task_id) {
                    Some(task) => (
                        task.out_of,
                        self.inspector.inspect(&student.root.join(&task.folder)),
                    ),
                    None => (0.0, StructureReport::default()),
                };
                GradingResult::from_report(
                    outcome.score(),
                    out_of,
                    outcome.is_compile_failure(),
                    report,
                )
            })
            .collect()
    }

    /// Calculator inputs for a student's outcomes, one per task.
    pub fn question_results(&self, student: &Student, summary: &StudentSummary) -> Vec<QuestionResult> {
        self.grading_results(student, summary)
            .iter()
            .map(QuestionResult::from)
            .collect()
    }
}

/// Row shape for the grading overview table.
#[derive(Tabled)]
struct OverviewRow {
    /// Student identifier.
    #[tabled(rename = "Student")]
    student: String,
    /// Per-task fragments.
    #[tabled(rename = "Tasks")]
    tasks:   String,
    /// Raw total.
    #[tabled(rename = "Total")]
    total:   String,
}

/// Renders the grading overview for all students.
pub fn overview_table(summaries: &[StudentSummary]) -> String {
    let rows: Vec<OverviewRow> = summaries
        .iter()
        .map(|summary| OverviewRow {
            student: summary.student.clone(),
            tasks:   summary.fragments().trim_end().to_string(),
            total:   fmt_score(summary.total),
        })
        .collect();
    let combined: f64 = summaries.iter().map(|summary| summary.total).sum();

    Table::new(rows)
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!("Combined total: {combined:.2}")))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
        .with(Style::modern())
        .to_string()
}
