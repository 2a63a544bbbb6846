#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # tally
//!
//! A batch autograder for student programming submissions. Point it at a
//! grading configuration and a directory of extracted submissions; it
//! injects each task's harness, compiles, runs, parses the reported score,
//! and prints per-student summaries. Supplying an external penalties file
//! additionally produces penalty-adjusted totals with audit reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use tally::{
    GradeCalculator, Grader, GradingConfig, PenaltyTable, Student, overview_table,
    pipeline::{DirHarnessStore, JavaRunner, JavacCompiler, PermissiveInspector, Pipeline},
};
use tracing::{Level, info, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade every submission under a directory
    Grade {
        /// External penalties file, if any.
        penalties:   Option<PathBuf>,
        /// Path to the grading configuration.
        config:      PathBuf,
        /// Directory of extracted student submissions.
        submissions: PathBuf,
    },
    /// Print the parsed grading configuration
    Info {
        /// Path to the grading configuration.
        config: PathBuf,
    },
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the config file path
    fn c() -> impl Parser<PathBuf> {
        positional::<PathBuf>("CONFIG").help("Path to the grading configuration (JSON)")
    }

    let grade = {
        let penalties = long("penalties")
            .help("External penalties file (studentId,value[,reason])")
            .argument::<PathBuf>("CSV")
            .optional();
        let config = c();
        let submissions = positional::<PathBuf>("SUBMISSIONS")
            .help("Directory of extracted student submissions");
        construct!(Cmd::Grade {
            penalties,
            config,
            submissions
        })
        .to_options()
        .command("grade")
        .help("Grade every submission under a directory")
    };

    let info = {
        let config = c();
        construct!(Cmd::Info { config })
            .to_options()
            .command("info")
            .help("Print the parsed grading configuration as JSON")
    };

    construct!([grade, info])
        .to_options()
        .descr("Batch autograder with a layered penalty engine")
        .run()
}

/// Lists submission roots under `dir`, one per student, in name order.
fn discover_students(dir: &Path) -> Result<Vec<Student>> {
    let mut students = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Could not read submissions directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.context("Could not read submissions directory entry")?;
        let path = entry.path();
        if path.is_dir() {
            let id = entry.file_name().to_string_lossy().into_owned();
            students.push(Student::new(id, path)?);
        }
    }

    students.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(students)
}

/// Wires the default capabilities and grades every submission folder.
fn grade_command(config_path: &Path, submissions: &Path, penalties: Option<&Path>) -> Result<()> {
    let config = GradingConfig::load(config_path)?;
    let timeout = config.run_timeout();

    let pipeline = Pipeline::new(
        JavacCompiler::new(timeout)?,
        DirHarnessStore::new(&config.harness_dir),
        JavaRunner::new(timeout)?,
    );
    let grader = Grader::new(config, pipeline, PermissiveInspector);

    let calculator = penalties
        .map(|path| PenaltyTable::load(path).map(GradeCalculator::new))
        .transpose()?;

    let students = discover_students(submissions)?;
    info!("grading {} submissions", students.len());

    let mut summaries = Vec::with_capacity(students.len());
    for student in &students {
        let summary = grader.grade_student(student)?;
        println!("{}", summary.line());

        if let Some(calculator) = &calculator {
            let questions = grader.question_results(student, &summary);
            let (final_grade, audit) = calculator.grade_submission(&student.id, &questions)?;
            println!("{audit}");
            info!("final grade for {}: {final_grade:.2}", student.id);
        }

        summaries.push(summary);
    }

    eprintln!("{}", overview_table(&summaries));
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Grade {
            penalties,
            config,
            submissions,
        } => grade_command(&config, &submissions, penalties.as_deref()),
        Cmd::Info { config } => {
            let config = GradingConfig::load(&config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
