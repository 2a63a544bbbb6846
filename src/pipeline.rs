#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::{
    parsers,
    process::Exec,
    types::StructureReport,
    util::{find_java_sources, java_path, javac_path},
};

/// Why a task produced no measured score.
#[derive(thiserror::Error, Debug)]
pub enum TaskFailure {
    /// The resolved submission folder does not exist.
    #[error("submission folder not found: {0}")]
    FolderMissing(PathBuf),
    /// Copying the harness into the submission folder failed.
    #[error("could not inject harness: {0}")]
    Injection(String),
    /// The sources in the folder did not compile.
    #[error("compilation failed")]
    Compile,
    /// The harness process failed to run to completion.
    #[error("harness run failed: {0}")]
    Run(String),
    /// The harness output carried no trailing numeric score. Kept distinct
    /// from a reported `0.0`.
    #[error("no score found in harness output")]
    Parse,
    /// The task identifier is not in the task table.
    #[error("unknown task: {0}")]
    UnknownTask(String),
}

/// Outcome of grading one task.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The harness ran and reported this score.
    Scored(f64),
    /// The task failed; it contributes zero to the total.
    Failed(TaskFailure),
}

impl TaskOutcome {
    /// Score this outcome contributes to the running total.
    pub fn score(&self) -> f64 {
        match self {
            TaskOutcome::Scored(score) => *score,
            TaskOutcome::Failed(_) => 0.0,
        }
    }

    /// True when the harness ran and its output parsed.
    pub fn is_scored(&self) -> bool {
        matches!(self, TaskOutcome::Scored(_))
    }

    /// True when the task failed at the compile step.
    pub fn is_compile_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failed(TaskFailure::Compile))
    }
}

/// Compiles every source file in a submission folder.
pub trait Compiler {
    /// Returns whether compilation succeeded. `Err` means the compiler
    /// could not be invoked at all; there is no partial-success state.
    fn compile(&self, dir: &Path) -> Result<bool>;
}

/// Supplies harness sources by file name.
pub trait HarnessStore {
    /// Returns the named harness's contents.
    fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

/// Executes a harness entry point and captures its stdout.
pub trait Runner {
    /// Runs `entry` inside `dir` and returns the complete stdout text.
    /// Abnormal termination must surface as an `Err`, never as empty
    /// output.
    fn run(&self, entry: &str, dir: &Path) -> Result<String>;
}

/// Reports submission-structure defects consumed by the penalty models.
pub trait StructureInspector {
    /// Inspects one submission folder.
    fn inspect(&self, dir: &Path) -> StructureReport;
}

/// Inspector that reports no defects. The real naming and hierarchy checks
/// live outside this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveInspector;

impl StructureInspector for PermissiveInspector {
    fn inspect(&self, _dir: &Path) -> StructureReport {
        StructureReport::default()
    }
}

/// Harness sources resolved from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirHarnessStore {
    /// Directory the harness sources live in.
    dir: PathBuf,
}

impl DirHarnessStore {
    /// Creates a store over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl HarnessStore for DirHarnessStore {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(name);
        std::fs::read(&path).with_context(|| format!("Could not read harness {}", path.display()))
    }
}

/// `javac`-backed compiler over every `.java` file in the folder.
pub struct JavacCompiler {
    /// Process executor for compiler invocations.
    exec:    Exec,
    /// Bounded wait for one invocation.
    timeout: Duration,
}

impl JavacCompiler {
    /// Creates a compiler with the given bounded wait per invocation.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            exec: Exec::new()?,
            timeout,
        })
    }
}

impl Compiler for JavacCompiler {
    fn compile(&self, dir: &Path) -> Result<bool> {
        let sources = find_java_sources(dir)?;
        if sources.is_empty() {
            return Ok(false);
        }

        let mut args: Vec<OsString> = vec![
            "-cp".into(),
            dir.as_os_str().to_owned(),
            "-d".into(),
            dir.as_os_str().to_owned(),
        ];
        args.extend(sources.iter().map(|path| path.as_os_str().to_owned()));

        let collected = self
            .exec
            .run(javac_path()?, &args, Some(dir), Some(self.timeout))?;
        Ok(collected.status.success())
    }
}

/// `java`-backed harness runner.
pub struct JavaRunner {
    /// Process executor for harness invocations.
    exec:    Exec,
    /// Bounded wait for one harness run.
    timeout: Duration,
}

impl JavaRunner {
    /// Creates a runner with the given bounded wait per harness run.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            exec: Exec::new()?,
            timeout,
        })
    }
}

impl Runner for JavaRunner {
    fn run(&self, entry: &str, dir: &Path) -> Result<String> {
        let args: Vec<OsString> = vec!["-cp".into(), dir.as_os_str().to_owned(), entry.into()];
        let collected = self
            .exec
            .run(java_path()?, &args, Some(dir), Some(self.timeout))?;

        if !collected.status.success() {
            bail!(
                "harness exited with {}: {}",
                collected.status,
                collected.stderr_text().trim()
            );
        }

        Ok(collected.stdout_text())
    }
}

/// Entry-point class name for a harness source file.
fn harness_entry(harness: &str) -> &str {
    harness.strip_suffix(".java").unwrap_or(harness)
}

/// Runs the per-task grading sequence: existence check, harness injection,
/// compile, run, parse. Each step is gated on the prior step's success.
pub struct Pipeline<C, H, R> {
    /// Compiler capability.
    compiler:  C,
    /// Harness source repository.
    harnesses: H,
    /// Harness execution capability.
    runner:    R,
}

impl<C: Compiler, H: HarnessStore, R: Runner> Pipeline<C, H, R> {
    /// Assembles a pipeline from its three capabilities.
    pub fn new(compiler: C, harnesses: H, runner: R) -> Self {
        Self {
            compiler,
            harnesses,
            runner,
        }
    }

    /// Grades one task folder.
    ///
    /// Every step failure converts to a typed zero-score outcome for this
    /// task only; nothing propagates past the task boundary.
    pub fn run_task(&self, dir: &Path, harness: &str) -> TaskOutcome {
        match self.try_run(dir, harness) {
            Ok(score) => TaskOutcome::Scored(score),
            Err(failure) => {
                warn!("task failed in {}: {failure}", dir.display());
                TaskOutcome::Failed(failure)
            }
        }
    }

    /// The gated step sequence behind [`Pipeline::run_task`].
    fn try_run(&self, dir: &Path, harness: &str) -> Result<f64, TaskFailure> {
        if !dir.is_dir() {
            return Err(TaskFailure::FolderMissing(dir.to_path_buf()));
        }

        let bytes = self
            .harnesses
            .fetch(harness)
            .map_err(|err| TaskFailure::Injection(err.to_string()))?;
        std::fs::write(dir.join(harness), bytes)
            .map_err(|err| TaskFailure::Injection(err.to_string()))?;

        let compiled = self.compiler.compile(dir).unwrap_or_else(|err| {
            warn!("compiler invocation failed: {err:#}");
            false
        });
        if !compiled {
            return Err(TaskFailure::Compile);
        }

        let output = self
            .runner
            .run(harness_entry(harness), dir)
            .map_err(|err| TaskFailure::Run(err.to_string()))?;

        parsers::final_score(&output).ok_or(TaskFailure::Parse)
    }
}
