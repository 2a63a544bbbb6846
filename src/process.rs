#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::Stdio,
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{process::Command, time::timeout};

/// Captured result of a finished subprocess.
#[derive(Debug)]
pub struct Collected {
    /// Exit status returned by the process.
    pub status: std::process::ExitStatus,
    /// Contents written to stdout.
    pub stdout: Vec<u8>,
    /// Contents written to stderr.
    pub stderr: Vec<u8>,
}

impl Collected {
    /// Stdout as lossily decoded text.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr as lossily decoded text.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawns a command with no stdin and collects stdout/stderr, waiting at
/// most `deadline` when one is given. Expiry kills the child and surfaces
/// as an error.
pub async fn run_collect(
    program: impl AsRef<OsStr>,
    args: &[OsString],
    cwd: Option<&Path>,
    deadline: Option<Duration>,
) -> Result<Collected> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().context("failed to spawn process")?;
    let wait = child.wait_with_output();

    let output = match deadline {
        Some(limit) => timeout(limit, wait)
            .await
            .context("subprocess timed out")?
            .context("failed to wait on process")?,
        None => wait.await.context("failed to wait on process")?,
    };

    Ok(Collected {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Executes subprocesses to completion on a private current-thread runtime.
///
/// Grading is strictly sequential, so call sites stay synchronous and block
/// until the invoked process terminates or its deadline elapses.
pub struct Exec {
    /// Runtime the executor blocks on.
    runtime: tokio::runtime::Runtime,
}

impl Exec {
    /// Builds the executor and its runtime.
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build process runtime")?;
        Ok(Self { runtime })
    }

    /// Runs a command to completion and collects its output.
    pub fn run(
        &self,
        program: impl AsRef<OsStr>,
        args: &[OsString],
        cwd: Option<&Path>,
        deadline: Option<Duration>,
    ) -> Result<Collected> {
        self.runtime.block_on(run_collect(program, args, cwd, deadline))
    }
}
