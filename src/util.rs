#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::glob;
use which::which;

/// Finds and returns the path to the javac binary
pub fn javac_path() -> Result<OsString> {
    which("javac")
        .map(PathBuf::into_os_string)
        .context("Cannot find a Java compiler on path (javac)")
}

/// Finds and returns the path to the java binary
pub fn java_path() -> Result<OsString> {
    which("java")
        .map(PathBuf::into_os_string)
        .context("Cannot find a Java runtime on path (java)")
}

/// Enumerates the `.java` sources directly inside a submission folder.
///
/// Results are sorted so compiler invocations are deterministic across runs.
pub fn find_java_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.java");
    let pattern = pattern
        .to_str()
        .context("Could not convert submission folder to string")?
        .to_string();

    let mut sources: Vec<PathBuf> = glob(&pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .collect();
    sources.sort();

    Ok(sources)
}
