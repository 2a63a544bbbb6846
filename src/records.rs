#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::HashMap, path::Path};

use anyhow::{Result, ensure};
use tracing::warn;

use crate::parsers::parser;

/// Reason label applied to rows that omit the third field.
pub const DEFAULT_REASON: &str = "No reason provided";

/// One externally declared adjustment for a student, e.g. a lateness
/// deduction. Values are signed; negative values deduct.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyRecord {
    /// Normalized owner identifier.
    pub student: String,
    /// Signed adjustment applied to the aggregated total.
    pub value:   f64,
    /// Free-text justification from the source.
    pub reason:  String,
}

/// Strips leading marker characters and lowercases an identifier.
///
/// Load-time and lookup-time spellings must agree, so every identifier
/// passes through here before it touches the table.
pub fn normalize_id(id: &str) -> String {
    id.trim().trim_start_matches('#').to_lowercase()
}

/// Externally loaded per-student adjustments, keyed by normalized
/// identifier. Built once per grading session and read-only afterwards.
#[derive(Debug, Default)]
pub struct PenaltyTable {
    /// Records grouped per normalized student identifier.
    records: HashMap<String, Vec<PenaltyRecord>>,
}

impl PenaltyTable {
    /// Loads the table from a comma-delimited file.
    ///
    /// An empty path is a caller error. An unreadable file degrades to an
    /// empty table with a warning, so grading proceeds with zero external
    /// penalties rather than aborting.
    pub fn load(path: &Path) -> Result<Self> {
        ensure!(
            !path.as_os_str().is_empty(),
            "external penalties path must not be empty"
        );

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "could not read external penalties from {}: {err}; continuing without them",
                    path.display()
                );
                return Ok(Self::default());
            }
        };

        Ok(Self::from_lines(text.lines()))
    }

    /// Builds the table from raw source lines.
    ///
    /// Rows with fewer than two fields or a non-numeric value are skipped
    /// with a warning; they never fail the load.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut records: HashMap<String, Vec<PenaltyRecord>> = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match parser::penalty_row(line) {
                Ok((id, value, reason)) => {
                    let student = normalize_id(&id);
                    if student.is_empty() {
                        warn!("skipping penalty row with empty identifier: {line}");
                        continue;
                    }
                    records.entry(student.clone()).or_default().push(PenaltyRecord {
                        student,
                        value,
                        reason: reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
                    });
                }
                Err(_) => warn!("skipping malformed penalty row: {line}"),
            }
        }

        Self { records }
    }

    /// Returns every record for `student`, insensitive to markers and case.
    pub fn lookup(&self, student: &str) -> &[PenaltyRecord] {
        self.records
            .get(&normalize_id(student))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of loaded records across all students.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}
