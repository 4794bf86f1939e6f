//! Test-results snapshot written by the external test runner.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Recorded outcome of one test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(rename = "testResults", default)]
    test_results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    name: String,
    status: String,
}

/// Parsed snapshot. Its file modification time is the staleness baseline.
#[derive(Debug, Clone)]
pub struct ResultsSnapshot {
    pub path: PathBuf,
    pub recorded_at: SystemTime,
    outcomes: HashMap<String, TestOutcome>,
}

impl ResultsSnapshot {
    /// Load the snapshot. An absent file is `None`; so is an unparseable one, after a warning.
    pub fn load(path: &Path) -> Option<Self> {
        let recorded_at = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Cannot read test results {}: {}", path.display(), e);
                return None;
            }
        };
        match Self::parse(path, &content, recorded_at) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Ignoring malformed test results {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn parse(path: &Path, content: &str, recorded_at: SystemTime) -> serde_json::Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(content)?;
        let outcomes = raw
            .test_results
            .into_iter()
            .map(|r| {
                let outcome =
                    if r.status == "passed" { TestOutcome::Passed } else { TestOutcome::Failed };
                (r.name, outcome)
            })
            .collect();
        Ok(Self { path: path.to_path_buf(), recorded_at, outcomes })
    }

    /// Outcome recorded under exactly one of `names` (checked in order).
    pub fn outcome_for(&self, names: &[&str]) -> Option<TestOutcome> {
        names.iter().find_map(|name| self.outcomes.get(*name).copied())
    }

    pub fn recorded_at_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.recorded_at)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
