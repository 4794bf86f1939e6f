//! Core domain types shared across the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Test status of one scenario. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Missing,
    Failing,
    Passing,
    Stale,
    Deferred,
}

impl ScenarioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Failing => "failing",
            Self::Passing => "passing",
            Self::Stale => "stale",
            Self::Deferred => "deferred",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived status of a use-case outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Satisfied,
    Unsatisfied,
    Deferred,
    Unknown,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::Unsatisfied => "unsatisfied",
            Self::Deferred => "deferred",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found in one source file. The engine reports these and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecIssue {
    pub path: String,
    pub message: String,
}

impl SpecIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

impl fmt::Display for SpecIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A parsed user journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    /// File stem of the journey document.
    pub id: String,
    pub name: String,
    pub actor: String,
    pub goal: String,
    pub steps: Vec<JourneyStep>,
    pub path: PathBuf,
    pub hash: String,
}

impl Journey {
    /// Scenario paths linked from steps, in step order.
    pub fn linked_scenarios(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| s.scenario.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyStep {
    pub description: String,
    /// Root-relative scenario file linked from the step, if any.
    pub scenario: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Core,
    Extension,
    Experimental,
}

impl FeatureKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "core" => Some(Self::Core),
            "extension" => Some(Self::Extension),
            "experimental" => Some(Self::Experimental),
            _ => None,
        }
    }
}

/// Located scenario with its resolved status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioRecord {
    pub slug: String,
    /// Fully qualified id: `<feature-id>/<slug>`.
    pub id: String,
    pub phase: Option<u32>,
    pub status: ScenarioStatus,
    pub scenario_path: String,
    pub test_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    pub id: String,
    pub area: String,
    pub name: String,
    pub summary: String,
    pub kind: Option<FeatureKind>,
    pub phase: Option<u32>,
    pub use_cases: Vec<String>,
    /// Root-relative path of the feature metadata file.
    pub path: String,
    pub scenarios: Vec<ScenarioRecord>,
    pub has_tests: bool,
    pub all_passing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeReport {
    pub description: String,
    pub scenarios: Vec<String>,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCaseStatus {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub actors: Vec<String>,
    pub path: String,
    pub outcomes: Vec<OutcomeReport>,
    /// Flat scenario list from the older use-case format.
    pub legacy_scenarios: Vec<String>,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyStatus {
    pub id: String,
    pub name: String,
    pub actor: String,
    pub goal: String,
    pub path: String,
    pub scenario_count: usize,
    pub scenarios_missing: usize,
    pub scenarios_passing: usize,
    /// The journey changed since the manifest last recorded it ("needs sync").
    pub is_stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorSummary {
    pub name: String,
    pub use_cases: Vec<String>,
}

/// Read-only view of the working tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GitSnapshot {
    pub available: bool,
    pub branch: String,
    pub staged: usize,
    pub modified: usize,
    pub untracked: usize,
}

impl GitSnapshot {
    pub fn unavailable() -> Self {
        Self { available: false, branch: "unknown".to_string(), ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeatureCounts {
    pub total: usize,
    pub with_tests: usize,
    pub passing: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScenarioCounts {
    pub total: usize,
    pub with_tests: usize,
    pub passing: usize,
    pub failing: usize,
    pub stale: usize,
    pub missing: usize,
    pub deferred: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusSummary {
    pub features: FeatureCounts,
    pub scenarios: ScenarioCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Gaps {
    pub features_without_tests: Vec<String>,
    pub scenarios_without_tests: Vec<String>,
    pub failing_scenarios: Vec<String>,
    pub stale_scenarios: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsInfo {
    pub path: String,
    pub present: bool,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestInfo {
    pub path: String,
    pub corrupted: bool,
    pub reason: Option<String>,
}

/// The aggregate project view, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatus {
    pub current_phase: u32,
    pub features: Vec<FeatureStatus>,
    pub use_cases: Vec<UseCaseStatus>,
    pub journeys: Vec<JourneyStatus>,
    pub actors: Vec<ActorSummary>,
    pub orphaned_scenarios: Vec<String>,
    pub git: GitSnapshot,
    pub summary: StatusSummary,
    pub gaps: Gaps,
    /// Passing share of non-deferred scenarios, 0-100.
    pub completeness: u32,
    pub results: ResultsInfo,
    pub manifest: ManifestInfo,
    pub issues: Vec<SpecIssue>,
}
