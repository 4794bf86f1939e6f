//! Feature and scenario locator.
//!
//! Walks the feature tree, pairs every scenario file with its test file, and classifies
//! each scenario into a [`ScenarioStatus`].

pub mod feature;
pub mod phase;
pub mod results;

pub use feature::{decode_feature, FeatureSpec};
pub use phase::{current_phase, is_deferred, scenario_phase};
pub use results::{ResultsSnapshot, TestOutcome};

use crate::config::ProjectLayout;
use crate::domain::{FeatureStatus, ScenarioRecord, ScenarioStatus, SpecIssue};
use crate::schema::parse_yaml;
use crate::utils::{display_relative, modified_time, read_text};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

pub const FEATURE_METADATA_FILE: &str = "_feature.yml";
pub const SCENARIO_EXTENSION: &str = "feature";

/// Everything the status rules look at for one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub deferred: bool,
    pub test_exists: bool,
    pub snapshot: Option<SnapshotEvidence>,
}

/// What the results snapshot says about one scenario's test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEvidence {
    pub recorded_at: SystemTime,
    /// Later of the test and scenario modification times; `None` when unreadable.
    pub newest_input: Option<SystemTime>,
    pub outcome: Option<TestOutcome>,
}

/// Classify a scenario. The checks run in a fixed order and the first match wins:
/// deferred, missing test, no snapshot, inputs newer than the snapshot, no recorded
/// entry, then the recorded pass/fail.
pub fn classify(evidence: &Evidence) -> ScenarioStatus {
    if evidence.deferred {
        return ScenarioStatus::Deferred;
    }
    if !evidence.test_exists {
        return ScenarioStatus::Missing;
    }
    let Some(snapshot) = &evidence.snapshot else {
        return ScenarioStatus::Stale;
    };
    match snapshot.newest_input {
        Some(newest) if newest <= snapshot.recorded_at => {}
        _ => return ScenarioStatus::Stale,
    }
    match snapshot.outcome {
        None => ScenarioStatus::Stale,
        Some(TestOutcome::Passed) => ScenarioStatus::Passing,
        Some(TestOutcome::Failed) => ScenarioStatus::Failing,
    }
}

/// Features located under the feature tree, plus problems met on the way.
#[derive(Debug, Clone, Default)]
pub struct LocatedFeatures {
    pub features: Vec<FeatureStatus>,
    pub issues: Vec<SpecIssue>,
}

pub struct ScenarioLocator<'a> {
    layout: &'a ProjectLayout,
    current_phase: u32,
    results: Option<&'a ResultsSnapshot>,
}

impl<'a> ScenarioLocator<'a> {
    pub fn new(
        layout: &'a ProjectLayout,
        current_phase: u32,
        results: Option<&'a ResultsSnapshot>,
    ) -> Self {
        Self { layout, current_phase, results }
    }

    /// Locate every feature with its scenarios, in path order.
    pub fn locate(&self) -> LocatedFeatures {
        let mut located = LocatedFeatures::default();
        for meta_path in self.feature_metadata_files() {
            match self.locate_feature(&meta_path) {
                Ok((feature, issues)) => {
                    located.features.push(feature);
                    located.issues.extend(issues);
                }
                Err(issues) => {
                    tracing::warn!(
                        "Skipping feature {}: {}",
                        meta_path.display(),
                        issues.iter().map(|i| i.message.as_str()).collect::<Vec<_>>().join("; ")
                    );
                    located.issues.extend(issues);
                }
            }
        }
        located
    }

    fn feature_metadata_files(&self) -> Vec<PathBuf> {
        let root = self.layout.features_dir();
        if !root.is_dir() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| {
                entry.file_type().is_file() && entry.file_name() == FEATURE_METADATA_FILE
            })
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }

    fn locate_feature(
        &self,
        meta_path: &Path,
    ) -> Result<(FeatureStatus, Vec<SpecIssue>), Vec<SpecIssue>> {
        let rel = display_relative(self.layout.root(), meta_path);
        let as_issues = |messages: Vec<String>| -> Vec<SpecIssue> {
            messages.into_iter().map(|m| SpecIssue::new(rel.clone(), m)).collect()
        };

        let content = read_text(meta_path).map_err(|e| as_issues(vec![format!("{e:#}")]))?;
        let value = parse_yaml(&content).map_err(as_issues)?;
        let decoded = decode_feature(&value).map_err(as_issues)?;
        let mut issues = as_issues(decoded.issues);
        let spec = decoded.value;

        let feature_dir = meta_path.parent().unwrap_or(meta_path);
        let mut scenarios = Vec::new();
        for scenario_path in scenario_files(feature_dir) {
            let (record, issue) = self.locate_scenario(&spec.id, &scenario_path);
            scenarios.push(record);
            issues.extend(issue);
        }

        let has_tests = scenarios
            .iter()
            .any(|s| self.layout.resolve(&s.test_path).is_file());
        let all_passing = !scenarios.is_empty()
            && scenarios
                .iter()
                .all(|s| matches!(s.status, ScenarioStatus::Passing | ScenarioStatus::Deferred));

        let feature = FeatureStatus {
            id: spec.id,
            area: spec.area,
            name: spec.name,
            summary: spec.summary,
            kind: spec.kind,
            phase: spec.phase,
            use_cases: spec.use_cases,
            path: rel,
            scenarios,
            has_tests,
            all_passing,
        };
        Ok((feature, issues))
    }

    fn locate_scenario(
        &self,
        feature_id: &str,
        scenario_path: &Path,
    ) -> (ScenarioRecord, Option<SpecIssue>) {
        let slug = scenario_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let scenario_rel = display_relative(self.layout.root(), scenario_path);
        let test_rel = self.layout.paired_test_path(Path::new(&scenario_rel));
        let test_abs = self.layout.resolve(&test_rel);
        let test_rel = display_relative(Path::new(""), &test_rel);

        let (phase, issue) = match std::fs::read_to_string(scenario_path) {
            Ok(content) => (scenario_phase(&content), None),
            Err(e) => {
                tracing::warn!("Cannot read scenario {}: {}", scenario_path.display(), e);
                (None, Some(SpecIssue::new(scenario_rel.clone(), format!("unreadable: {e}"))))
            }
        };

        let evidence = self.evidence(phase, scenario_path, &test_abs, &test_rel);
        let status = classify(&evidence);
        tracing::debug!("{}/{} -> {} ({:?})", feature_id, slug, status, evidence);

        let record = ScenarioRecord {
            id: format!("{feature_id}/{slug}"),
            slug,
            phase,
            status,
            scenario_path: scenario_rel,
            test_path: test_rel,
        };
        (record, issue)
    }

    /// Classify a scenario file by its root-relative path, inside the feature tree or not.
    pub fn scenario_status(&self, scenario_rel: &str) -> ScenarioStatus {
        let scenario_abs = self.layout.resolve(scenario_rel);
        let phase = std::fs::read_to_string(&scenario_abs)
            .ok()
            .and_then(|content| scenario_phase(&content));
        let test_rel = self.layout.paired_test_path(Path::new(scenario_rel));
        let test_abs = self.layout.resolve(&test_rel);
        let test_rel = display_relative(Path::new(""), &test_rel);
        classify(&self.evidence(phase, &scenario_abs, &test_abs, &test_rel))
    }

    fn evidence(
        &self,
        phase: Option<u32>,
        scenario_abs: &Path,
        test_abs: &Path,
        test_rel: &str,
    ) -> Evidence {
        let deferred = is_deferred(phase, self.current_phase);
        let test_exists = test_abs.is_file();
        let snapshot = self.results.map(|results| {
            let newest_input = match (modified_time(test_abs), modified_time(scenario_abs)) {
                (Some(test), Some(scenario)) => Some(test.max(scenario)),
                _ => None,
            };
            let abs = test_abs.to_string_lossy();
            SnapshotEvidence {
                recorded_at: results.recorded_at,
                newest_input,
                outcome: results.outcome_for(&[&*abs, test_rel]),
            }
        });
        Evidence { deferred, test_exists, snapshot }
    }
}

/// `*.feature` files directly inside `dir`, sorted.
fn scenario_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(SCENARIO_EXTENSION)
        })
        .collect();
    files.sort();
    files
}
