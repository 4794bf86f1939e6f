//! Use-case reconciler: derives outcome status from located scenario statuses.

pub mod spec;

pub use spec::{decode_use_case, OutcomeSpec, UseCaseSpec};

use crate::config::ProjectLayout;
use crate::domain::{
    ActorSummary, OutcomeReport, OutcomeStatus, ScenarioStatus, SpecIssue, UseCaseStatus,
};
use crate::schema::parse_yaml;
use crate::utils::{display_relative, read_text};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Scenario id (`<feature-id>/<slug>`) to its located status.
pub type ScenarioIndex = HashMap<String, ScenarioStatus>;

/// Status of one outcome from the statuses of the scenarios it references.
///
/// Satisfied when every reference is passing; deferred when every non-deferred reference
/// passes and at least one is deferred; unsatisfied otherwise, including references to
/// scenarios that do not exist.
pub fn outcome_status(references: &[String], index: &ScenarioIndex) -> OutcomeStatus {
    let mut any_deferred = false;
    for reference in references {
        match index.get(reference) {
            Some(ScenarioStatus::Passing) => {}
            Some(ScenarioStatus::Deferred) => any_deferred = true,
            Some(_) | None => return OutcomeStatus::Unsatisfied,
        }
    }
    if any_deferred {
        OutcomeStatus::Deferred
    } else {
        OutcomeStatus::Satisfied
    }
}

/// Reconcile a decoded use case against the located scenarios.
pub fn reconcile(
    spec: UseCaseSpec,
    path: String,
    mut validation_errors: Vec<String>,
    index: &ScenarioIndex,
) -> UseCaseStatus {
    let mut unknown = BTreeSet::new();
    for reference in spec.referenced_scenarios() {
        if !index.contains_key(reference) {
            unknown.insert(reference.to_string());
        }
    }
    validation_errors
        .extend(unknown.into_iter().map(|id| format!("references unknown scenario `{id}`")));

    let outcomes = spec
        .outcomes
        .into_iter()
        .map(|outcome| match outcome {
            OutcomeSpec::Structured { description, scenarios } => {
                let status = outcome_status(&scenarios, index);
                OutcomeReport { description, scenarios, status }
            }
            OutcomeSpec::Legacy(description) => {
                OutcomeReport { description, scenarios: Vec::new(), status: OutcomeStatus::Unknown }
            }
        })
        .collect();

    UseCaseStatus {
        id: spec.id,
        name: spec.name,
        summary: spec.summary,
        actors: spec.actors,
        path,
        outcomes,
        legacy_scenarios: spec.legacy_scenarios,
        validation_errors,
    }
}

/// Use-case files (`*.yml`, `*.yaml`) directly inside `dir`, sorted. A missing directory
/// has none.
pub fn discover_use_cases(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && matches!(path.extension().and_then(|e| e.to_str()), Some("yml" | "yaml"))
        })
        .collect();
    files.sort();
    files
}

/// Load and reconcile every use case. Unusable files are skipped and reported.
pub fn load_use_cases(
    layout: &ProjectLayout,
    index: &ScenarioIndex,
) -> (Vec<UseCaseStatus>, Vec<SpecIssue>) {
    let mut use_cases = Vec::new();
    let mut issues = Vec::new();

    for path in discover_use_cases(&layout.use_cases_dir()) {
        let rel = display_relative(layout.root(), &path);
        let decoded = read_text(&path)
            .map_err(|e| vec![format!("{e:#}")])
            .and_then(|content| parse_yaml(&content))
            .and_then(|value| decode_use_case(&value));

        match decoded {
            Ok(validated) => {
                let status = reconcile(validated.value, rel.clone(), validated.issues, index);
                issues.extend(
                    status.validation_errors.iter().map(|e| SpecIssue::new(rel.clone(), e.clone())),
                );
                use_cases.push(status);
            }
            Err(errors) => {
                tracing::warn!("Skipping use case {}: {}", path.display(), errors.join("; "));
                issues.extend(errors.into_iter().map(|e| SpecIssue::new(rel.clone(), e)));
            }
        }
    }

    (use_cases, issues)
}

/// Actors named by any use case, each with the sorted ids of its use cases.
pub fn collect_actors(use_cases: &[UseCaseStatus]) -> Vec<ActorSummary> {
    let mut actors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for use_case in use_cases {
        for actor in &use_case.actors {
            actors.entry(actor.as_str()).or_default().insert(use_case.id.as_str());
        }
    }
    actors
        .into_iter()
        .map(|(name, ids)| ActorSummary {
            name: name.to_string(),
            use_cases: ids.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn index(entries: &[(&str, ScenarioStatus)]) -> ScenarioIndex {
        entries.iter().map(|(id, status)| (id.to_string(), *status)).collect()
    }

    fn refs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_passing_is_satisfied() {
        let idx = index(&[("a/b/c", ScenarioStatus::Passing), ("a/b/d", ScenarioStatus::Passing)]);
        assert_eq!(outcome_status(&refs(&["a/b/c", "a/b/d"]), &idx), OutcomeStatus::Satisfied);
    }

    #[test]
    fn deferred_reference_defers_an_otherwise_passing_outcome() {
        let idx = index(&[("a/b/c", ScenarioStatus::Passing), ("a/b/d", ScenarioStatus::Deferred)]);
        assert_eq!(outcome_status(&refs(&["a/b/c", "a/b/d"]), &idx), OutcomeStatus::Deferred);
        assert_eq!(outcome_status(&refs(&["a/b/d"]), &idx), OutcomeStatus::Deferred);
    }

    #[test]
    fn any_other_status_is_unsatisfied() {
        for status in [ScenarioStatus::Failing, ScenarioStatus::Missing, ScenarioStatus::Stale] {
            let idx = index(&[("a/b/c", status), ("a/b/d", ScenarioStatus::Deferred)]);
            assert_eq!(
                outcome_status(&refs(&["a/b/c", "a/b/d"]), &idx),
                OutcomeStatus::Unsatisfied,
                "{status}"
            );
        }
    }

    #[test]
    fn unknown_reference_is_unsatisfied_and_reported() {
        let idx = index(&[("a/b/c", ScenarioStatus::Passing)]);
        let spec = UseCaseSpec {
            id: "uc".to_string(),
            name: "UC".to_string(),
            summary: String::new(),
            actors: Vec::new(),
            outcomes: vec![OutcomeSpec::Structured {
                description: "d".to_string(),
                scenarios: refs(&["a/b/c", "ghost/x/y"]),
            }],
            legacy_scenarios: Vec::new(),
            phase: None,
        };
        let status = reconcile(spec, "specs/use-cases/uc.yml".to_string(), Vec::new(), &idx);
        assert_eq!(status.outcomes[0].status, OutcomeStatus::Unsatisfied);
        assert_eq!(status.validation_errors, vec!["references unknown scenario `ghost/x/y`"]);
    }

    #[test]
    fn legacy_outcome_is_unknown() {
        let spec = UseCaseSpec {
            id: "uc".to_string(),
            name: "UC".to_string(),
            summary: String::new(),
            actors: Vec::new(),
            outcomes: vec![OutcomeSpec::Legacy("Users can sign in".to_string())],
            legacy_scenarios: Vec::new(),
            phase: None,
        };
        let status = reconcile(spec, "uc.yml".to_string(), Vec::new(), &ScenarioIndex::new());
        assert_eq!(status.outcomes[0].status, OutcomeStatus::Unknown);
    }

    #[test]
    fn loads_use_cases_and_skips_broken_files() {
        let tmp = TempDir::new().expect("tmp");
        let dir = tmp.path().join("specs/use-cases");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(
            dir.join("access.yml"),
            "id: access\nname: Access\nsummary: s\nactors: [visitor]\noutcomes:\n  - description: Sign in\n    scenarios: [auth/login/happy_path]\n",
        )
        .expect("write");
        fs::write(dir.join("broken.yaml"), "id: [unclosed\n").expect("write");
        fs::write(dir.join("README.md"), "ignored").expect("write");

        let layout = ProjectLayout::new(tmp.path(), Config::default());
        let idx = index(&[("auth/login/happy_path", ScenarioStatus::Passing)]);
        let (use_cases, issues) = load_use_cases(&layout, &idx);

        assert_eq!(use_cases.len(), 1);
        assert_eq!(use_cases[0].path, "specs/use-cases/access.yml");
        assert_eq!(use_cases[0].outcomes[0].status, OutcomeStatus::Satisfied);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "specs/use-cases/broken.yaml");
    }

    #[test]
    fn actors_are_merged_and_sorted() {
        let make = |id: &str, actors: &[&str]| UseCaseStatus {
            id: id.to_string(),
            name: id.to_string(),
            summary: String::new(),
            actors: refs(actors),
            path: String::new(),
            outcomes: Vec::new(),
            legacy_scenarios: Vec::new(),
            validation_errors: Vec::new(),
        };
        let actors = collect_actors(&[make("z", &["visitor", "admin"]), make("a", &["visitor"])]);
        let names: Vec<_> = actors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "visitor"]);
        assert_eq!(actors[1].use_cases, vec!["a", "z"]);
    }
}
