//! Sync reconciler: brings the manifest and scenario files in line with the journeys.
//!
//! Each journey step is applied to a [`Manifest`] value that is passed in and handed back,
//! so the whole run is a fold over the journey files. The folded manifest is persisted once
//! at the end, and never in dry-run mode.

pub mod scaffold;

use crate::config::ProjectLayout;
use crate::domain::Journey;
use crate::journey::{discover_journeys, journey_id, parse_journey_file};
use crate::manifest::{self, Manifest, ManifestJourney, ManifestScenario, ManifestScenarioStatus};
use crate::utils::{content_hash, display_relative};
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report what would happen; write nothing.
    pub dry_run: bool,
    /// Create missing scenarios without asking.
    pub auto_accept: bool,
}

/// Asks whether a missing scenario should be created.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Answers every prompt the same way.
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no journeys directory found at {}", path.display())]
    JourneysDirMissing { path: PathBuf },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// What happened to one journey step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// The step links no scenario.
    Unlinked,
    Exists { scenario: String },
    WouldCreate { scenario: String },
    Created { scenario: String, test: String },
    Declined { scenario: String },
    Failed { scenario: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub description: String,
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyOutcome {
    /// The file could not be read; the journey was skipped.
    Unparseable,
    /// The recorded hash matches; nothing to do.
    Unchanged,
    /// New or changed since the last sync.
    Synced { is_new: bool, steps: Vec<StepReport> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneySync {
    pub id: String,
    pub name: String,
    pub path: String,
    pub outcome: JourneyOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub journeys: Vec<JourneySync>,
    pub changes_detected: usize,
    pub scenarios_created: usize,
    /// Why the stored manifest was not trusted, if it was corrupted.
    pub manifest_warning: Option<String>,
    pub manifest_saved: bool,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn journeys_processed(&self) -> usize {
        self.journeys.len()
    }
}

/// Sync every journey under the layout's journeys directory.
///
/// Fails only when the journeys directory is missing or the final manifest write fails.
/// A corrupted manifest is reported in [`SyncReport::manifest_warning`] and treated as
/// empty (or salvaged, per the configured policy).
pub fn sync_journeys(
    layout: &ProjectLayout,
    options: SyncOptions,
    confirm: &mut dyn Confirm,
) -> Result<SyncReport, SyncError> {
    let dir = layout.journeys_dir();
    if !dir.is_dir() {
        return Err(SyncError::JourneysDirMissing { path: dir });
    }

    let manifest_path = layout.manifest_path();
    let loaded = manifest::load(&manifest_path, layout.config().manifest_policy);
    let mut report = SyncReport {
        manifest_warning: loaded.corruption.as_ref().map(|c| c.reason()),
        dry_run: options.dry_run,
        ..SyncReport::default()
    };

    let original = loaded.manifest;
    let mut manifest = original.clone();
    for path in discover_journeys(&dir)? {
        let (next, journey) = sync_journey(manifest, layout, &path, options, confirm);
        manifest = next;
        if let JourneyOutcome::Synced { steps, .. } = &journey.outcome {
            report.changes_detected += 1;
            report.scenarios_created +=
                steps.iter().filter(|s| matches!(s.action, StepAction::Created { .. })).count();
        }
        report.journeys.push(journey);
    }

    if !options.dry_run && (manifest != original || report.manifest_warning.is_some()) {
        manifest::save(&manifest_path, &manifest)?;
        tracing::info!("Saved manifest {}", manifest_path.display());
        report.manifest_saved = true;
    }
    Ok(report)
}

/// Sync one journey file against `manifest`, returning the updated manifest.
///
/// Unchanged journeys leave the manifest as is. Changed or new journeys record their hash
/// and linked scenarios, and every missing scenario is scaffolded (or previewed, or
/// declined). Failures stay inside this journey's report.
pub fn sync_journey(
    mut manifest: Manifest,
    layout: &ProjectLayout,
    path: &Path,
    options: SyncOptions,
    confirm: &mut dyn Confirm,
) -> (Manifest, JourneySync) {
    let rel = display_relative(layout.root(), path);
    let Some(journey) = parse_journey_file(path) else {
        tracing::warn!("Could not parse journey {}", path.display());
        let report = JourneySync {
            id: journey_id(path),
            name: journey_id(path),
            path: rel,
            outcome: JourneyOutcome::Unparseable,
        };
        return (manifest, report);
    };

    let recorded = manifest.journey_hash(&journey.id);
    if recorded == Some(journey.hash.as_str()) {
        tracing::debug!("Journey {} unchanged", journey.id);
        let report = JourneySync {
            id: journey.id,
            name: journey.name,
            path: rel,
            outcome: JourneyOutcome::Unchanged,
        };
        return (manifest, report);
    }
    let is_new = recorded.is_none();

    let mut steps = Vec::with_capacity(journey.steps.len());
    let mut linked = Vec::new();
    for step in &journey.steps {
        let action = match &step.scenario {
            None => StepAction::Unlinked,
            Some(scenario) => {
                linked.push(scenario.clone());
                sync_step(
                    &mut manifest,
                    layout,
                    &journey,
                    &step.description,
                    scenario,
                    options,
                    confirm,
                )
            }
        };
        steps.push(StepReport { description: step.description.clone(), action });
    }

    manifest.journeys.insert(
        journey.id.clone(),
        ManifestJourney { path: rel.clone(), hash: journey.hash.clone(), scenarios: linked },
    );

    let report = JourneySync {
        id: journey.id,
        name: journey.name,
        path: rel,
        outcome: JourneyOutcome::Synced { is_new, steps },
    };
    (manifest, report)
}

fn sync_step(
    manifest: &mut Manifest,
    layout: &ProjectLayout,
    journey: &Journey,
    description: &str,
    scenario: &str,
    options: SyncOptions,
    confirm: &mut dyn Confirm,
) -> StepAction {
    let Some(scenario_abs) = layout.resolve_contained(scenario) else {
        tracing::warn!("Refusing to scaffold {} outside the project root", scenario);
        return StepAction::Failed {
            scenario: scenario.to_string(),
            reason: "link points outside the project root".to_string(),
        };
    };
    if scenario_abs.exists() {
        return StepAction::Exists { scenario: scenario.to_string() };
    }
    if options.dry_run {
        return StepAction::WouldCreate { scenario: scenario.to_string() };
    }

    if !options.auto_accept {
        match confirm.confirm(&format!("Create {scenario}?")) {
            Ok(true) => {}
            Ok(false) => return StepAction::Declined { scenario: scenario.to_string() },
            Err(e) => {
                let reason = format!("{e:#}");
                return StepAction::Failed { scenario: scenario.to_string(), reason };
            }
        }
    }

    let scenario_content = scaffold::scenario_template(journey, description);
    let test_rel = display_relative(Path::new(""), &layout.paired_test_path(Path::new(scenario)));
    let test_content = scaffold::test_template(scenario, description);

    let written = scaffold::write_new(&scenario_abs, &scenario_content).and_then(|_| {
        scaffold::write_new(&layout.resolve(&test_rel), &test_content)
    });
    if let Err(e) = written {
        tracing::warn!("Failed to scaffold {}: {}", scenario, e);
        return StepAction::Failed { scenario: scenario.to_string(), reason: e.to_string() };
    }

    tracing::info!("Created {} and {}", scenario, test_rel);
    manifest.scenarios.insert(
        scenario.to_string(),
        ManifestScenario {
            hash: content_hash(&scenario_content),
            test: test_rel.clone(),
            status: ManifestScenarioStatus::Pending,
        },
    );
    StepAction::Created { scenario: scenario.to_string(), test: test_rel }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    const JOURNEY: &str = "# Journey: New User Onboarding\n\n**Actor:** visitor\n\n1. Sign up → `specs/auth/signup.feature`\n2. Browse the catalog\n";

    fn project() -> (TempDir, ProjectLayout) {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("product/journeys")).expect("mkdir");
        fs::write(tmp.path().join("product/journeys/new_user_onboarding.md"), JOURNEY)
            .expect("write");
        let layout = ProjectLayout::new(tmp.path(), Config::default());
        (tmp, layout)
    }

    fn files(root: &Path) -> Vec<String> {
        let mut out: Vec<String> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| display_relative(root, e.path()))
            .collect();
        out.sort();
        out
    }

    /// Records prompts and answers from a script.
    struct Scripted {
        answers: Vec<bool>,
        prompts: Vec<String>,
    }

    impl Confirm for Scripted {
        fn confirm(&mut self, prompt: &str) -> Result<bool> {
            self.prompts.push(prompt.to_string());
            Ok(self.answers.remove(0))
        }
    }

    #[test]
    fn missing_journeys_dir_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let layout = ProjectLayout::new(tmp.path(), Config::default());
        let err =
            sync_journeys(&layout, SyncOptions::default(), &mut FixedAnswer(true)).unwrap_err();
        assert!(matches!(err, SyncError::JourneysDirMissing { .. }));
        assert!(err.to_string().contains("product/journeys"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (tmp, layout) = project();
        let before = files(tmp.path());
        let options = SyncOptions { dry_run: true, auto_accept: true };
        let report = sync_journeys(&layout, options, &mut FixedAnswer(true)).expect("sync");

        assert_eq!(files(tmp.path()), before);
        assert!(!report.manifest_saved);
        assert_eq!(report.changes_detected, 1);
        assert_eq!(report.scenarios_created, 0);
        let JourneyOutcome::Synced { steps, is_new } = &report.journeys[0].outcome else {
            panic!("expected synced journey");
        };
        assert!(is_new);
        assert_eq!(
            steps[0].action,
            StepAction::WouldCreate { scenario: "specs/auth/signup.feature".to_string() }
        );
        assert_eq!(steps[1].action, StepAction::Unlinked);
    }

    #[test]
    fn auto_accept_scaffolds_and_records() {
        let (tmp, layout) = project();
        let options = SyncOptions { dry_run: false, auto_accept: true };
        let report = sync_journeys(&layout, options, &mut FixedAnswer(false)).expect("sync");

        assert_eq!(report.scenarios_created, 1);
        assert!(report.manifest_saved);
        assert!(tmp.path().join("specs/auth/signup.feature").is_file());
        assert!(tmp.path().join("tests/e2e/auth/signup.e2e.test.ts").is_file());

        let loaded = manifest::load(&layout.manifest_path(), Default::default());
        assert!(!loaded.is_corrupted());
        let journey = &loaded.manifest.journeys["new_user_onboarding"];
        assert_eq!(journey.hash, content_hash(JOURNEY));
        assert_eq!(journey.path, "product/journeys/new_user_onboarding.md");
        assert_eq!(journey.scenarios, vec!["specs/auth/signup.feature"]);
        let scenario = &loaded.manifest.scenarios["specs/auth/signup.feature"];
        assert_eq!(scenario.test, "tests/e2e/auth/signup.e2e.test.ts");
        assert_eq!(scenario.status, ManifestScenarioStatus::Pending);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let (tmp, layout) = project();
        let options = SyncOptions { dry_run: false, auto_accept: true };
        sync_journeys(&layout, options, &mut FixedAnswer(true)).expect("first sync");
        let manifest_before = fs::read_to_string(layout.manifest_path()).expect("read");
        let files_before = files(tmp.path());

        let report = sync_journeys(&layout, options, &mut FixedAnswer(true)).expect("second sync");
        assert_eq!(report.changes_detected, 0);
        assert_eq!(report.journeys[0].outcome, JourneyOutcome::Unchanged);
        assert!(!report.manifest_saved);
        assert_eq!(fs::read_to_string(layout.manifest_path()).expect("read"), manifest_before);
        assert_eq!(files(tmp.path()), files_before);
    }

    #[test]
    fn declined_prompt_creates_nothing() {
        let (tmp, layout) = project();
        let mut confirm = Scripted { answers: vec![false], prompts: Vec::new() };
        let report = sync_journeys(&layout, SyncOptions::default(), &mut confirm).expect("sync");

        assert_eq!(confirm.prompts, vec!["Create specs/auth/signup.feature?"]);
        assert!(!tmp.path().join("specs/auth/signup.feature").exists());
        assert_eq!(report.scenarios_created, 0);
        let loaded = manifest::load(&layout.manifest_path(), Default::default());
        assert!(loaded.manifest.scenarios.is_empty());
        assert!(loaded.manifest.journeys.contains_key("new_user_onboarding"));
    }

    #[test]
    fn links_escaping_the_root_are_refused() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path().join("project");
        fs::create_dir_all(root.join("product/journeys")).expect("mkdir");
        fs::write(
            root.join("product/journeys/escape.md"),
            "# Escape\n1. Up → `../outside.feature`\n2. Abs → `/tmp/specboard-abs.feature`\n",
        )
        .expect("write");
        let layout = ProjectLayout::new(&root, Config::default());

        let options = SyncOptions { dry_run: false, auto_accept: true };
        let report = sync_journeys(&layout, options, &mut FixedAnswer(true)).expect("sync");

        let JourneyOutcome::Synced { steps, .. } = &report.journeys[0].outcome else {
            panic!("expected a synced journey, got {:?}", report.journeys[0].outcome);
        };
        assert!(steps.iter().all(|s| matches!(s.action, StepAction::Failed { .. })));
        assert_eq!(report.scenarios_created, 0);
        assert!(!tmp.path().join("outside.feature").exists());
        assert!(!tmp.path().join("tests").exists());
    }

    #[test]
    fn existing_files_are_left_alone() {
        let (tmp, layout) = project();
        fs::create_dir_all(tmp.path().join("tests/e2e/auth")).expect("mkdir");
        fs::write(tmp.path().join("tests/e2e/auth/signup.e2e.test.ts"), "mine").expect("write");

        let options = SyncOptions { dry_run: false, auto_accept: true };
        sync_journeys(&layout, options, &mut FixedAnswer(true)).expect("sync");
        assert_eq!(
            fs::read_to_string(tmp.path().join("tests/e2e/auth/signup.e2e.test.ts")).expect("read"),
            "mine"
        );
    }

    #[test]
    fn corrupted_manifest_still_syncs_journeys() {
        let (tmp, layout) = project();
        fs::create_dir_all(tmp.path().join("specs/.udd")).expect("mkdir");
        fs::write(layout.manifest_path(), "journeys: [not, a, mapping]\n").expect("write");

        let options = SyncOptions { dry_run: true, auto_accept: false };
        let report = sync_journeys(&layout, options, &mut FixedAnswer(true)).expect("sync");
        assert!(report.manifest_warning.is_some());
        assert_eq!(report.journeys_processed(), 1);
        assert!(matches!(report.journeys[0].outcome, JourneyOutcome::Synced { is_new: true, .. }));
    }

    #[test]
    fn sync_journey_threads_the_manifest() {
        let (tmp, layout) = project();
        let path = tmp.path().join("product/journeys/new_user_onboarding.md");
        let options = SyncOptions { dry_run: true, auto_accept: false };

        let (manifest, first) =
            sync_journey(Manifest::default(), &layout, &path, options, &mut FixedAnswer(true));
        assert!(matches!(first.outcome, JourneyOutcome::Synced { .. }));
        let (_, second) = sync_journey(manifest, &layout, &path, options, &mut FixedAnswer(true));
        assert_eq!(second.outcome, JourneyOutcome::Unchanged);
    }
}
