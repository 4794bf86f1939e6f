//! Status aggregator: merges every source into one [`ProjectStatus`].
//!
//! Nothing here is cached. Each call re-reads the project and recomputes the full view;
//! per-file problems become entries in [`ProjectStatus::issues`] instead of errors.

pub mod git;
pub mod summary;

pub use summary::{completeness, find_gaps, orphaned_scenarios, summarize};

use crate::config::ProjectLayout;
use crate::domain::{
    JourneyStatus, ManifestInfo, ProjectStatus, ResultsInfo, ScenarioStatus, SpecIssue,
};
use crate::journey::{discover_journeys, parse_journey_file};
use crate::locate::{current_phase, ResultsSnapshot, ScenarioLocator};
use crate::manifest::{self, Manifest};
use crate::usecase::{collect_actors, load_use_cases, ScenarioIndex};
use crate::utils::display_relative;

/// Compute the project status under `layout`.
pub fn project_status(layout: &ProjectLayout) -> ProjectStatus {
    let mut issues = Vec::new();

    let (phase, vision_issue) = current_phase(layout);
    issues.extend(vision_issue);

    let results_path = layout.results_path();
    let results = ResultsSnapshot::load(&results_path);
    let results_info = ResultsInfo {
        path: display_relative(layout.root(), &results_path),
        present: results.is_some(),
        recorded_at: results.as_ref().map(ResultsSnapshot::recorded_at_utc),
    };

    let locator = ScenarioLocator::new(layout, phase, results.as_ref());
    let located = locator.locate();
    issues.extend(located.issues);
    let features = located.features;

    let index: ScenarioIndex = features
        .iter()
        .flat_map(|f| f.scenarios.iter())
        .map(|s| (s.id.clone(), s.status))
        .collect();

    let (use_cases, use_case_issues) = load_use_cases(layout, &index);
    issues.extend(use_case_issues);

    let manifest_path = layout.manifest_path();
    let loaded = manifest::load(&manifest_path, layout.config().manifest_policy);
    let manifest_rel = display_relative(layout.root(), &manifest_path);
    let manifest_info = ManifestInfo {
        path: manifest_rel.clone(),
        corrupted: loaded.is_corrupted(),
        reason: loaded.corruption.as_ref().map(|c| c.reason()),
    };
    if let Some(corruption) = &loaded.corruption {
        issues.extend(
            corruption.issues.iter().map(|i| SpecIssue::new(manifest_rel.clone(), i.to_string())),
        );
    }

    let (journeys, journey_issues) = journey_statuses(layout, &loaded.manifest, &locator);
    issues.extend(journey_issues);

    let actors = collect_actors(&use_cases);
    let orphaned = orphaned_scenarios(&features, &use_cases);
    let summary = summarize(&features);
    let gaps = find_gaps(&features);
    let completeness = completeness(&summary.scenarios);

    ProjectStatus {
        current_phase: phase,
        git: git::snapshot(layout.root()),
        features,
        use_cases,
        journeys,
        actors,
        orphaned_scenarios: orphaned,
        summary,
        gaps,
        completeness,
        results: results_info,
        manifest: manifest_info,
        issues,
    }
}

/// Per-journey coverage and sync state. A missing journeys directory yields no journeys.
///
/// A linked scenario is missing unless it is a file under the root; present ones are
/// classified wherever they live.
pub fn journey_statuses(
    layout: &ProjectLayout,
    manifest: &Manifest,
    locator: &ScenarioLocator<'_>,
) -> (Vec<JourneyStatus>, Vec<SpecIssue>) {
    let dir = layout.journeys_dir();
    if !dir.is_dir() {
        return (Vec::new(), Vec::new());
    }
    let paths = match discover_journeys(&dir) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!("{:#}", e);
            let rel = display_relative(layout.root(), &dir);
            return (Vec::new(), vec![SpecIssue::new(rel, format!("{e:#}"))]);
        }
    };

    let mut journeys = Vec::new();
    let mut issues = Vec::new();
    for path in paths {
        let rel = display_relative(layout.root(), &path);
        let Some(journey) = parse_journey_file(&path) else {
            tracing::warn!("Skipping unparseable journey {}", path.display());
            issues.push(SpecIssue::new(rel, "journey could not be read"));
            continue;
        };

        let linked: Vec<&str> = journey.linked_scenarios().collect();
        let (present, absent): (Vec<&str>, Vec<&str>) = linked
            .iter()
            .copied()
            .partition(|scenario| layout.resolve_contained(scenario).is_some_and(|p| p.is_file()));
        let scenarios_missing = absent.len();
        let scenarios_passing = present
            .iter()
            .filter(|scenario| locator.scenario_status(scenario) == ScenarioStatus::Passing)
            .count();
        let is_stale = manifest.journey_hash(&journey.id) != Some(journey.hash.as_str());

        journeys.push(JourneyStatus {
            scenario_count: linked.len(),
            scenarios_missing,
            scenarios_passing,
            is_stale,
            id: journey.id,
            name: journey.name,
            actor: journey.actor,
            goal: journey.goal,
            path: rel,
        });
    }
    (journeys, issues)
}
