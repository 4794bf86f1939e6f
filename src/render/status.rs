//! Plain-text project status.

use crate::domain::{OutcomeStatus, ProjectStatus, ScenarioStatus};
use console::style;
use std::fmt::Write;

fn scenario_label(status: ScenarioStatus) -> String {
    let text = format!("{:<8}", status.as_str());
    match status {
        ScenarioStatus::Passing => style(text).green().to_string(),
        ScenarioStatus::Failing => style(text).red().to_string(),
        ScenarioStatus::Missing => style(text).yellow().to_string(),
        ScenarioStatus::Stale => style(text).magenta().to_string(),
        ScenarioStatus::Deferred => style(text).dim().to_string(),
    }
}

fn outcome_label(status: OutcomeStatus) -> String {
    let text = format!("{:<11}", status.as_str());
    match status {
        OutcomeStatus::Satisfied => style(text).green().to_string(),
        OutcomeStatus::Unsatisfied => style(text).red().to_string(),
        OutcomeStatus::Deferred => style(text).dim().to_string(),
        OutcomeStatus::Unknown => style(text).yellow().to_string(),
    }
}

pub fn render_status(status: &ProjectStatus) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_status(&mut out, status);
    out
}

fn write_status(out: &mut String, status: &ProjectStatus) -> std::fmt::Result {
    writeln!(
        out,
        "{} phase {} | {}% complete",
        style("Project status:").bold(),
        status.current_phase,
        status.completeness
    )?;

    if status.git.available {
        writeln!(
            out,
            "Git: {} (staged {}, modified {}, untracked {})",
            status.git.branch, status.git.staged, status.git.modified, status.git.untracked
        )?;
    } else {
        writeln!(out, "Git: {}", style("unavailable").dim())?;
    }
    match status.results.recorded_at {
        Some(at) => writeln!(
            out,
            "Test results: {} ({})",
            status.results.path,
            at.format("%Y-%m-%d %H:%M:%S UTC")
        )?,
        None => writeln!(out, "Test results: {}", style("none recorded").dim())?,
    }
    if let Some(reason) = &status.manifest.reason {
        writeln!(
            out,
            "{} manifest {} is corrupted: {}",
            style("warning:").yellow(),
            status.manifest.path,
            reason
        )?;
    }

    let s = &status.summary.scenarios;
    writeln!(
        out,
        "Scenarios: {} total, {} passing, {} failing, {} stale, {} missing, {} deferred",
        s.total, s.passing, s.failing, s.stale, s.missing, s.deferred
    )?;

    if !status.journeys.is_empty() {
        writeln!(out, "\n{}", style("Journeys").bold().underlined())?;
        for journey in &status.journeys {
            let sync = if journey.is_stale {
                style("needs sync").yellow().to_string()
            } else {
                style("synced").green().to_string()
            };
            writeln!(
                out,
                "  {} ({}) {}/{} passing, {} missing, {}",
                journey.id,
                journey.name,
                journey.scenarios_passing,
                journey.scenario_count,
                journey.scenarios_missing,
                sync
            )?;
        }
    }

    if !status.features.is_empty() {
        writeln!(out, "\n{}", style("Features").bold().underlined())?;
        for feature in &status.features {
            writeln!(out, "  {} ({})", style(&feature.id).bold(), feature.name)?;
            for scenario in &feature.scenarios {
                writeln!(out, "    {} {}", scenario_label(scenario.status), scenario.slug)?;
            }
        }
    }

    if !status.use_cases.is_empty() {
        writeln!(out, "\n{}", style("Use cases").bold().underlined())?;
        for use_case in &status.use_cases {
            writeln!(out, "  {} ({})", style(&use_case.id).bold(), use_case.name)?;
            for outcome in &use_case.outcomes {
                writeln!(out, "    {} {}", outcome_label(outcome.status), outcome.description)?;
            }
        }
    }

    if !status.actors.is_empty() {
        writeln!(out, "\n{}", style("Actors").bold().underlined())?;
        for actor in &status.actors {
            writeln!(out, "  {}: {}", actor.name, actor.use_cases.join(", "))?;
        }
    }

    if !status.orphaned_scenarios.is_empty() {
        writeln!(out, "\n{}", style("Orphaned scenarios").bold().underlined())?;
        for id in &status.orphaned_scenarios {
            writeln!(out, "  {id}")?;
        }
    }

    let gaps = &status.gaps;
    let sections = [
        ("Features without tests", &gaps.features_without_tests),
        ("Scenarios without tests", &gaps.scenarios_without_tests),
        ("Failing scenarios", &gaps.failing_scenarios),
        ("Stale scenarios", &gaps.stale_scenarios),
    ];
    for (title, ids) in sections {
        if ids.is_empty() {
            continue;
        }
        writeln!(out, "\n{}", style(title).bold().underlined())?;
        for id in ids {
            writeln!(out, "  {id}")?;
        }
    }

    if !status.issues.is_empty() {
        writeln!(out, "\n{} ({})", style("Issues").bold().underlined(), status.issues.len())?;
        for issue in &status.issues {
            writeln!(out, "  {issue}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;

    fn status() -> ProjectStatus {
        ProjectStatus {
            current_phase: 2,
            features: vec![FeatureStatus {
                id: "auth/login".to_string(),
                area: "auth".to_string(),
                name: "Login".to_string(),
                summary: String::new(),
                kind: None,
                phase: None,
                use_cases: Vec::new(),
                path: "specs/features/auth/login/_feature.yml".to_string(),
                scenarios: vec![ScenarioRecord {
                    slug: "happy_path".to_string(),
                    id: "auth/login/happy_path".to_string(),
                    phase: None,
                    status: ScenarioStatus::Missing,
                    scenario_path: "specs/features/auth/login/happy_path.feature".to_string(),
                    test_path: "tests/e2e/auth/login/happy_path.e2e.test.ts".to_string(),
                }],
                has_tests: false,
                all_passing: false,
            }],
            use_cases: Vec::new(),
            journeys: Vec::new(),
            actors: Vec::new(),
            orphaned_scenarios: vec!["auth/login/happy_path".to_string()],
            git: GitSnapshot::unavailable(),
            summary: StatusSummary::default(),
            gaps: Gaps::default(),
            completeness: 0,
            results: ResultsInfo {
                path: ".udd/results.json".to_string(),
                present: false,
                recorded_at: None,
            },
            manifest: ManifestInfo {
                path: "specs/.udd/manifest.yml".to_string(),
                corrupted: true,
                reason: Some("missing `journeys` mapping".to_string()),
            },
            issues: vec![SpecIssue::new("specs/use-cases/x.yml", "invalid YAML")],
        }
    }

    #[test]
    fn renders_every_section_present() {
        let text = render_status(&status());
        assert!(text.contains("phase 2"));
        assert!(text.contains("happy_path"));
        assert!(text.contains("Orphaned scenarios"));
        assert!(text.contains("missing `journeys` mapping"));
        assert!(text.contains("specs/use-cases/x.yml: invalid YAML"));
        assert!(!text.contains("Journeys"));
    }
}
