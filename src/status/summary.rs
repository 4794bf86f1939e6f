//! Rollups over located features: counts, gaps, orphans and completeness.

use crate::domain::{
    FeatureCounts, FeatureStatus, Gaps, ScenarioCounts, ScenarioStatus, StatusSummary,
    UseCaseStatus,
};
use std::collections::BTreeSet;

/// Scenario ids present in the feature tree but referenced by no use case, sorted.
pub fn orphaned_scenarios(features: &[FeatureStatus], use_cases: &[UseCaseStatus]) -> Vec<String> {
    let referenced: BTreeSet<&str> = use_cases
        .iter()
        .flat_map(|uc| {
            uc.outcomes
                .iter()
                .flat_map(|o| o.scenarios.iter())
                .chain(uc.legacy_scenarios.iter())
        })
        .map(String::as_str)
        .collect();

    let declared: BTreeSet<&str> = features
        .iter()
        .flat_map(|f| f.scenarios.iter())
        .map(|s| s.id.as_str())
        .collect();

    declared.difference(&referenced).map(|id| id.to_string()).collect()
}

/// Passing share of non-deferred scenarios as a rounded percentage; 0 when every scenario
/// is deferred or there are none.
pub fn completeness(counts: &ScenarioCounts) -> u32 {
    let denominator = counts.total.saturating_sub(counts.deferred);
    if denominator == 0 {
        return 0;
    }
    (counts.passing as f64 / denominator as f64 * 100.0).round() as u32
}

pub fn summarize(features: &[FeatureStatus]) -> StatusSummary {
    let mut feature_counts = FeatureCounts { total: features.len(), ..FeatureCounts::default() };
    let mut scenario_counts = ScenarioCounts::default();

    for feature in features {
        if feature.has_tests {
            feature_counts.with_tests += 1;
        }
        if feature.all_passing {
            feature_counts.passing += 1;
        }
        for scenario in &feature.scenarios {
            scenario_counts.total += 1;
            match scenario.status {
                ScenarioStatus::Missing => scenario_counts.missing += 1,
                ScenarioStatus::Failing => scenario_counts.failing += 1,
                ScenarioStatus::Passing => scenario_counts.passing += 1,
                ScenarioStatus::Stale => scenario_counts.stale += 1,
                ScenarioStatus::Deferred => scenario_counts.deferred += 1,
            }
            if scenario.status != ScenarioStatus::Missing {
                scenario_counts.with_tests += 1;
            }
        }
    }

    StatusSummary { features: feature_counts, scenarios: scenario_counts }
}

/// Work items: untested features (including empty ones), untested, failing and stale
/// scenarios. Deferred scenarios never show up among the scenario gaps.
pub fn find_gaps(features: &[FeatureStatus]) -> Gaps {
    let mut gaps = Gaps::default();
    for feature in features {
        if !feature.has_tests {
            gaps.features_without_tests.push(feature.id.clone());
        }
        for scenario in &feature.scenarios {
            let bucket = match scenario.status {
                ScenarioStatus::Missing => &mut gaps.scenarios_without_tests,
                ScenarioStatus::Failing => &mut gaps.failing_scenarios,
                ScenarioStatus::Stale => &mut gaps.stale_scenarios,
                ScenarioStatus::Passing | ScenarioStatus::Deferred => continue,
            };
            bucket.push(scenario.id.clone());
        }
    }
    gaps
}
