//! Manifest shape validation.

use super::{Manifest, ManifestJourney, ManifestScenario, ManifestScenarioStatus};
use crate::config::ManifestPolicy;
use crate::schema::{type_name, FieldReader};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// One reason a manifest document failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestIssue {
    #[error("unreadable: {0}")]
    Unreadable(String),
    #[error("invalid YAML: {0}")]
    Syntax(String),
    #[error("top level must be a mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("missing `journeys` mapping")]
    MissingJourneys,
    #[error("`{section}` must be a mapping, found {found}")]
    SectionType { section: &'static str, found: &'static str },
    #[error("{section} key must be a string, found {found}")]
    KeyType { section: &'static str, found: &'static str },
    #[error("journey `{id}`: {reason}")]
    Journey { id: String, reason: String },
    #[error("scenario `{path}`: {reason}")]
    Scenario { path: String, reason: String },
}

/// Decode manifest text. Any returned issue means the manifest is corrupted; the manifest
/// returned alongside is empty under the strict policy and keeps the valid entries under
/// the salvage policy.
pub(super) fn decode(content: &str, policy: ManifestPolicy) -> (Manifest, Vec<ManifestIssue>) {
    let root: Value = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => return (Manifest::default(), vec![ManifestIssue::Syntax(e.to_string())]),
    };

    // A blank file is an empty cache, not a corrupted one
    if root.is_null() {
        return (Manifest::default(), Vec::new());
    }

    let Some(top) = root.as_mapping() else {
        return (Manifest::default(), vec![ManifestIssue::NotAMapping(type_name(&root))]);
    };

    let journeys = match top.get("journeys") {
        None | Some(Value::Null) => {
            return (Manifest::default(), vec![ManifestIssue::MissingJourneys]);
        }
        Some(Value::Mapping(map)) => map,
        Some(other) => {
            return (
                Manifest::default(),
                vec![ManifestIssue::SectionType { section: "journeys", found: type_name(other) }],
            );
        }
    };

    let mut issues = Vec::new();
    let mut manifest = Manifest::default();

    decode_journeys(journeys, &mut manifest, &mut issues);

    match top.get("scenarios") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(map)) => decode_scenarios(map, &mut manifest, &mut issues),
        Some(other) => issues
            .push(ManifestIssue::SectionType { section: "scenarios", found: type_name(other) }),
    }

    match policy {
        ManifestPolicy::Strict if !issues.is_empty() => (Manifest::default(), issues),
        _ => (manifest, issues),
    }
}

fn decode_journeys(map: &Mapping, manifest: &mut Manifest, issues: &mut Vec<ManifestIssue>) {
    for (key, value) in map {
        let Some(id) = key.as_str() else {
            issues.push(ManifestIssue::KeyType { section: "journeys", found: type_name(key) });
            continue;
        };
        match decode_journey(value) {
            Ok(entry) => {
                manifest.journeys.insert(id.to_string(), entry);
            }
            Err(reasons) => issues.extend(
                reasons
                    .into_iter()
                    .map(|reason| ManifestIssue::Journey { id: id.to_string(), reason }),
            ),
        }
    }
}

fn decode_journey(value: &Value) -> Result<ManifestJourney, Vec<String>> {
    let mut reader = FieldReader::new(value)?;
    let path = reader.required_str("path");
    let hash = reader.required_str("hash");
    let scenarios = match reader.get("scenarios") {
        Some(_) => reader.string_list("scenarios"),
        None => {
            reader.issue("missing required field `scenarios`");
            None
        }
    };

    match (path, hash, scenarios) {
        (Some(path), Some(hash), Some(scenarios)) if !reader.has_issues() => {
            Ok(ManifestJourney { path, hash, scenarios })
        }
        _ => Err(reader.finish(()).issues),
    }
}

fn decode_scenarios(map: &Mapping, manifest: &mut Manifest, issues: &mut Vec<ManifestIssue>) {
    for (key, value) in map {
        let Some(path) = key.as_str() else {
            issues.push(ManifestIssue::KeyType { section: "scenarios", found: type_name(key) });
            continue;
        };
        match decode_scenario(value) {
            Ok(entry) => {
                manifest.scenarios.insert(path.to_string(), entry);
            }
            Err(reasons) => issues.extend(
                reasons
                    .into_iter()
                    .map(|reason| ManifestIssue::Scenario { path: path.to_string(), reason }),
            ),
        }
    }
}

fn decode_scenario(value: &Value) -> Result<ManifestScenario, Vec<String>> {
    let mut reader = FieldReader::new(value)?;
    let hash = reader.required_str("hash");
    let test = reader.required_str("test");
    let status = match reader.optional_str("status") {
        None => Some(ManifestScenarioStatus::default()),
        Some(raw) => {
            let parsed = ManifestScenarioStatus::parse(&raw);
            if parsed.is_none() {
                reader.issue(format!("unknown status `{raw}`"));
            }
            parsed
        }
    };

    match (hash, test, status) {
        (Some(hash), Some(test), Some(status)) if !reader.has_issues() => {
            Ok(ManifestScenario { hash, test, status })
        }
        _ => Err(reader.finish(()).issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "journeys:\n  good:\n    path: product/journeys/good.md\n    hash: aaaaaaaaaaaa\n    scenarios: []\n  bad:\n    path: product/journeys/bad.md\n    scenarios: []\nscenarios:\n  specs/a.feature:\n    hash: bbbbbbbbbbbb\n    test: tests/e2e/a.e2e.test.ts\n";

    #[test]
    fn strict_policy_discards_everything_on_one_bad_entry() {
        let (manifest, issues) = decode(MIXED, ManifestPolicy::Strict);
        assert_eq!(manifest, Manifest::default());
        assert_eq!(
            issues,
            vec![ManifestIssue::Journey {
                id: "bad".to_string(),
                reason: "missing required field `hash`".to_string()
            }]
        );
    }

    #[test]
    fn salvage_policy_keeps_valid_entries() {
        let (manifest, issues) = decode(MIXED, ManifestPolicy::Salvage);
        assert_eq!(issues.len(), 1);
        assert!(manifest.journeys.contains_key("good"));
        assert!(!manifest.journeys.contains_key("bad"));
        assert_eq!(manifest.scenarios.len(), 1);
        assert_eq!(
            manifest.scenarios["specs/a.feature"].status,
            ManifestScenarioStatus::Pending
        );
    }

    #[test]
    fn scenarios_section_is_optional() {
        let (manifest, issues) = decode("journeys: {}\n", ManifestPolicy::Strict);
        assert!(issues.is_empty());
        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn missing_journeys_is_reported() {
        let (_, issues) = decode("scenarios: {}\n", ManifestPolicy::Strict);
        assert_eq!(issues, vec![ManifestIssue::MissingJourneys]);
    }

    #[test]
    fn wrong_field_types_are_reported() {
        let text = "journeys:\n  j:\n    path: p\n    hash: 12\n    scenarios: nope\n";
        let (_, issues) = decode(text, ManifestPolicy::Strict);
        let rendered: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        assert!(rendered.iter().any(|r| r.contains("journey `j`: field `hash` must be a string")));
        assert!(rendered.iter().any(|r| r.contains("field `scenarios` must be a list")));
    }

    #[test]
    fn unknown_scenario_status_is_reported() {
        let text = "journeys: {}\nscenarios:\n  s:\n    hash: h\n    test: t\n    status: flaky\n";
        let (_, issues) = decode(text, ManifestPolicy::Strict);
        assert_eq!(
            issues,
            vec![ManifestIssue::Scenario {
                path: "s".to_string(),
                reason: "unknown status `flaky`".to_string()
            }]
        );
    }

    #[test]
    fn scalar_top_level_is_rejected() {
        let (_, issues) = decode("just a string\n", ManifestPolicy::Salvage);
        assert_eq!(issues, vec![ManifestIssue::NotAMapping("string")]);
    }

    #[test]
    fn blank_document_is_empty_not_corrupted() {
        let (manifest, issues) = decode("", ManifestPolicy::Strict);
        assert!(issues.is_empty());
        assert_eq!(manifest, Manifest::default());
    }
}
