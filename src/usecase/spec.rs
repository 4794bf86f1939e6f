//! Use-case record decoding.

use crate::schema::{Decoded, FieldReader};
use serde_yaml::Value;

/// One entry of a use case's `outcomes` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeSpec {
    /// `{description, scenarios}` mapping.
    Structured { description: String, scenarios: Vec<String> },
    /// Bare string from the older format; carries only a description.
    Legacy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseCaseSpec {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub actors: Vec<String>,
    pub outcomes: Vec<OutcomeSpec>,
    /// Flat `scenarios` list of fully qualified scenario ids.
    pub legacy_scenarios: Vec<String>,
    pub phase: Option<u32>,
}

impl UseCaseSpec {
    /// Every scenario id the use case refers to, structured outcomes first.
    pub fn referenced_scenarios(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .flat_map(|outcome| match outcome {
                OutcomeSpec::Structured { scenarios, .. } => scenarios.as_slice(),
                OutcomeSpec::Legacy(_) => &[],
            })
            .chain(self.legacy_scenarios.iter())
            .map(String::as_str)
    }
}

pub fn decode_use_case(value: &Value) -> Decoded<UseCaseSpec> {
    let mut reader = FieldReader::new(value)?;

    let Some(id) = reader.required_str("id").filter(|id| !id.trim().is_empty()) else {
        return Err(reader.reject("use case id is required"));
    };
    let name = reader.required_str("name").unwrap_or_else(|| id.clone());
    let summary = reader.required_str("summary").unwrap_or_default();
    let actors = reader.string_list("actors").unwrap_or_default();
    let legacy_scenarios = reader.string_list("scenarios").unwrap_or_default();
    let phase = reader.optional_u32("phase");

    let mut outcomes = Vec::new();
    if let Some(raw) = reader.get("outcomes") {
        match raw.as_sequence() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    match decode_outcome(item) {
                        Ok((outcome, issues)) => {
                            for issue in issues {
                                reader.issue(format!("outcomes[{idx}]: {issue}"));
                            }
                            outcomes.push(outcome);
                        }
                        Err(issues) => {
                            for issue in issues {
                                reader.issue(format!("outcomes[{idx}]: {issue}"));
                            }
                        }
                    }
                }
            }
            None => reader.issue(format!(
                "field `outcomes` must be a list, found {}",
                crate::schema::type_name(raw)
            )),
        }
    }

    Ok(reader.finish(UseCaseSpec { id, name, summary, actors, outcomes, legacy_scenarios, phase }))
}

fn decode_outcome(value: &Value) -> Result<(OutcomeSpec, Vec<String>), Vec<String>> {
    if let Some(text) = value.as_str() {
        return Ok((
            OutcomeSpec::Legacy(text.to_string()),
            vec!["bare string outcome; expected `description` and `scenarios`".to_string()],
        ));
    }

    let mut reader = FieldReader::new(value)?;
    let Some(description) = reader.required_str("description") else {
        return Err(reader.reject("outcome skipped"));
    };
    let scenarios = reader.string_list("scenarios").unwrap_or_default();
    if scenarios.is_empty() {
        reader.issue("outcome declares no scenarios");
    }
    let validated = reader.finish(OutcomeSpec::Structured { description, scenarios });
    Ok((validated.value, validated.issues))
}
