//! Feature metadata (`_feature.yml`) decoding.

use crate::domain::FeatureKind;
use crate::schema::{Decoded, FieldReader};
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    pub id: String,
    pub area: String,
    pub name: String,
    pub summary: String,
    pub use_cases: Vec<String>,
    pub phase: Option<u32>,
    pub kind: Option<FeatureKind>,
}

/// Decode feature metadata. Only a missing or mistyped `id` makes the document unusable;
/// other violations are reported and replaced by defaults.
pub fn decode_feature(value: &Value) -> Decoded<FeatureSpec> {
    let mut reader = FieldReader::new(value)?;

    let Some(id) = reader.required_str("id").filter(|id| !id.trim().is_empty()) else {
        return Err(reader.reject("feature id is required"));
    };
    let area = reader.required_str("area").unwrap_or_default();
    let name = reader.required_str("name").unwrap_or_else(|| id.clone());
    let summary = reader.required_str("summary").unwrap_or_default();
    let use_cases = reader.string_list("use_cases").unwrap_or_default();
    let phase = reader.optional_u32("phase");
    let kind = match reader.optional_str("kind") {
        Some(raw) => {
            let kind = FeatureKind::parse(&raw);
            if kind.is_none() {
                reader.issue(format!(
                    "field `kind` must be one of core, extension, experimental; found `{raw}`"
                ));
            }
            kind
        }
        None => None,
    };
    // Optional research / tech-spec linkage; only the types are checked
    reader.optional_bool("requires_research");
    reader.optional_str("research");
    reader.optional_bool("tech_spec");

    Ok(reader.finish(FeatureSpec { id, area, name, summary, use_cases, phase, kind }))
}
