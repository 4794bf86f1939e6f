//! Development phase: the project's current phase and per-scenario phase tags.

use crate::config::ProjectLayout;
use crate::domain::SpecIssue;
use crate::schema::{parse_yaml, FieldReader};
use crate::utils::{display_relative, split_frontmatter};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_PHASE: u32 = 1;

static PHASE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"@phase:(\d+)").expect("phase pattern"));

/// Phase tag from a scenario file's preamble (the text before the first `Feature:`).
///
/// Files without a `Feature:` keyword have no preamble and therefore no phase.
pub fn scenario_phase(content: &str) -> Option<u32> {
    let preamble = &content[..content.find("Feature:")?];
    PHASE_TAG.captures(preamble).and_then(|caps| caps.get(1)).and_then(|m| m.as_str().parse().ok())
}

/// A scenario is deferred when it is tagged for a phase after the current one.
pub fn is_deferred(phase: Option<u32>, current_phase: u32) -> bool {
    phase.is_some_and(|p| p > current_phase)
}

/// Current project phase: the configured override, else `current_phase` from the vision
/// document's frontmatter, else [`DEFAULT_PHASE`].
pub fn current_phase(layout: &ProjectLayout) -> (u32, Option<SpecIssue>) {
    if let Some(phase) = layout.config().current_phase {
        return (phase, None);
    }

    let path = layout.vision_file();
    let Ok(content) = std::fs::read_to_string(&path) else {
        return (DEFAULT_PHASE, None);
    };
    let rel = display_relative(layout.root(), &path);

    let Some((front, _)) = split_frontmatter(&content) else {
        return (DEFAULT_PHASE, None);
    };

    let decoded = parse_yaml(front).and_then(|value| {
        let mut reader = FieldReader::new(&value)?;
        let phase = reader.optional_u32("current_phase");
        Ok(reader.finish(phase))
    });

    match decoded {
        Ok(v) if v.issues.is_empty() => (v.value.unwrap_or(DEFAULT_PHASE), None),
        Ok(v) => (DEFAULT_PHASE, Some(SpecIssue::new(rel, v.issues.join("; ")))),
        Err(issues) => (DEFAULT_PHASE, Some(SpecIssue::new(rel, issues.join("; ")))),
    }
}
