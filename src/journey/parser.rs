//! Journey document parsing.

use super::tokenizer::{tokenize, Token};
use crate::domain::{Journey, JourneyStep};
use crate::utils::content_hash;
use std::path::Path;

/// Parse a journey file. Returns `None` when the file cannot be read.
pub fn parse_journey_file(path: &Path) -> Option<Journey> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(parse_journey(path, &content)),
        Err(e) => {
            tracing::debug!("Cannot read journey {}: {}", path.display(), e);
            None
        }
    }
}

/// Journey id for a document path: its file stem.
pub fn journey_id(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Parse journey text. Missing pieces fall back to defaults; this never fails.
///
/// - title: first level-1 heading, minus an optional `Journey:` prefix; otherwise the
///   file stem with underscores turned into spaces
/// - actor / goal: first `**Actor:**` / `**Goal:**` label, empty when absent. Plain text
///   lines directly under the goal label continue the goal.
/// - steps: top-level numbered lines in document order; indented (nested) numbered lines
///   are not steps
pub fn parse_journey(path: &Path, content: &str) -> Journey {
    let id = journey_id(path);
    let mut title: Option<String> = None;
    let mut actor: Option<String> = None;
    let mut goal: Option<String> = None;
    let mut goal_open = false;
    let mut steps = Vec::new();

    for token in tokenize(content) {
        let continues_goal = matches!(token, Token::Text(_)) && goal_open;
        match token {
            Token::Heading { level: 1, text } if title.is_none() => {
                let text = text.strip_prefix("Journey:").unwrap_or(text).trim();
                title = Some(text.to_string());
            }
            Token::Label { key, value } if key.eq_ignore_ascii_case("actor") && actor.is_none() => {
                actor = Some(value.to_string());
            }
            Token::Label { key, value } if key.eq_ignore_ascii_case("goal") && goal.is_none() => {
                goal = Some(value.to_string());
                goal_open = true;
                continue;
            }
            Token::Text(text) if continues_goal => {
                if let Some(g) = goal.as_mut() {
                    if !g.is_empty() {
                        g.push(' ');
                    }
                    g.push_str(text);
                }
                continue;
            }
            Token::Step { description, link, .. } => {
                steps.push(JourneyStep {
                    description: description.to_string(),
                    scenario: link.map(str::to_string),
                });
            }
            _ => {}
        }
        goal_open = false;
    }

    let name = title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| id.replace('_', " "));

    Journey {
        id,
        name,
        actor: actor.unwrap_or_default(),
        goal: goal.unwrap_or_default(),
        steps,
        path: path.to_path_buf(),
        hash: content_hash(content),
    }
}
