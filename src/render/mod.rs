//! Output rendering (text and JSON)

pub mod status;
pub mod sync;

pub use status::render_status;
pub use sync::render_sync_report;

use crate::domain::{ProjectStatus, SpecIssue};
use anyhow::Result;

/// Pretty JSON for a project status.
pub fn render_status_json(status: &ProjectStatus) -> Result<String> {
    Ok(serde_json::to_string_pretty(status)?)
}

/// One `<path>: <reason>` line per issue.
pub fn render_issues(issues: &[SpecIssue]) -> String {
    issues.iter().map(|issue| format!("{issue}\n")).collect()
}
