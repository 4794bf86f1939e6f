//! Small filesystem and document helpers shared by the loaders.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::SystemTime;

/// Read a UTF-8 text file, naming the path on failure.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Modification time of `path`, or `None` when the file is absent or the platform
/// cannot report it.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Split a leading `---` YAML frontmatter block from a markdown document.
///
/// Returns the frontmatter body (without fences) and the remainder. Documents without a
/// closed frontmatter block return `None`.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0usize;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = &rest[..offset];
            let remainder = &rest[offset + line.len()..];
            return Some((body.trim_end_matches(|c: char| c == '\n' || c == '\r'), remainder));
        }
        offset += line.len();
    }
    None
}
