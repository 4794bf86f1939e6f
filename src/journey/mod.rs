//! User journey documents

pub mod parser;
pub mod tokenizer;

pub use parser::{journey_id, parse_journey, parse_journey_file};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Journey documents in `dir`: `*.md` files not starting with `_`, sorted by name.
pub fn discover_journeys(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list journeys directory: {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            name.ends_with(".md") && !name.starts_with('_')
        })
        .collect();
    files.sort();
    Ok(files)
}
