//! Path normalization

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Render `path` relative to `root` with forward slashes, falling back to the full path.
pub fn display_relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_path(&rel.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn relative_display_strips_root() {
        let root = PathBuf::from("/work/project");
        let path = root.join("specs").join("features").join("auth");
        assert_eq!(display_relative(&root, &path), "specs/features/auth");
    }

    #[test]
    fn relative_display_keeps_foreign_paths() {
        let root = PathBuf::from("/work/project");
        assert_eq!(display_relative(&root, Path::new("/elsewhere/a.md")), "/elsewhere/a.md");
    }
}
