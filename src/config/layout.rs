//! Resolves configured locations against a project root.

use super::settings::Config;
use std::path::{Component, Path, PathBuf};

/// A project root plus the settings that say where each source lives under it.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    config: Config,
}

impl ProjectLayout {
    /// The root is made absolute once here, so every derived path is absolute too.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self { root: absolute_root(root.into()), config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn journeys_dir(&self) -> PathBuf {
        self.root.join(&self.config.journeys_dir)
    }

    pub fn features_dir(&self) -> PathBuf {
        self.root.join(&self.config.features_dir)
    }

    pub fn use_cases_dir(&self) -> PathBuf {
        self.root.join(&self.config.use_cases_dir)
    }

    pub fn vision_file(&self) -> PathBuf {
        self.root.join(&self.config.vision_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.config.manifest_path)
    }

    pub fn results_path(&self) -> PathBuf {
        self.root.join(&self.config.results_path)
    }

    /// Absolute form of a root-relative path.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Like [`resolve`](Self::resolve), but `None` for absolute paths and paths with `..`,
    /// which could land outside the root.
    pub fn resolve_contained(&self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        let relative = relative.as_ref();
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(relative))
    }

    /// Root-relative test file paired with a root-relative scenario path.
    ///
    /// `specs/features/auth/login/happy_path.feature` pairs with
    /// `tests/e2e/auth/login/happy_path.e2e.test.ts` under the default layout.
    pub fn paired_test_path(&self, scenario: &Path) -> PathBuf {
        let features = Path::new(&self.config.features_dir);
        let specs = Path::new(&self.config.specs_dir);
        let relative = scenario
            .strip_prefix(features)
            .or_else(|_| scenario.strip_prefix(specs))
            .unwrap_or(scenario);

        let stem = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = format!("{}{}", stem, self.config.test_suffix);

        let tests = Path::new(&self.config.tests_dir);
        match relative.parent() {
            Some(parent) => tests.join(parent).join(file_name),
            None => tests.join(file_name),
        }
    }
}

fn absolute_root(root: PathBuf) -> PathBuf {
    if let Ok(canonical) = root.canonicalize() {
        return canonical;
    }
    if root.is_absolute() {
        return root;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(root),
        Err(_) => root,
    }
}
