//! Configuration values and their defaults.

use serde::{Deserialize, Serialize};

/// How the manifest store treats a manifest with malformed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestPolicy {
    /// Any malformed entry discards the whole manifest.
    #[default]
    Strict,
    /// Malformed entries are dropped and the valid ones kept.
    Salvage,
}

/// Project settings. Every path is relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub journeys_dir: String,
    pub specs_dir: String,
    pub features_dir: String,
    pub use_cases_dir: String,
    pub vision_file: String,
    pub manifest_path: String,
    pub results_path: String,
    pub tests_dir: String,
    pub test_suffix: String,
    /// Overrides the phase declared in the vision document.
    pub current_phase: Option<u32>,
    pub manifest_policy: ManifestPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journeys_dir: "product/journeys".to_string(),
            specs_dir: "specs".to_string(),
            features_dir: "specs/features".to_string(),
            use_cases_dir: "specs/use-cases".to_string(),
            vision_file: "specs/VISION.md".to_string(),
            manifest_path: "specs/.udd/manifest.yml".to_string(),
            results_path: ".udd/results.json".to_string(),
            tests_dir: "tests/e2e".to_string(),
            test_suffix: ".e2e.test.ts".to_string(),
            current_phase: None,
            manifest_policy: ManifestPolicy::Strict,
        }
    }
}
