//! Manifest store: the persisted cache of last-known journey and scenario hashes.
//!
//! The manifest is disposable. Loading never fails: a missing file is an empty manifest and
//! a malformed one is reported as corrupted and replaced by an empty (or, under the salvage
//! policy, partially kept) manifest.

mod validate;

pub use validate::ManifestIssue;

use crate::config::ManifestPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub journeys: BTreeMap<String, ManifestJourney>,
    pub scenarios: BTreeMap<String, ManifestScenario>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestJourney {
    pub path: String,
    pub hash: String,
    pub scenarios: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestScenario {
    pub hash: String,
    pub test: String,
    #[serde(default)]
    pub status: ManifestScenarioStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestScenarioStatus {
    #[default]
    Pending,
    Passing,
    Failing,
}

impl ManifestScenarioStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "passing" => Some(Self::Passing),
            "failing" => Some(Self::Failing),
            _ => None,
        }
    }
}

impl Manifest {
    /// Hash recorded for a journey id, if any.
    pub fn journey_hash(&self, id: &str) -> Option<&str> {
        self.journeys.get(id).map(|j| j.hash.as_str())
    }
}

/// Why a manifest file could not be fully trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestCorruption {
    pub path: PathBuf,
    pub issues: Vec<ManifestIssue>,
}

impl ManifestCorruption {
    /// All validation reasons joined for display.
    pub fn reason(&self) -> String {
        self.issues.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; ")
    }
}

/// Result of [`load`]: always a usable manifest, plus the corruption report if any.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub corruption: Option<ManifestCorruption>,
}

impl LoadedManifest {
    pub fn is_corrupted(&self) -> bool {
        self.corruption.is_some()
    }
}

/// Load the manifest at `path`. Never returns an error.
pub fn load(path: &Path, policy: ManifestPolicy) -> LoadedManifest {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return LoadedManifest { manifest: Manifest::default(), corruption: None };
        }
        Err(e) => {
            let issues = vec![ManifestIssue::Unreadable(e.to_string())];
            return corrupted(path, Manifest::default(), issues);
        }
    };

    let (manifest, issues) = validate::decode(&content, policy);
    if issues.is_empty() {
        LoadedManifest { manifest, corruption: None }
    } else {
        corrupted(path, manifest, issues)
    }
}

fn corrupted(path: &Path, manifest: Manifest, issues: Vec<ManifestIssue>) -> LoadedManifest {
    let corruption = ManifestCorruption { path: path.to_path_buf(), issues };
    tracing::warn!(
        "Manifest {} is corrupted ({}); continuing with {} journey entries",
        path.display(),
        corruption.reason(),
        manifest.journeys.len()
    );
    LoadedManifest { manifest, corruption: Some(corruption) }
}

/// Write the manifest atomically: serialize to a sibling temp file, then rename over the
/// target. Parent directories are created as needed.
pub fn save(path: &Path, manifest: &Manifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create manifest directory: {}", parent.display()))?;
    }

    let content = serde_yaml::to_string(manifest).context("Failed to serialize manifest")?;
    let tmp = temp_path(path);
    fs::write(&tmp, content)
        .with_context(|| format!("Failed to write manifest: {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        format!("Failed to move manifest into place: {} -> {}", tmp.display(), path.display())
    })?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Manifest {
        let mut manifest = Manifest::default();
        manifest.journeys.insert(
            "new_user_onboarding".to_string(),
            ManifestJourney {
                path: "product/journeys/new_user_onboarding.md".to_string(),
                hash: "0123456789ab".to_string(),
                scenarios: vec!["specs/auth/signup.feature".to_string()],
            },
        );
        manifest.scenarios.insert(
            "specs/auth/signup.feature".to_string(),
            ManifestScenario {
                hash: "ba9876543210".to_string(),
                test: "tests/e2e/auth/signup.e2e.test.ts".to_string(),
                status: ManifestScenarioStatus::Pending,
            },
        );
        manifest
    }

    #[test]
    fn missing_file_is_empty_and_not_corrupted() {
        let tmp = TempDir::new().expect("tmp");
        let loaded = load(&tmp.path().join("manifest.yml"), ManifestPolicy::Strict);
        assert_eq!(loaded.manifest, Manifest::default());
        assert!(!loaded.is_corrupted());
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("specs/.udd/manifest.yml");
        let manifest = sample();

        save(&path, &manifest).expect("save");
        let loaded = load(&path, ManifestPolicy::Strict);

        assert!(!loaded.is_corrupted());
        similar_asserts::assert_eq!(loaded.manifest, manifest);
    }

    #[test]
    fn empty_manifest_round_trips() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("manifest.yml");
        save(&path, &Manifest::default()).expect("save");
        let loaded = load(&path, ManifestPolicy::Strict);
        assert!(!loaded.is_corrupted());
        assert_eq!(loaded.manifest, Manifest::default());
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("manifest.yml");
        save(&path, &sample()).expect("save");
        assert!(path.exists());
        assert!(!tmp.path().join("manifest.yml.tmp").exists());
    }

    #[test]
    fn invalid_yaml_is_corrupted_and_empty() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("manifest.yml");
        fs::write(&path, "invalid: [yaml: content:\n").expect("write");

        let loaded = load(&path, ManifestPolicy::Strict);
        assert_eq!(loaded.manifest, Manifest::default());
        let corruption = loaded.corruption.expect("corrupted");
        assert_eq!(corruption.path, path);
        assert!(corruption.reason().contains("invalid YAML"));
    }

    #[test]
    fn list_shaped_journeys_are_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("manifest.yml");
        fs::write(&path, "journeys:\n  - name: old_journey\nscenarios: []\n").expect("write");

        let loaded = load(&path, ManifestPolicy::Strict);
        assert!(loaded.is_corrupted());
        let reason = loaded.corruption.expect("corruption").reason();
        assert!(reason.contains("`journeys` must be a mapping"));
    }

    #[test]
    fn unreadable_path_is_corrupted() {
        let tmp = TempDir::new().expect("tmp");
        // A directory where the file should be
        let path = tmp.path().join("manifest.yml");
        fs::create_dir(&path).expect("mkdir");
        let loaded = load(&path, ManifestPolicy::Strict);
        assert!(loaded.is_corrupted());
        assert_eq!(loaded.manifest, Manifest::default());
    }
}
