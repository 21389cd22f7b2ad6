//! Writing artifacts to an output directory.
//!
//! The directory carries a manifest of what the previous run produced, so
//! unchanged files are left alone and files that are no longer generated are
//! removed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifact::{Artifact, ArtifactKind, sha256, to_hex};
use crate::diagnostics::GenError;

pub const MANIFEST_FILE: &str = "polystruct-manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub kind: ArtifactKind,
    pub hash: String,
}

/// Artifact name to kind and hex content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub artifacts: BTreeMap<String, ManifestEntry>,
}

impl ArtifactManifest {
    pub fn from_artifacts(artifacts: &[Artifact]) -> Self {
        let artifacts = artifacts
            .iter()
            .map(|a| (a.name.clone(), ManifestEntry { kind: a.kind, hash: a.hash_hex() }))
            .collect();
        Self { artifacts }
    }

    /// The manifest in `dir`, or an empty one if there is none yet.
    pub fn load(dir: &Path) -> Result<Self, GenError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| GenError::io(format!("failed to read manifest: {e}"), path.clone()))?;
        serde_json::from_str(&text)
            .map_err(|e| GenError::io(format!("malformed manifest: {e}"), path))
    }

    pub fn to_json(&self) -> Result<String, GenError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GenError::generation(format!("failed to serialize manifest: {e}")))
    }
}

/// What a write (or check) did to the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
    pub removed: Vec<String>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.written.is_empty() && self.removed.is_empty()
    }
}

fn on_disk_hash(path: &Path) -> Option<String> {
    fs::read(path).ok().map(|bytes| to_hex(&sha256(&bytes)))
}

/// Bring `dir` in line with `artifacts`.
///
/// With `check` set nothing is touched; the report lists what a write would
/// change, and a non-clean report is the caller's signal that output is stale.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact], check: bool) -> Result<WriteReport, GenError> {
    let previous = ArtifactManifest::load(dir)?;
    let current = ArtifactManifest::from_artifacts(artifacts);
    let mut report = WriteReport::default();

    if !check {
        fs::create_dir_all(dir)
            .map_err(|e| GenError::io(format!("failed to create output directory: {e}"), dir.to_path_buf()))?;
    }

    for artifact in artifacts {
        let path = dir.join(&artifact.name);
        if on_disk_hash(&path).as_deref() == Some(artifact.hash_hex().as_str()) {
            report.unchanged.push(artifact.name.clone());
            continue;
        }
        if !check {
            write_file(&path, &artifact.source)?;
            debug!(artifact = %artifact.name, kind = %artifact.kind, "wrote artifact");
        }
        report.written.push(artifact.name.clone());
    }

    for stale in previous.artifacts.keys().filter(|name| !current.artifacts.contains_key(*name)) {
        let path = dir.join(stale);
        if !path.exists() {
            continue;
        }
        if !check {
            fs::remove_file(&path)
                .map_err(|e| GenError::io(format!("failed to remove stale artifact: {e}"), path.clone()))?;
            debug!(artifact = %stale, "removed stale artifact");
        }
        report.removed.push(stale.clone());
    }

    if !check && previous != current {
        write_file(&dir.join(MANIFEST_FILE), &current.to_json()?)?;
    }

    Ok(report)
}

/// Write beside the destination, then rename over it, so a reader never sees a
/// half-written artifact or manifest.
fn write_file(path: &Path, contents: &str) -> Result<(), GenError> {
    let staging = staging_path(path);
    fs::write(&staging, contents)
        .map_err(|e| GenError::io(format!("failed to write: {e}"), staging.clone()))?;
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        GenError::io(format!("failed to replace: {e}"), PathBuf::from(path))
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
