use crate::digest::entry::iso_timestamp;
use crate::digest::fsutil::{to_json_with_indent, write_atomic};
use crate::digest::scan::scan_archive;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub last_updated: String,
    pub total_files: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ManifestOutcome {
    Written { path: PathBuf, files: Vec<String> },
    MissingArchiveDir,
    EmptyArchive,
}

impl ManifestOutcome {
    pub fn summary(&self) -> String {
        match self {
            Self::Written { path, files } => {
                format!("written path={} files={}", path.display(), files.len())
            }
            Self::MissingArchiveDir => "skipped reason=archive-dir-missing".to_string(),
            Self::EmptyArchive => "skipped reason=no-entries".to_string(),
        }
    }
}

pub fn build_manifest(files: Vec<String>, now: DateTime<FixedOffset>) -> Manifest {
    Manifest {
        last_updated: iso_timestamp(now),
        total_files: files.len(),
        files,
    }
}

/// Recompute the manifest from the archive and overwrite `manifest_file`.
///
/// An absent or empty archive leaves any existing manifest untouched.
pub fn rebuild_manifest(
    archive_dir: &Path,
    manifest_file: &Path,
    reserved: &[String],
    now: DateTime<FixedOffset>,
) -> Result<ManifestOutcome> {
    if !archive_dir.exists() {
        return Ok(ManifestOutcome::MissingArchiveDir);
    }
    let files = scan_archive(archive_dir, reserved)?;
    if files.is_empty() {
        return Ok(ManifestOutcome::EmptyArchive);
    }

    let manifest = build_manifest(files, now);
    let data = to_json_with_indent(&manifest, b"  ")?;
    write_atomic(manifest_file, data.as_bytes())?;

    Ok(ManifestOutcome::Written {
        path: manifest_file.to_path_buf(),
        files: manifest.files,
    })
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: Manifest = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed)
}
