use crate::digest::dates::newest_first;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Identifiers of every `.json` entry in `dir`, newest first.
///
/// `reserved` names (the manifest) are skipped. A missing directory is an
/// empty archive, not an error.
pub fn scan_archive(dir: &Path, reserved: &[String]) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let read_dir =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in read_dir {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|v| v.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|v| v.to_str()) else {
            continue;
        };
        if reserved.iter().any(|r| r == name) {
            continue;
        }
        out.push(name.to_string());
    }

    out.sort_by(|a, b| newest_first(a, b));
    Ok(out)
}
