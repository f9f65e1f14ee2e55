use anyhow::Result;

use crate::commands::CommandReport;
use crate::digest::audit;
use crate::digest::config::load_config;
use crate::digest::manifest::rebuild_manifest;
use crate::digest::paths::resolve_paths;

/// Rebuild the manifest from the archive as it stands, e.g. after manual edits.
pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config()?;
    let now = cfg.now()?;
    let mut report = CommandReport::new("index");

    report.detail(format!("archive_dir={}", paths.archive_dir.display()));

    let out = rebuild_manifest(
        &paths.archive_dir,
        &paths.manifest_file,
        &paths.reserved_names(),
        now,
    )?;
    audit::record(&paths, now, "manifest", "ok", &out.summary());
    report.note_manifest(&out);

    Ok(report)
}
