use anyhow::Result;

use crate::commands::CommandReport;
use crate::digest::audit;
use crate::digest::config::load_config;
use crate::digest::manifest::rebuild_manifest;
use crate::digest::paths::resolve_paths;
use crate::digest::retention::sweep_expired;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config()?;
    let now = cfg.now()?;
    let reserved = paths.reserved_names();
    let mut report = CommandReport::new("sweep");

    report.detail(format!("retention_days={}", cfg.archive.retention_days));

    let sweep = sweep_expired(
        &paths.archive_dir,
        &reserved,
        now,
        cfg.archive.retention_days,
    )?;
    let status = if sweep.failed.is_empty() { "ok" } else { "degraded" };
    audit::record(&paths, now, "sweep", status, &sweep.summary());
    report.note_sweep(&sweep);

    let manifest = rebuild_manifest(&paths.archive_dir, &paths.manifest_file, &reserved, now)?;
    audit::record(&paths, now, "manifest", "ok", &manifest.summary());
    report.note_manifest(&manifest);

    Ok(report)
}
