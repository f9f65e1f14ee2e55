use crate::digest::audit;
use crate::digest::client::{SummaryClient, build_request};
use crate::digest::config::{FetchVariant, NewsConfig};
use crate::digest::entry::{NewsEntry, entry_identifier};
use crate::digest::fsutil::{create_atomic, to_json_with_indent};
use crate::digest::manifest::{ManifestOutcome, rebuild_manifest};
use crate::digest::paths::NewsPaths;
use crate::digest::render::{RenderOutcome, render_fragment};
use crate::digest::retention::{SweepOutcome, sweep_expired};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub entry_path: PathBuf,
    pub citations: usize,
    pub sweep: SweepOutcome,
    pub manifest: ManifestOutcome,
    pub render: Option<RenderOutcome>,
}

/// Persist one new entry. The file appears whole or not at all.
pub fn persist_entry(
    paths: &NewsPaths,
    cfg: &NewsConfig,
    entry: &NewsEntry,
    now: DateTime<FixedOffset>,
) -> Result<PathBuf> {
    let path = paths
        .archive_dir
        .join(entry_identifier(&cfg.archive.file_prefix, now));
    let data = to_json_with_indent(entry, b"    ")?;
    create_atomic(&path, data.as_bytes())?;
    Ok(path)
}

/// Sweep, then rebuild the derived artifacts from whatever survived.
pub fn rebuild_derived(
    paths: &NewsPaths,
    cfg: &NewsConfig,
    now: DateTime<FixedOffset>,
) -> Result<(SweepOutcome, ManifestOutcome, Option<RenderOutcome>)> {
    let reserved = paths.reserved_names();

    let sweep = sweep_expired(
        &paths.archive_dir,
        &reserved,
        now,
        cfg.archive.retention_days,
    )?;
    let sweep_status = if sweep.failed.is_empty() { "ok" } else { "degraded" };
    audit::record(paths, now, "sweep", sweep_status, &sweep.summary());

    let manifest = rebuild_manifest(&paths.archive_dir, &paths.manifest_file, &reserved, now)?;
    audit::record(paths, now, "manifest", "ok", &manifest.summary());

    let render = if cfg.archive.render_html {
        let out = render_fragment(&paths.archive_dir, &paths.fragment_file, &reserved)?;
        audit::record(paths, now, "render", "ok", &out.summary());
        Some(out)
    } else {
        None
    };

    Ok((sweep, manifest, render))
}

/// One full run: call the API once, persist, then sweep and rebuild.
///
/// Any API failure ends the run before the archive is touched.
pub fn run_fetch(
    paths: &NewsPaths,
    cfg: &NewsConfig,
    client: &dyn SummaryClient,
    now: DateTime<FixedOffset>,
) -> Result<FetchOutcome> {
    let request = build_request(cfg, now);
    let completion = match client.complete(&request) {
        Ok(completion) => completion,
        Err(err) => {
            audit::record(paths, now, "fetch", "failed", &format!("{err:#}"));
            return Err(err);
        }
    };
    audit::record(
        paths,
        now,
        "fetch",
        "ok",
        &format!(
            "model={} variant={} chars={} citations={}",
            cfg.api.model,
            cfg.api.variant.label(),
            completion.content.chars().count(),
            completion.citations.len()
        ),
    );

    let citations = match cfg.api.variant {
        FetchVariant::Simple => None,
        FetchVariant::Rich => Some(completion.citations),
    };
    let citation_count = citations.as_ref().map_or(0, Vec::len);
    let entry = NewsEntry::new(now, completion.content, citations);
    let entry_path = persist_entry(paths, cfg, &entry, now)
        .with_context(|| format!("failed to persist entry in {}", paths.archive_dir.display()))?;
    audit::record(
        paths,
        now,
        "persist",
        "ok",
        &format!("entry={}", entry_path.display()),
    );

    let (sweep, manifest, render) = rebuild_derived(paths, cfg, now)?;

    Ok(FetchOutcome {
        entry_path,
        citations: citation_count,
        sweep,
        manifest,
        render,
    })
}
