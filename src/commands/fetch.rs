use anyhow::Result;

use crate::commands::CommandReport;
use crate::digest::client::HttpSummaryClient;
use crate::digest::config::{load_config, require_api_key};
use crate::digest::fetch::run_fetch;
use crate::digest::paths::resolve_paths;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config()?;
    let api_key = require_api_key()?;
    let now = cfg.now()?;
    let mut report = CommandReport::new("fetch");

    report.detail(format!("model={} variant={}", cfg.api.model, cfg.api.variant.label()));
    report.detail(format!("archive_dir={}", paths.archive_dir.display()));

    let client = HttpSummaryClient::from_config(&cfg, api_key);
    let out = run_fetch(&paths, &cfg, &client, now)?;

    report.detail(format!("summary saved to {}", out.entry_path.display()));
    if out.citations > 0 {
        report.detail(format!("citations={}", out.citations));
    }
    report.note_sweep(&out.sweep);
    report.note_manifest(&out.manifest);
    match &out.render {
        Some(render) => report.note_render(render),
        None => report.detail("html rendering disabled"),
    }

    Ok(report)
}
