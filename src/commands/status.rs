use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::digest::config::load_config;
use crate::digest::manifest::load_manifest;
use crate::digest::paths::resolve_paths;
use crate::digest::scan::scan_archive;

include!(concat!(env!("OUT_DIR"), "/news_env_allowlist.rs"));

fn unknown_news_keys<I>(keys: I, allowlist: &[&str]) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = keys
        .into_iter()
        .filter(|k| k.starts_with("NEWS_"))
        .filter(|k| !allowlist.contains(&k.as_str()))
        .collect::<Vec<_>>();
    out.sort();
    out
}

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("home={}", paths.home.display()));
    report.detail(format!("archive_dir={}", paths.archive_dir.display()));
    report.detail(format!("manifest_file={}", paths.manifest_file.display()));
    report.detail(format!("fragment_file={}", paths.fragment_file.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));

    match load_config() {
        Ok(cfg) => {
            report.detail(format!("endpoint={}", cfg.api.endpoint));
            report.detail(format!("model={}", cfg.api.model));
            report.detail(format!("variant={}", cfg.api.variant.label()));
            report.detail(format!("timeout_secs={}", cfg.api.timeout_secs));
            report.detail(format!("retention_days={}", cfg.archive.retention_days));
            report.detail(format!("render_html={}", cfg.archive.render_html));
            report.detail(format!(
                "timezone={}",
                cfg.archive.timezone.as_deref().unwrap_or("local")
            ));
        }
        Err(err) => report.issue(format!("config: {err:#}")),
    }

    if env::var("XAI_API_KEY").map_or(true, |v| v.trim().is_empty()) {
        report.issue("XAI_API_KEY is not set; `fetch` will refuse to run");
    } else {
        report.detail("XAI_API_KEY=set");
    }

    if paths.archive_dir.exists() {
        let entries = scan_archive(&paths.archive_dir, &paths.reserved_names())?;
        report.detail(format!("entries={}", entries.len()));
        if let Some(newest) = entries.first() {
            report.detail(format!("newest={newest}"));
        }
    } else {
        report.detail("entries=0 (archive dir missing)");
    }

    if paths.manifest_file.exists() {
        match load_manifest(&paths.manifest_file) {
            Ok(manifest) => report.detail(format!(
                "manifest last_updated={} total_files={}",
                manifest.last_updated, manifest.total_files
            )),
            Err(err) => report.issue(format!("manifest unreadable: {err:#}")),
        }
    }

    for key in unknown_news_keys(env::vars().map(|(k, _)| k), GENERATED_NEWS_ENV_ALLOWLIST) {
        report.issue(format!("unrecognized environment variable {key}"));
    }

    Ok(report)
}
