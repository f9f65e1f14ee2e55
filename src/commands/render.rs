use anyhow::Result;

use crate::commands::CommandReport;
use crate::digest::audit;
use crate::digest::config::load_config;
use crate::digest::paths::resolve_paths;
use crate::digest::render::render_fragment;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config()?;
    let now = cfg.now()?;
    let mut report = CommandReport::new("render");

    report.detail(format!("archive_dir={}", paths.archive_dir.display()));

    let out = render_fragment(
        &paths.archive_dir,
        &paths.fragment_file,
        &paths.reserved_names(),
    )?;
    audit::record(&paths, now, "render", "ok", &out.summary());
    report.note_render(&out);

    Ok(report)
}
