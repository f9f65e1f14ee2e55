//! HTML fragment for the static news page.
//!
//! The fragment is a flat list of `news-block` elements; the hosting page
//! provides `toggleNews` and the styling.

use crate::digest::dates::{display_date, extract_date};
use crate::digest::entry::{NewsEntry, load_entry};
use crate::digest::fsutil::write_atomic;
use crate::digest::scan::scan_archive;
use crate::digest::warn::{self, WarnEvent};
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const BLOCK_TITLE: &str = "AI & Tech News Summary";

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Written {
        path: PathBuf,
        blocks: usize,
        skipped: Vec<String>,
    },
    MissingArchiveDir,
    EmptyArchive,
}

impl RenderOutcome {
    pub fn summary(&self) -> String {
        match self {
            Self::Written {
                path,
                blocks,
                skipped,
            } => format!(
                "written path={} blocks={} skipped={}",
                path.display(),
                blocks,
                skipped.len()
            ),
            Self::MissingArchiveDir => "skipped reason=archive-dir-missing".to_string(),
            Self::EmptyArchive => "skipped reason=no-entries".to_string(),
        }
    }
}

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("static bold pattern"))
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("static link pattern")
    })
}

/// Bold, then links, then paragraph and line breaks. Order matters.
pub fn summary_to_html(summary: &str) -> String {
    let bolded = bold_pattern().replace_all(summary, "<strong>$1</strong>");
    let linked = link_pattern().replace_all(&bolded, r#"<a href="$2">$1</a>"#);
    linked.replace("\n\n", "<br><br>").replace('\n', "<br>")
}

fn sources_html(citations: &[String]) -> String {
    if citations.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n            <ol class=\"news-sources\">");
    for url in citations {
        out.push_str(&format!("\n                <li><a href=\"{url}\">{url}</a></li>"));
    }
    out.push_str("\n            </ol>");
    out
}

pub fn render_block(entry: &NewsEntry, identifier: &str, expanded: bool) -> String {
    let date = display_date(extract_date(identifier));
    let body = summary_to_html(&entry.summary);
    let sources = sources_html(entry.citation_list());
    let (content_class, toggle) = if expanded {
        ("news-content expanded", "\u{2212}")
    } else {
        ("news-content", "+")
    };

    format!(
        r#"
    <div class="news-block">
        <div class="news-header" onclick="toggleNews(this)">
            <span class="news-title">{BLOCK_TITLE}</span>
            <span class="news-date">{date}</span>
            <span class="news-toggle">{toggle}</span>
        </div>
        <div class="{content_class}">
            <p>{body}</p>{sources}
        </div>
    </div>"#
    )
}

/// Render every readable entry, newest first, and overwrite `fragment_file`.
///
/// Unreadable entries are skipped with a warning. Only the first rendered
/// block is expanded.
pub fn render_fragment(
    archive_dir: &Path,
    fragment_file: &Path,
    reserved: &[String],
) -> Result<RenderOutcome> {
    if !archive_dir.exists() {
        return Ok(RenderOutcome::MissingArchiveDir);
    }
    let names = scan_archive(archive_dir, reserved)?;
    if names.is_empty() {
        return Ok(RenderOutcome::EmptyArchive);
    }

    let mut blocks = Vec::with_capacity(names.len());
    let mut skipped = Vec::new();
    for name in names {
        let entry = match load_entry(&archive_dir.join(&name)) {
            Ok(entry) => entry,
            Err(err) => {
                warn::emit(WarnEvent {
                    code: "ENTRY_UNREADABLE",
                    stage: "render",
                    action: "skip-entry",
                    entry: &name,
                    reason: "load-or-parse-failed",
                    err: &format!("{err:#}"),
                });
                skipped.push(name);
                continue;
            }
        };
        blocks.push(render_block(&entry, &name, blocks.is_empty()));
    }

    write_atomic(fragment_file, blocks.join("\n").as_bytes())?;

    Ok(RenderOutcome::Written {
        path: fragment_file.to_path_buf(),
        blocks: blocks.len(),
        skipped,
    })
}
