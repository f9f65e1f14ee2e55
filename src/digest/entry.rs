use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One persisted news summary. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEntry {
    pub timestamp: String,
    pub summary: String,
    /// Absent in entries written by the simple variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

impl NewsEntry {
    pub fn new(
        now: DateTime<FixedOffset>,
        summary: String,
        citations: Option<Vec<String>>,
    ) -> Self {
        Self {
            timestamp: iso_timestamp(now),
            summary,
            citations,
        }
    }

    pub fn citation_list(&self) -> &[String] {
        self.citations.as_deref().unwrap_or(&[])
    }
}

pub fn iso_timestamp(now: DateTime<FixedOffset>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// `<prefix>_YYYY-MM-DD_HH-MM-SS.json`; the seconds keep same-day runs distinct.
pub fn entry_identifier(prefix: &str, now: DateTime<FixedOffset>) -> String {
    format!("{}_{}.json", prefix, now.format("%Y-%m-%d_%H-%M-%S"))
}

pub fn load_entry(path: &Path) -> Result<NewsEntry> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed: NewsEntry = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed)
}
