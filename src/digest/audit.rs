use crate::digest::entry::iso_timestamp;
use crate::digest::paths::NewsPaths;
use crate::digest::warn::{self, WarnEvent};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub at: String,
    pub phase: String,
    pub status: String,
    pub message: String,
}

pub fn audit_log_path(paths: &NewsPaths) -> PathBuf {
    paths.logs_dir.join("audit.log")
}

pub fn append_event(
    paths: &NewsPaths,
    now: DateTime<FixedOffset>,
    phase: &str,
    status: &str,
    message: &str,
) -> Result<()> {
    fs::create_dir_all(&paths.logs_dir)
        .with_context(|| format!("failed to create {}", paths.logs_dir.display()))?;
    let event = AuditEvent {
        at: iso_timestamp(now),
        phase: phase.to_string(),
        status: status.to_string(),
        message: message.to_string(),
    };

    let line = format!("{}\n", serde_json::to_string(&event)?);
    let path = audit_log_path(paths);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Audit trail problems never abort a pipeline stage.
pub fn record(
    paths: &NewsPaths,
    now: DateTime<FixedOffset>,
    phase: &str,
    status: &str,
    message: &str,
) {
    if let Err(err) = append_event(paths, now, phase, status, message) {
        warn::emit(WarnEvent {
            code: "AUDIT_WRITE_FAILED",
            stage: phase,
            action: "append-audit-log",
            entry: "",
            reason: "audit-log-unwritable",
            err: &format!("{err:#}"),
        });
    }
}
