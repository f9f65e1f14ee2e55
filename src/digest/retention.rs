use crate::digest::dates::{extract_date, is_undated};
use crate::digest::scan::scan_archive;
use crate::digest::warn::{self, WarnEvent};
use anyhow::Result;
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_RETENTION_DAYS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepOutcome {
    pub scanned: usize,
    pub removed: Vec<String>,
    pub undated_kept: Vec<String>,
    pub failed: Vec<String>,
}

impl SweepOutcome {
    pub fn summary(&self) -> String {
        format!(
            "scanned={} removed={} undated_kept={} failed={}",
            self.scanned,
            self.removed.len(),
            self.undated_kept.len(),
            self.failed.len()
        )
    }
}

/// First calendar day still inside the window.
pub fn retention_cutoff(now: DateTime<FixedOffset>, window_days: u64) -> NaiveDate {
    let today = now.date_naive();
    today
        .checked_sub_days(Days::new(window_days))
        .unwrap_or(NaiveDate::MIN)
}

/// Delete entries dated strictly before the cutoff.
///
/// Entries without a parseable date are never removed. Deletion failures are
/// reported in the outcome and do not stop the sweep.
pub fn sweep_expired(
    dir: &Path,
    reserved: &[String],
    now: DateTime<FixedOffset>,
    window_days: u64,
) -> Result<SweepOutcome> {
    let cutoff = retention_cutoff(now, window_days);
    let mut out = SweepOutcome::default();

    for name in scan_archive(dir, reserved)? {
        out.scanned += 1;
        let date = extract_date(&name);
        if is_undated(date) {
            out.undated_kept.push(name);
            continue;
        }
        if date >= cutoff {
            continue;
        }

        match fs::remove_file(dir.join(&name)) {
            Ok(_) => out.removed.push(name),
            Err(err) => {
                warn::emit(WarnEvent {
                    code: "SWEEP_DELETE_FAILED",
                    stage: "sweep",
                    action: "remove-expired-entry",
                    entry: &name,
                    reason: "remove-file-failed",
                    err: &err.to_string(),
                });
                out.failed.push(name);
            }
        }
    }

    Ok(out)
}
