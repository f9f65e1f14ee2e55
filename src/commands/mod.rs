pub mod fetch;
pub mod index;
pub mod render;
pub mod status;
pub mod sweep;

use crate::digest::manifest::ManifestOutcome;
use crate::digest::render::RenderOutcome;
use crate::digest::retention::SweepOutcome;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    pub fn note_sweep(&mut self, sweep: &SweepOutcome) {
        self.detail(format!("sweep: {}", sweep.summary()));
        for name in &sweep.removed {
            self.detail(format!("  removed {name}"));
        }
        for name in &sweep.failed {
            self.issue(format!("failed to remove expired entry {name}"));
        }
    }

    pub fn note_manifest(&mut self, manifest: &ManifestOutcome) {
        match manifest {
            ManifestOutcome::Written { path, files } => {
                self.detail(format!(
                    "built {} with {} news files:",
                    path.display(),
                    files.len()
                ));
                for name in files {
                    self.detail(format!("  - {name}"));
                }
            }
            ManifestOutcome::MissingArchiveDir => {
                self.detail("warning: archive directory not found; manifest not written")
            }
            ManifestOutcome::EmptyArchive => {
                self.detail("no news entries found; manifest not written")
            }
        }
    }

    pub fn note_render(&mut self, render: &RenderOutcome) {
        match render {
            RenderOutcome::Written {
                path,
                blocks,
                skipped,
            } => {
                self.detail(format!("generated {} with {blocks} articles", path.display()));
                for name in skipped {
                    self.detail(format!("  skipped unreadable entry {name}"));
                }
            }
            RenderOutcome::MissingArchiveDir => {
                self.detail("warning: archive directory not found; fragment not written")
            }
            RenderOutcome::EmptyArchive => {
                self.detail("no news entries found; fragment not written")
            }
        }
    }
}
