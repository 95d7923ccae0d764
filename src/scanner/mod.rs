//! Recursive traversal of a source tree.
//!
//! [`walk`] visits every file below a root in file-name order, migrates the
//! visible ones and returns the accumulated [`WalkReport`]. State is threaded
//! through the loop and returned as a value, so every run starts from zero.
//!
//! The only shared state is [`RunProgress`], a single-writer success counter
//! that a progress poller may read while the walk is running.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::metadata::TagReader;
use crate::organizer::{FailureReason, MigrationOutcome, Migrator};

/// A file found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub hidden: bool,
    /// Regular file, or a symlink to one
    pub regular_file: bool,
}

impl SourceEntry {
    fn from_dir_entry(entry: &DirEntry) -> Self {
        let regular_file = if entry.path_is_symlink() {
            std::fs::metadata(entry.path())
                .map(|m| m.is_file())
                .unwrap_or(false)
        } else {
            entry.file_type().is_file()
        };

        Self {
            path: entry.path().to_path_buf(),
            hidden: is_hidden(entry),
            regular_file,
        }
    }
}

/// Run-level counters.
///
/// Once a walk completes, `succeeded + failed == visible_files` and
/// `visible_files + hidden_files` is the number of files visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub visible_files: usize,
    pub hidden_files: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunCounters {
    pub fn total(&self) -> usize {
        self.visible_files + self.hidden_files
    }
}

/// Everything a finished walk produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub counters: RunCounters,
    /// Rendered failure lines in visitation order
    pub failures: Vec<String>,
}

impl WalkReport {
    fn record(&mut self, outcome: &MigrationOutcome, progress: &RunProgress) {
        match outcome {
            MigrationOutcome::Success {
                source,
                destination,
            } => {
                self.counters.succeeded += 1;
                progress.record_success();
                tracing::debug!(
                    source = %source.display(),
                    destination = %destination.display(),
                    "Migrated"
                );
            }
            MigrationOutcome::Failure { source, reason, .. } => {
                self.counters.failed += 1;
                self.failures.push(outcome.render());
                tracing::info!(source = %source.display(), reason = ?reason, "Not migrated");
            }
        }
    }
}

/// Success counter shared between the walker and a progress poller.
///
/// Only the walker writes. Readers use relaxed loads and may see a value
/// that lags behind the walker; that staleness is accepted, the final
/// numbers come from [`WalkReport`].
#[derive(Debug, Clone, Default)]
pub struct RunProgress {
    succeeded: Arc<AtomicUsize>,
}

impl RunProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successes so far. May be stale.
    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::Relaxed)
    }

    fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }
}

/// Resolve `root` to an absolute path of an existing directory.
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    if root.as_os_str().is_empty() || !root.is_dir() {
        return Err(Error::invalid_directory(root));
    }
    std::path::absolute(root).map_err(|_| Error::invalid_directory(root))
}

/// Walk `root` and migrate every visible file into `output_root`.
///
/// Fails only when `root` is not an existing directory; that check happens
/// before anything is counted. Problems with individual entries are recorded
/// as failures and the walk carries on.
pub fn walk<R: TagReader>(
    root: &Path,
    output_root: &Path,
    migrator: &Migrator<R>,
    progress: &RunProgress,
) -> Result<WalkReport> {
    let root = validate_root(root)?;
    tracing::info!(root = %root.display(), output = %output_root.display(), "Starting walk");

    let mut report = WalkReport::default();

    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                tracing::warn!(path = %path.display(), error = %e, "Could not visit entry");
                report.counters.visible_files += 1;
                report.record(
                    &MigrationOutcome::failure(path, FailureReason::Inaccessible),
                    progress,
                );
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let source = SourceEntry::from_dir_entry(&entry);
        if source.hidden {
            report.counters.hidden_files += 1;
            continue;
        }

        report.counters.visible_files += 1;
        let outcome = if source.regular_file {
            migrator.migrate(&source.path, output_root)
        } else {
            // Never open FIFOs, sockets or dangling links
            MigrationOutcome::failure(source.path, FailureReason::UnsupportedFormat)
        };
        report.record(&outcome, progress);
    }

    tracing::info!(
        visible = report.counters.visible_files,
        hidden = report.counters.hidden_files,
        succeeded = report.counters.succeeded,
        failed = report.counters.failed,
        "Walk complete"
    );
    Ok(report)
}

#[cfg(unix)]
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_hidden(entry: &DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    entry
        .metadata()
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(any(unix, windows)))]
fn is_hidden(_entry: &DirEntry) -> bool {
    false
}
