//! Migration sessions driven from a user interface.
//!
//! The [`Organizer`] owns the flow around a walk: it takes the user's
//! directory selection, runs the walk off the calling task, pushes periodic
//! progress to a [`DisplaySurface`] and renders the final report there. At
//! most one session runs at a time; a request that arrives while one is in
//! flight is ignored.
//!
//! [`run_migration`] is the plain library entry point for callers that don't
//! need any of that.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{Error, Result};
use crate::metadata::{LoftyTagReader, SupportedFormats, TagReader};
use crate::organizer::Migrator;
use crate::report::format_report;
use crate::scanner::{self, RunCounters, RunProgress, WalkReport};

/// Shown when the selected folder cannot be used.
pub const INVALID_FOLDER_MESSAGE: &str = "The specified folder is invalid or does not exist!";

/// Shown when the user dismisses the folder selection.
pub const CANCELLED_MESSAGE: &str = "Migration cancelled.";

/// Default period between progress updates.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Where a session writes what the user sees.
///
/// Implementations must be callable from any thread.
pub trait DisplaySurface: Send + Sync {
    /// Add one line to the results listing.
    fn append_line(&self, text: &str);
    /// Clear the listing and status text of a previous run.
    fn reset(&self);
    /// Replace the status text.
    fn set_status_text(&self, text: &str);
    /// Enable or disable whatever starts a new run.
    fn set_busy(&self, busy: bool);
    /// Show a blocking error message.
    fn show_error(&self, text: &str);
}

/// Result of asking the user for a source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySelection {
    Selected(PathBuf),
    /// The user dismissed the dialog
    Cancelled,
    /// The dialog returned nothing usable
    Invalid,
}

/// How a session ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed(WalkReport),
    Cancelled,
    /// Another session was already running; nothing was done
    Busy,
}

/// Runs migrations on behalf of a user interface.
pub struct Organizer<R> {
    display: Arc<dyn DisplaySurface>,
    migrator: Arc<Migrator<R>>,
    output_root: PathBuf,
    progress_interval: Duration,
    running: Arc<AtomicBool>,
}

impl<R: TagReader + 'static> Organizer<R> {
    pub fn new(display: Arc<dyn DisplaySurface>, migrator: Migrator<R>, output_root: PathBuf) -> Self {
        Self {
            display,
            migrator: Arc::new(migrator),
            output_root,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        // tokio intervals panic on a zero period
        self.progress_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Whether a session is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one session for `selection`.
    ///
    /// Returns [`Error::InvalidDirectory`] (after showing it) when the
    /// selection is unusable; no counters are touched and no report is
    /// produced in that case.
    pub async fn run(&self, selection: DirectorySelection) -> Result<SessionOutcome> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            tracing::warn!("Migration already in progress, ignoring request");
            return Ok(SessionOutcome::Busy);
        };

        self.display.reset();

        let requested = match selection {
            DirectorySelection::Selected(path) => path,
            DirectorySelection::Cancelled => {
                tracing::info!("Directory selection cancelled");
                self.display.append_line(CANCELLED_MESSAGE);
                return Ok(SessionOutcome::Cancelled);
            }
            DirectorySelection::Invalid => {
                self.display.show_error(INVALID_FOLDER_MESSAGE);
                return Err(Error::invalid_directory(PathBuf::new()));
            }
        };

        let root = match scanner::validate_root(&requested) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(path = %requested.display(), "Rejected source folder");
                self.display.show_error(INVALID_FOLDER_MESSAGE);
                return Err(e);
            }
        };

        self.display.set_busy(true);
        let progress = RunProgress::new();
        let task = {
            let migrator = Arc::clone(&self.migrator);
            let output_root = self.output_root.clone();
            let progress = progress.clone();
            let root = root.clone();
            tokio::task::spawn_blocking(move || {
                scanner::walk(&root, &output_root, &*migrator, &progress)
            })
        };
        let joined = self.wait_with_progress(task, &progress).await;
        self.display.set_busy(false);

        let report = match joined {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                self.display.show_error(&e.to_string());
                return Err(e);
            }
            Err(e) => {
                let err = Error::Task(e.to_string());
                tracing::error!(error = %err, "Migration task failed");
                self.display.show_error(&err.to_string());
                return Err(err);
            }
        };

        for line in format_report(&report.counters, &report.failures, &self.output_root) {
            self.display.append_line(&line);
        }
        self.display.set_status_text(&root.display().to_string());

        Ok(SessionOutcome::Completed(report))
    }

    /// Await `task`, pushing the success count to the display every tick.
    async fn wait_with_progress(
        &self,
        mut task: JoinHandle<Result<WalkReport>>,
        progress: &RunProgress,
    ) -> std::result::Result<Result<WalkReport>, tokio::task::JoinError> {
        let mut ticker = tokio::time::interval(self.progress_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                joined = &mut task => return joined,
                _ = ticker.tick() => {
                    self.display.set_status_text(&format!(
                        "Scanning... {} files successfully copied.",
                        progress.succeeded()
                    ));
                }
            }
        }
    }
}

/// Holds the single-session flag for as long as a session runs.
struct RunGuard(Arc<AtomicBool>);

impl RunGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Migrate `source_root` into `output_root` with the default formats and
/// tag reader, returning the counters and the report lines.
pub fn run_migration(source_root: &Path, output_root: &Path) -> Result<(RunCounters, Vec<String>)> {
    let migrator = Migrator::new(LoftyTagReader, SupportedFormats::default());
    run_migration_with(&migrator, source_root, output_root)
}

/// [`run_migration`] with a caller-provided migrator.
pub fn run_migration_with<R: TagReader>(
    migrator: &Migrator<R>,
    source_root: &Path,
    output_root: &Path,
) -> Result<(RunCounters, Vec<String>)> {
    let report = scanner::walk(source_root, output_root, migrator, &RunProgress::new())?;
    let lines = format_report(&report.counters, &report.failures, output_root);
    Ok((report.counters, lines))
}
