//! Folder migration command.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::cli::{ConsoleDisplay, select_directory};
use crate::config::Config;
use crate::error::Error;
use crate::metadata::LoftyTagReader;
use crate::organizer::Migrator;
use crate::session::{DirectorySelection, Organizer, SessionOutcome};

/// Migrate `source` (or a picked folder) into the output root
pub fn cmd_migrate(
    rt: &Runtime,
    config: &Config,
    source: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let output_root = output
        .cloned()
        .or_else(|| config.output_root())
        .ok_or(Error::NoOutputRoot)?;

    let selection = match source {
        Some(path) => DirectorySelection::Selected(path.clone()),
        None => select_directory(),
    };

    let display = Arc::new(ConsoleDisplay::new(std::io::stderr().is_terminal()));
    let migrator = Migrator::new(LoftyTagReader, config.supported_formats());
    let organizer = Organizer::new(display, migrator, output_root)
        .with_progress_interval(config.progress_interval());

    match rt.block_on(organizer.run(selection)) {
        Ok(SessionOutcome::Completed(report)) => {
            tracing::info!(
                succeeded = report.counters.succeeded,
                failed = report.counters.failed,
                "Migration finished"
            );
            Ok(())
        }
        Ok(SessionOutcome::Cancelled | SessionOutcome::Busy) => Ok(()),
        // Already shown to the user by the display
        Err(e) if e.is_user_facing() => std::process::exit(1),
        Err(e) => Err(e.into()),
    }
}
