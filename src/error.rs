//! Run-level error types.
//!
//! Per-file problems never surface here: they are converted into
//! [`crate::organizer::MigrationOutcome::Failure`] at the migration boundary
//! and the walk continues. This module only covers the conditions that stop
//! a run before (or instead of) processing files.
//!
//! Library modules use these `thiserror` types; the binary uses `anyhow`
//! on top of them for convenient propagation.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level run error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The selected source root is not an existing directory
    #[error("The specified folder is invalid or does not exist: {}", .0.display())]
    InvalidDirectory(PathBuf),

    /// Neither a configured nor a platform default output root is available
    #[error("Could not determine an output folder")]
    NoOutputRoot,

    /// File I/O error outside of per-file processing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background migration task died
    #[error("Migration task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create an invalid directory error.
    pub fn invalid_directory(path: impl Into<PathBuf>) -> Self {
        Self::InvalidDirectory(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error should be shown to the user as a blocking message
    /// rather than logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidDirectory(_) | Self::NoOutputRoot)
    }
}
