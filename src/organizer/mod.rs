//! Per-file migration.
//!
//! Copies a single music file into the normalized layout
//! `MusicOrganizerOutput/{Artist}/{Album}/{Title}.{ext}` under an output
//! root. Every problem is caught here and turned into a
//! [`MigrationOutcome::Failure`]; nothing escapes to the walker.
//!
//! # Guarantees
//! - Existing files are never overwritten
//! - A failed migration leaves no file behind
//! - The copy keeps the source's modification time

pub mod path;

use std::fs::{self, File, FileTimes, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::metadata::{self, SupportedFormats, TagError, TagReader, TrackMetadata};

pub use path::{OUTPUT_FOLDER, output_folder, resolve_destination, sanitize};

/// Why a file was not migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Extension not in the supported set, or not a regular file
    UnsupportedFormat,
    /// Tag extraction failed or found no tags
    UnreadableTags,
    /// Artist, album or title empty after sanitization
    IncompleteTags,
    /// Destination already exists
    DuplicateDestination,
    /// I/O failure while copying
    CopyError,
    /// The walker could not read the entry at all
    Inaccessible,
}

impl FailureReason {
    /// User-facing message for this reason. `source` is only used by
    /// [`FailureReason::DuplicateDestination`].
    pub fn message(&self, source: &Path) -> String {
        match self {
            Self::UnsupportedFormat => "not a valid music file.".to_string(),
            Self::IncompleteTags => "does not have valid tags for migration.".to_string(),
            Self::DuplicateDestination => {
                format!("duplicate file. Cannot migrate {}.", source.display())
            }
            // Unreadable tags and copy failures share the same coarse message
            Self::UnreadableTags | Self::CopyError => "unidentified error.".to_string(),
            Self::Inaccessible => "could not be accessed.".to_string(),
        }
    }
}

impl From<&TagError> for FailureReason {
    fn from(err: &TagError) -> Self {
        match err {
            TagError::UnsupportedFormat(_) => Self::UnsupportedFormat,
            TagError::UnreadableTags(_) => Self::UnreadableTags,
            TagError::IncompleteTags => Self::IncompleteTags,
        }
    }
}

/// Result of migrating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Success {
        source: PathBuf,
        destination: PathBuf,
    },
    Failure {
        source: PathBuf,
        reason: FailureReason,
        message: String,
    },
}

impl MigrationOutcome {
    pub fn failure(source: impl Into<PathBuf>, reason: FailureReason) -> Self {
        let source = source.into();
        let message = reason.message(&source);
        Self::Failure {
            source,
            reason,
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(*reason),
        }
    }

    /// One report line for this outcome.
    pub fn render(&self) -> String {
        match self {
            Self::Success {
                source,
                destination,
            } => format!(
                "Source file: {}. Destination file: {}",
                source.display(),
                destination.display()
            ),
            Self::Failure {
                source, message, ..
            } => format!("Error: {} {}", source.display(), message),
        }
    }
}

/// Migrates single files using a tag reader and a set of accepted formats.
#[derive(Debug, Clone)]
pub struct Migrator<R> {
    reader: R,
    formats: SupportedFormats,
}

impl<R: TagReader> Migrator<R> {
    pub fn new(reader: R, formats: SupportedFormats) -> Self {
        Self { reader, formats }
    }

    #[cfg(test)]
    pub(crate) fn reader(&self) -> &R {
        &self.reader
    }

    /// Migrate `source` into the layout under `output_root`.
    pub fn migrate(&self, source: &Path, output_root: &Path) -> MigrationOutcome {
        let meta = match metadata::read(&self.reader, source, &self.formats) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(source = %source.display(), error = %e, "Tag read failed");
                return MigrationOutcome::failure(source, FailureReason::from(&e));
            }
        };

        let Some(destination) = destination_for(source, &meta, output_root) else {
            return MigrationOutcome::failure(source, FailureReason::IncompleteTags);
        };

        match copy_new(source, &destination) {
            Ok(()) => MigrationOutcome::Success {
                source: source.to_path_buf(),
                destination,
            },
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                MigrationOutcome::failure(source, FailureReason::DuplicateDestination)
            }
            Err(e) => {
                tracing::warn!(
                    source = %source.display(),
                    destination = %destination.display(),
                    error = %e,
                    "Copy failed"
                );
                MigrationOutcome::failure(source, FailureReason::CopyError)
            }
        }
    }
}

/// Destination for `source`, or `None` when a field sanitizes to nothing.
pub fn destination_for(source: &Path, meta: &TrackMetadata, output_root: &Path) -> Option<PathBuf> {
    let artist = sanitize(&meta.artist);
    let album = sanitize(&meta.album);
    let title = sanitize(&meta.title);
    if artist.is_empty() || album.is_empty() || title.is_empty() {
        return None;
    }

    let ext = metadata::extension_of(source);
    Some(resolve_destination(output_root, &artist, &album, &title, ext))
}

/// Copy `source` to a destination that must not exist yet.
///
/// The destination is created with `create_new`, so the existence check and
/// the copy are a single step; an existing file yields `AlreadyExists`. The
/// source is opened before anything is created, and directories created by
/// a call that then fails are removed again.
fn copy_new(source: &Path, destination: &Path) -> io::Result<()> {
    let mut input = File::open(source)?;

    let created = match destination.parent() {
        Some(parent) => create_parents(parent)?,
        None => Vec::new(),
    };

    let copied = write_new(&mut input, destination);
    if copied.is_err() {
        remove_empty_dirs(&created);
    }
    copied
}

/// Create `dir` and its missing ancestors, returning the ones that did not
/// exist before, deepest first.
fn create_parents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let missing: Vec<PathBuf> = dir
        .ancestors()
        .take_while(|d| !d.as_os_str().is_empty() && !d.exists())
        .map(Path::to_path_buf)
        .collect();

    if let Err(e) = fs::create_dir_all(dir) {
        remove_empty_dirs(&missing);
        return Err(not_duplicate(e));
    }
    Ok(missing)
}

fn write_new(input: &mut File, destination: &Path) -> io::Result<()> {
    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;

    let copied = io::copy(input, &mut output).and_then(|_| {
        let modified = input.metadata()?.modified()?;
        output.set_times(FileTimes::new().set_modified(modified))
    });

    if let Err(e) = copied {
        drop(output);
        // Never leave a partial file behind
        let _ = fs::remove_file(destination);
        return Err(not_duplicate(e));
    }

    Ok(())
}

/// Best effort; a directory something else wrote into stays.
fn remove_empty_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        let _ = fs::remove_dir(dir);
    }
}

/// Only the `create_new` open may report `AlreadyExists`; anything else
/// with that kind (e.g. a file where a directory should be) is a copy error.
fn not_duplicate(e: io::Error) -> io::Error {
    if e.kind() == ErrorKind::AlreadyExists {
        io::Error::other(e)
    } else {
        e
    }
}
