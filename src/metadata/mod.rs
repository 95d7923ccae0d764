//! Audio file tag reading.
//!
//! Uses the lofty crate for format-independent tag access. The actual
//! reading sits behind the [`TagReader`] trait so the migration pipeline can
//! be driven by a fake reader in tests; the extraction policy (supported
//! formats, artist precedence, completeness) lives in [`read`] and applies to
//! every reader.

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey};
use std::path::Path;

use crate::organizer::sanitize;

/// Extensions accepted when nothing else is configured.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["mp3", "m4a", "m4p"];

/// Artist, album and title of a track, as read from its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: String,
    pub album: String,
    pub title: String,
}

/// Tag fields exactly as the tag container holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub album_artist: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

/// Why tags could not be turned into [`TrackMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// Extension is not in the supported set
    #[error("unsupported format: {0:?}")]
    UnsupportedFormat(String),

    /// The tag library failed, or the file has no tag container
    #[error("unreadable tags: {0}")]
    UnreadableTags(String),

    /// Artist, album or title is missing
    #[error("incomplete tags")]
    IncompleteTags,
}

/// Source of raw tag fields for a file.
pub trait TagReader: Send + Sync {
    /// Read the tag container of `path`.
    ///
    /// Returns [`TagError::UnreadableTags`] when the file cannot be parsed or
    /// carries no tags at all.
    fn read_tags(&self, path: &Path) -> Result<RawTags, TagError>;
}

/// The set of file extensions eligible for migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedFormats {
    extensions: Vec<String>,
}

impl SupportedFormats {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extensions.iter().any(|e| *e == extension)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for SupportedFormats {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// Extension of `path` as written on disk, or an empty string.
pub fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Read and validate the metadata of `path`.
///
/// Unsupported extensions are rejected before the reader is touched. The
/// album-artist field wins over the track-artist field; the track artist is
/// only used when the album artist is empty once sanitized, so multi-artist
/// albums stay in one folder. Fields are returned verbatim, without
/// sanitization.
pub fn read<R: TagReader + ?Sized>(
    reader: &R,
    path: &Path,
    formats: &SupportedFormats,
) -> Result<TrackMetadata, TagError> {
    let ext = extension_of(path);
    if !formats.contains(ext) {
        return Err(TagError::UnsupportedFormat(ext.to_string()));
    }

    let raw = reader.read_tags(path)?;

    let artist = raw
        .album_artist
        .filter(|a| !sanitize(a).is_empty())
        .or_else(|| non_empty(raw.artist));
    match (artist, non_empty(raw.album), non_empty(raw.title)) {
        (Some(artist), Some(album), Some(title)) => Ok(TrackMetadata {
            artist,
            album,
            title,
        }),
        _ => Err(TagError::IncompleteTags),
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// [`TagReader`] backed by lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, TagError> {
        // Sniff the content so a mislabelled container is still read
        let tagged_file = Probe::open(path)
            .map_err(|e| TagError::UnreadableTags(e.to_string()))?
            .guess_file_type()
            .map_err(|e| TagError::UnreadableTags(e.to_string()))?
            .read()
            .map_err(|e| TagError::UnreadableTags(e.to_string()))?;

        // Get the primary tag, or fall back to the first available tag
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or_else(|| TagError::UnreadableTags("no tag container".to_string()))?;

        Ok(RawTags {
            album_artist: tag.get_string(&ItemKey::AlbumArtist).map(str::to_string),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            title: tag.title().map(|s| s.to_string()),
        })
    }
}
