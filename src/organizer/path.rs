//! Destination path construction.
//!
//! Tag values end up as directory and file names, so everything that could
//! break a path component is stripped first.

use std::path::{Path, PathBuf};

/// Folder created under the output root to hold all migrated files.
pub const OUTPUT_FOLDER: &str = "MusicOrganizerOutput";

/// Characters removed from tag values before they become path components.
pub const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '\\', '/', '|', '?', '*', '.'];

/// Makes a tag value safe to use as a single path component.
///
/// Double quotes become single quotes and every [`FORBIDDEN_CHARS`]
/// character is dropped. Whitespace and length are left alone. The result
/// may be empty; callers decide what that means.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}

/// `<output_root>/MusicOrganizerOutput/<artist>/<album>/<title>.<ext>`
///
/// Inputs are expected to be sanitized already.
pub fn resolve_destination(
    output_root: &Path,
    artist: &str,
    album: &str,
    title: &str,
    extension: &str,
) -> PathBuf {
    output_root
        .join(OUTPUT_FOLDER)
        .join(artist)
        .join(album)
        .join(format!("{title}.{extension}"))
}

/// The folder all destinations of a run live under.
pub fn output_folder(output_root: &Path) -> PathBuf {
    output_root.join(OUTPUT_FOLDER)
}
