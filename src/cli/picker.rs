//! Native folder selection.

use std::path::PathBuf;

use crate::session::DirectorySelection;

/// Ask the user for a source folder with the platform's folder dialog.
pub fn select_directory() -> DirectorySelection {
    let picked = rfd::FileDialog::new()
        .set_title("Select a music folder to organize")
        .pick_folder();
    classify(picked)
}

/// Map a dialog result onto the selection contract: nothing picked means
/// cancelled, anything that is not an absolute directory is invalid.
fn classify(picked: Option<PathBuf>) -> DirectorySelection {
    match picked {
        None => DirectorySelection::Cancelled,
        Some(path) if path.is_absolute() && path.is_dir() => DirectorySelection::Selected(path),
        Some(path) => {
            tracing::warn!(path = %path.display(), "Folder dialog returned an unusable path");
            DirectorySelection::Invalid
        }
    }
}
