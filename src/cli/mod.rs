//! Command-line interface for music-organizer.
//!
//! This module provides the commands that drive a migration from a
//! terminal, plus the console rendition of the display surface and the
//! folder picker used when no source folder is given.

mod commands;
mod console;
mod picker;

pub use commands::{Cli, Commands, run_command};
pub use console::ConsoleDisplay;
pub use picker::select_directory;
