//! Music Organizer - copies a music folder into a tidy layout.
//!
//! Every visible file under a source folder is read for its artist, album
//! and title tags and copied to
//! `<output_root>/MusicOrganizerOutput/<artist>/<album>/<title>.<ext>`.
//! Files that cannot be migrated are reported, never overwritten or lost.
//!
//! The library entry point is [`session::run_migration`]; user interfaces
//! drive [`session::Organizer`] through a [`session::DisplaySurface`].

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod organizer;
pub mod report;
pub mod scanner;
pub mod session;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
pub use session::run_migration;
