//! Test utilities and fakes for music-organizer tests.
//!
//! Real tagged audio files are awkward to produce in a test, so the
//! pipeline is exercised through [`FakeTagReader`], which hands out tags by
//! file name. [`RecordingDisplay`] captures everything a session shows.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{FakeTagReader, raw_tags};
//!
//! let reader = FakeTagReader::new().with("song.mp3", raw_tags("Artist", "Album", "Title"));
//! let migrator = Migrator::new(reader, SupportedFormats::default());
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::metadata::{RawTags, TagError, TagReader};
use crate::session::DisplaySurface;

/// Tags with only the track artist set.
pub fn raw_tags(artist: &str, album: &str, title: &str) -> RawTags {
    RawTags {
        album_artist: None,
        artist: Some(artist.to_string()),
        album: Some(album.to_string()),
        title: Some(title.to_string()),
    }
}

/// [`TagReader`] that serves tags by file name.
///
/// Files without an entry behave like files with no readable tags.
#[derive(Debug, Default)]
pub struct FakeTagReader {
    tags: HashMap<String, RawTags>,
    reads: AtomicUsize,
    delay: Duration,
}

impl FakeTagReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, tags: RawTags) -> Self {
        self.tags.insert(file_name.to_string(), tags);
        self
    }

    /// Sleep this long on every read, to simulate slow media.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How many times any file was read.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TagReader for FakeTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, TagError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| self.tags.get(n))
            .cloned()
            .ok_or_else(|| TagError::UnreadableTags("no tag container".to_string()))
    }
}

/// One call made on a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Line(String),
    Reset,
    Status(String),
    Busy(bool),
    Error(String),
}

/// [`DisplaySurface`] that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl RecordingDisplay {
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Appended lines only.
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DisplayEvent::Line(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DisplayEvent::Error(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: DisplayEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl DisplaySurface for RecordingDisplay {
    fn append_line(&self, text: &str) {
        self.push(DisplayEvent::Line(text.to_string()));
    }

    fn reset(&self) {
        self.push(DisplayEvent::Reset);
    }

    fn set_status_text(&self, text: &str) {
        self.push(DisplayEvent::Status(text.to_string()));
    }

    fn set_busy(&self, busy: bool) {
        self.push(DisplayEvent::Busy(busy));
    }

    fn show_error(&self, text: &str) {
        self.push(DisplayEvent::Error(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_reader_serves_by_file_name() {
        let reader = FakeTagReader::new().with("a.mp3", raw_tags("A", "B", "C"));

        let tags = reader.read_tags(Path::new("/anywhere/a.mp3")).unwrap();
        assert_eq!(tags.artist.as_deref(), Some("A"));
        assert!(reader.read_tags(Path::new("/anywhere/b.mp3")).is_err());
        assert_eq!(reader.read_count(), 2);
    }

    #[test]
    fn test_recording_display_keeps_order() {
        let display = RecordingDisplay::default();
        display.reset();
        display.append_line("one");
        display.set_busy(true);
        display.append_line("two");

        assert_eq!(display.lines(), vec!["one", "two"]);
        assert_eq!(display.events()[0], DisplayEvent::Reset);
    }
}
