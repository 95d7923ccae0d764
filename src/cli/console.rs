//! Terminal display surface.

use crate::session::DisplaySurface;

/// Prints report lines to stdout and status/errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    /// Rewrite the status line in place instead of printing one per update
    pub inline_status: bool,
}

impl ConsoleDisplay {
    pub fn new(inline_status: bool) -> Self {
        Self { inline_status }
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn append_line(&self, text: &str) {
        println!("{text}");
    }

    fn reset(&self) {}

    fn set_status_text(&self, text: &str) {
        if self.inline_status {
            eprint!("\r{text}");
        } else {
            eprintln!("{text}");
        }
    }

    fn set_busy(&self, busy: bool) {
        tracing::debug!(busy, "Display busy state changed");
        if !busy && self.inline_status {
            eprintln!();
        }
    }

    fn show_error(&self, text: &str) {
        eprintln!("Error: {text}");
    }
}
