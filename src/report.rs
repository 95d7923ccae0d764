//! Human-readable run summary.

use std::path::Path;

use crate::organizer::output_folder;
use crate::scanner::RunCounters;

/// Summary lines for a finished run, in display order: header, destination
/// folder, totals, successes, errors, then every failure in visitation order.
pub fn format_report(counters: &RunCounters, failures: &[String], output_root: &Path) -> Vec<String> {
    let mut lines = Vec::with_capacity(5 + failures.len());
    lines.push("Traversal results:".to_string());
    lines.push(format!(
        "Destination folder: {}",
        output_folder(output_root).display()
    ));
    lines.push(format!(
        "{} total files traversed ({} visible, and {} hidden files)",
        counters.total(),
        counters.visible_files,
        counters.hidden_files
    ));
    lines.push(format!("{} files successfully migrated", counters.succeeded));
    lines.push(format!("{} errors.", counters.failed));
    lines.extend(failures.iter().cloned());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report_lines() {
        let counters = RunCounters {
            visible_files: 3,
            hidden_files: 2,
            succeeded: 1,
            failed: 2,
        };
        let failures = vec![
            "Error: /in/a.txt not a valid music file.".to_string(),
            "Error: /in/b.mp3 does not have valid tags for migration.".to_string(),
        ];

        let lines = format_report(&counters, &failures, Path::new("/out"));

        assert_eq!(
            lines,
            vec![
                "Traversal results:",
                "Destination folder: /out/MusicOrganizerOutput",
                "5 total files traversed (3 visible, and 2 hidden files)",
                "1 files successfully migrated",
                "2 errors.",
                "Error: /in/a.txt not a valid music file.",
                "Error: /in/b.mp3 does not have valid tags for migration.",
            ]
        );
    }

    #[test]
    fn test_format_report_empty_run() {
        let lines = format_report(&RunCounters::default(), &[], Path::new("/out"));
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "0 total files traversed (0 visible, and 0 hidden files)");
        assert_eq!(lines[4], "0 errors.");
    }
}
