//! Markdown certification tracker.
//!
//! The tracker is a hand-maintained markdown document holding one
//! pipe table whose header has a `Certification` column. This module
//! turns that table into [`TrackerRow`]s and can stamp the document
//! after a scrape.

pub mod row;

use crate::models::{Status, TrackerRow};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, info, warn};

pub use row::parse_row;

/// Parse every data row of the tracker table.
///
/// Returns an empty vector when no header row is present. Malformed rows
/// are skipped; the table ends at the first blank or non-table line.
pub fn parse_tracker(markdown: &str) -> Vec<TrackerRow> {
    let mut lines = markdown.lines();

    if !lines.by_ref().any(row::is_header_row) {
        debug!("No tracker header row found");
        return Vec::new();
    }

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() || !line.trim_start().starts_with('|') {
            break;
        }
        if row::is_separator_row(line) {
            continue;
        }
        match parse_row(line) {
            Ok(parsed) => rows.push(parsed),
            Err(e) => debug!("Skipping tracker row ({}): {}", e, line.trim()),
        }
    }

    rows
}

/// Read and parse the tracker file.
///
/// An unreadable file or a missing table yields an empty vector; callers
/// treat that as "no data".
pub fn load_tracker(path: &Path) -> Vec<TrackerRow> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read tracker {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let rows = parse_tracker(&content);
    if rows.is_empty() {
        warn!("No certification rows found in {}", path.display());
    } else {
        info!("Loaded {} certifications from tracker", rows.len());
    }
    rows
}

/// Progress percentage for free-form status text.
///
/// Completed → 100, in progress → 50, anything else → 0.
#[allow(dead_code)] // Text-level entry point for callers without a Status
pub fn get_progress_from_status(status: &str) -> u8 {
    Status::from_text(status).progress_percent()
}

/// Insert a "study guide data updated" comment right after the tracker table.
///
/// Returns `None` when the document has no tracker table.
pub fn stamp_tracker(markdown: &str, at: NaiveDateTime) -> Option<String> {
    let mut lines: Vec<&str> = markdown.lines().collect();
    let header = lines.iter().position(|l| row::is_header_row(l))?;

    let table_end = lines
        .iter()
        .enumerate()
        .skip(header + 1)
        .find(|(_, l)| l.trim().is_empty() || !l.trim_start().starts_with('|'))
        .map(|(i, _)| i)
        .unwrap_or(lines.len());

    let comment = format!(
        "<!-- Study guide data updated: {} -->",
        at.format("%Y-%m-%d %H:%M")
    );
    lines.insert(table_end, comment.as_str());

    let mut out = lines.join("\n");
    if markdown.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const TRACKER: &str = include_str!("../../fixtures/certifications-tracker.md");

    #[test]
    fn test_parse_tracker_fixture() {
        let rows = parse_tracker(TRACKER);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].name, "Google Data Analytics Professional");
        assert_eq!(rows[1].name, "Microsoft Power BI Data Analyst Professional");
        assert_eq!(rows[3].name, "Python for Data Science");
        assert_eq!(rows[4].status, Status::Completed);
        assert_eq!(rows[5].platform, "dbt Labs");
        assert_eq!(rows[5].target_date.as_deref(), Some("November 2025"));
    }

    #[test]
    fn test_parse_tracker_stops_at_blank_line() {
        // The fixture has a second table after the tracker; none of its rows leak in.
        let rows = parse_tracker(TRACKER);
        assert!(rows.iter().all(|r| r.name != "x"));
    }

    #[test]
    fn test_parse_tracker_blank_line_ends_table_before_more_rows() {
        let md = "\
| Certification | Platform | Status | Target |
|---|---|---|---|
| A | P | Completed | May 2025 |

| B | P | Planned | June 2025 |
";
        let rows = parse_tracker(md);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_parse_tracker_empty_and_headerless() {
        assert!(parse_tracker("").is_empty());
        assert!(parse_tracker("| Name | Platform |\n|---|---|\n| a | b |\n").is_empty());
    }

    #[test]
    fn test_parse_tracker_skips_malformed_rows() {
        let md = "\
| Certification | Platform | Status | Target |
|---|---|---|---|
| Good One | Coursera | Planned | 2025-01-01 |
| Short | Row |
| Another | Udemy | Completed | 2024-06-01 |
";
        let rows = parse_tracker(md);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Another");
    }

    #[test]
    fn test_load_tracker_missing_file() {
        let rows = load_tracker(Path::new("/definitely/not/here/tracker.md"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_get_progress_from_status() {
        assert_eq!(get_progress_from_status("Completed"), 100);
        assert_eq!(get_progress_from_status("In Progress"), 50);
        assert_eq!(get_progress_from_status("Planned"), 0);
        assert_eq!(get_progress_from_status("Abandoned"), 0);
    }

    #[test]
    fn test_stamp_tracker() {
        let at = NaiveDate::from_ymd_opt(2025, 8, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let stamped = stamp_tracker(TRACKER, at).unwrap();

        let lines: Vec<&str> = stamped.lines().collect();
        let idx = lines
            .iter()
            .position(|l| *l == "<!-- Study guide data updated: 2025-08-14 09:30 -->")
            .unwrap();
        assert!(lines[idx - 1].contains("dbt Fundamentals"));
        assert_eq!(parse_tracker(&stamped).len(), 6);

        assert!(stamp_tracker("no table here", at).is_none());
    }
}
