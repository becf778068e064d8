//! CSV writing for tabular outputs.

use crate::models::EnrichedRecord;
use crate::reconcile::roadmap::{ProgressEntry, SkillEntry};

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Append a single CSV row, newline included.
pub fn push_row<S: AsRef<str>>(out: &mut String, row: &[S]) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Header plus rows as one CSV document.
pub fn to_csv_string<H: AsRef<str>>(header: &[H], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_row(&mut out, header);
    for row in rows {
        push_row(&mut out, row.as_slice());
    }
    out
}

/// The enriched dataset as CSV, columns named after the record fields.
pub fn records_csv(records: &[EnrichedRecord]) -> String {
    let rows: Vec<Vec<String>> = records.iter().map(EnrichedRecord::to_row).collect();
    to_csv_string(&EnrichedRecord::FIELDS, &rows)
}

/// The skills breakdown as CSV.
pub fn skills_csv(skills: &[SkillEntry]) -> String {
    let rows: Vec<Vec<String>> = skills.iter().map(SkillEntry::to_row).collect();
    to_csv_string(&SkillEntry::FIELDS, &rows)
}

/// The per-skill learning progress sheet as CSV.
pub fn progress_csv(entries: &[ProgressEntry]) -> String {
    let rows: Vec<Vec<String>> = entries.iter().map(ProgressEntry::to_row).collect();
    to_csv_string(&ProgressEntry::FIELDS, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[test]
    fn test_push_row_quotes_when_needed() {
        let mut out = String::new();
        push_row(&mut out, &["plain", "a,b", "say \"hi\"", "line\nbreak"]);
        assert_eq!(out, "plain,\"a,b\",\"say \"\"hi\"\"\",\"line\nbreak\"\n");
    }

    #[test]
    fn test_records_csv() {
        let records = vec![EnrichedRecord {
            name: "Microsoft Power BI Data Analyst Professional".to_string(),
            platform: "Coursera".to_string(),
            status: Status::InProgress,
            target_date: Some("October 2025".to_string()),
            progress_percent: 50,
            skills_count: 4,
            has_study_guide: true,
            study_guide_url: Some("https://learn.microsoft.com/pl-300".to_string()),
        }];

        let csv = records_csv(&records);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,platform,status,target_date,progress_percent,skills_count,has_study_guide,study_guide_url")
        );
        assert_eq!(
            lines.next(),
            Some("Microsoft Power BI Data Analyst Professional,Coursera,In Progress,October 2025,50,4,true,https://learn.microsoft.com/pl-300")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_progress_csv() {
        let entries = vec![ProgressEntry {
            certification: "Microsoft Power BI Data Analyst (PL-300)".to_string(),
            skill: "Model the data (25–30%)".to_string(),
            status: "Not Started".to_string(),
            progress_percent: 0,
            last_updated: "2025-08-14T09:30:12".to_string(),
            notes: String::new(),
        }];

        let csv = progress_csv(&entries);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("certification,skill,status,progress_percent,last_updated,notes")
        );
        assert_eq!(
            lines.next(),
            Some("Microsoft Power BI Data Analyst (PL-300),Model the data (25–30%),Not Started,0,2025-08-14T09:30:12,")
        );
    }
}
