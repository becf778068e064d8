//! Markdown and JSON report generation.
//!
//! This module renders the portfolio dataset as a Markdown report and
//! serializes the JSON documents consumed by the charting scripts.

use crate::models::{parse_target_date, EnrichedRecord, PortfolioDataset, PortfolioSummary, Status};
use crate::reconcile::roadmap::LearningRoadmap;
use anyhow::Result;
use chrono::NaiveDate;

/// Where the report's data came from.
#[derive(Debug, Clone)]
pub struct ReportSource {
    /// Tracker file the rows were parsed from.
    pub tracker: String,
    /// Number of study guides available for matching.
    pub guides_loaded: usize,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    dataset: &PortfolioDataset,
    roadmap: Option<&LearningRoadmap>,
    source: &ReportSource,
) -> String {
    let mut output = String::new();

    output.push_str("# Certification Portfolio Report\n\n");
    output.push_str(&generate_metadata_section(dataset, source));
    output.push_str(&generate_table_of_contents(roadmap));
    output.push_str(&generate_summary_section(
        &dataset.summary,
        &dataset.certifications,
    ));
    output.push_str(&generate_certifications_section(&dataset.certifications));
    if let Some(roadmap) = roadmap {
        output.push_str(&generate_roadmap_section(roadmap));
    }
    output.push_str(&generate_footer());

    output
}

fn status_emoji(status: &Status) -> &'static str {
    match status {
        Status::Completed => "✅",
        Status::InProgress => "🔄",
        Status::Planned => "📅",
        Status::Other(_) => "❔",
    }
}

/// Generate the metadata section.
fn generate_metadata_section(dataset: &PortfolioDataset, source: &ReportSource) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Generated:** {}\n", dataset.generated_date));
    section.push_str(&format!("- **Tracker:** `{}`\n", source.tracker));
    section.push_str(&format!(
        "- **Certifications:** {}\n",
        dataset.certifications.len()
    ));
    section.push_str(&format!(
        "- **Study Guides Loaded:** {}\n",
        source.guides_loaded
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(roadmap: Option<&LearningRoadmap>) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Summary](#summary)\n");
    toc.push_str("- [Certifications](#certifications)\n");
    if roadmap.is_some() {
        toc.push_str("- [Quarterly Plan](#quarterly-plan)\n");
    }
    toc.push('\n');

    toc
}

/// Share of `total`, in percent; zero for an empty portfolio.
fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

/// Mean progress over all records; zero when there are none.
fn average_progress(records: &[EnrichedRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: u32 = records.iter().map(|r| u32::from(r.progress_percent)).sum();
    f64::from(sum) / records.len() as f64
}

/// Earliest parseable target date among certifications not yet completed.
fn next_target(records: &[EnrichedRecord]) -> Option<NaiveDate> {
    records
        .iter()
        .filter(|r| r.status != Status::Completed)
        .filter_map(|r| parse_target_date(r.target_date.as_deref()?))
        .min()
}

/// Generate the summary section.
fn generate_summary_section(summary: &PortfolioSummary, records: &[EnrichedRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    section.push_str("### Status Breakdown\n\n");
    section.push_str(&format!(
        "| {} Completed | {} In Progress | {} Planned | **Total** |\n",
        status_emoji(&Status::Completed),
        status_emoji(&Status::InProgress),
        status_emoji(&Status::Planned),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} ({:.1}%) | {} ({:.1}%) | {} ({:.1}%) | **{}** |\n\n",
        summary.completed,
        percent_of(summary.completed, summary.total),
        summary.in_progress,
        percent_of(summary.in_progress, summary.total),
        summary.planned,
        percent_of(summary.planned, summary.total),
        summary.total
    ));

    section.push_str(&format!(
        "- **Average Progress:** {:.1}%\n",
        average_progress(records)
    ));
    section.push_str(&format!(
        "- **Next Target:** {}\n\n",
        next_target(records).map_or_else(|| "N/A".to_string(), |d| d.format("%B %Y").to_string())
    ));

    section.push_str("### Study Guide Coverage\n\n");
    section.push_str(&format!(
        "- With study guides: {}\n- Without study guides: {}\n- Skills tracked: {}\n\n",
        summary.with_study_guides,
        summary.total.saturating_sub(summary.with_study_guides),
        summary.total_skills
    ));

    if !summary.platforms.is_empty() {
        section.push_str("### Learning Platforms\n\n");
        section.push_str("| Platform | Certifications |\n");
        section.push_str("|:---|:---:|\n");

        let mut platforms: Vec<_> = summary.platforms.iter().collect();
        platforms.sort_by_key(|(_, count)| std::cmp::Reverse(**count));

        for (platform, count) in platforms {
            section.push_str(&format!("| {} | {} |\n", platform, count));
        }
        section.push('\n');
    }

    section
}

/// Generate the per-certification table.
fn generate_certifications_section(records: &[EnrichedRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Certifications\n\n");

    if records.is_empty() {
        section.push_str("No certifications were found in the tracker.\n\n");
        return section;
    }

    section.push_str("| Certification | Platform | Status | Target | Progress | Skills | Study Guide |\n");
    section.push_str("|:---|:---|:---|:---|:---:|:---:|:---:|\n");

    for record in records {
        let guide = match record.study_guide_url.as_deref() {
            Some(url) if !url.is_empty() => format!("[link]({})", url),
            Some(_) => "yes".to_string(),
            None => "-".to_string(),
        };
        section.push_str(&format!(
            "| {} | {} | {} {} | {} | {}% | {} | {} |\n",
            escape_cell(&record.name),
            escape_cell(&record.platform),
            status_emoji(&record.status),
            escape_cell(&record.status.to_string()),
            record.target_date.as_deref().unwrap_or("-"),
            record.progress_percent,
            record.skills_count,
            guide
        ));
    }
    section.push('\n');

    section
}

/// Generate the quarterly plan section.
fn generate_roadmap_section(roadmap: &LearningRoadmap) -> String {
    let mut section = String::new();

    section.push_str("## Quarterly Plan\n\n");

    if roadmap.quarterly_plan.is_empty() {
        section.push_str("No certification has a recognisable target date.\n\n");
        return section;
    }

    for (quarter, plan) in &roadmap.quarterly_plan {
        section.push_str(&format!("### {}\n\n", quarter));
        for name in &plan.certifications {
            section.push_str(&format!("- {}\n", name));
        }
        if plan.total_skills > 0 {
            section.push_str(&format!("\n*Skills to cover: {}*\n", plan.total_skills));
        }
        if !plan.focus_areas.is_empty() {
            section.push_str(&format!("\n*Focus: {}*\n", plan.focus_areas.join(", ")));
        }
        section.push('\n');
    }

    section
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by certfolio*\n".to_string()
}

/// Serialize the portfolio dataset document.
pub fn generate_dataset_json(dataset: &PortfolioDataset) -> Result<String> {
    serde_json::to_string_pretty(dataset).map_err(Into::into)
}

/// Serialize the learning roadmap document.
pub fn generate_roadmap_json(roadmap: &LearningRoadmap) -> Result<String> {
    serde_json::to_string_pretty(roadmap).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::roadmap::build_roadmap;
    use crate::reconcile::summarize;

    fn create_test_dataset() -> PortfolioDataset {
        let records = vec![
            EnrichedRecord {
                name: "Microsoft Power BI Data Analyst Professional".to_string(),
                platform: "Coursera".to_string(),
                status: Status::InProgress,
                target_date: Some("October 2025".to_string()),
                progress_percent: 50,
                skills_count: 4,
                has_study_guide: true,
                study_guide_url: Some("https://learn.microsoft.com/pl-300".to_string()),
            },
            EnrichedRecord {
                name: "Tableau Desktop Specialist".to_string(),
                platform: "Tableau".to_string(),
                status: Status::Completed,
                target_date: Some("January 2021".to_string()),
                progress_percent: 100,
                skills_count: 0,
                has_study_guide: false,
                study_guide_url: None,
            },
        ];
        let summary = summarize(&records);
        PortfolioDataset::new(records, summary, "2025-08-14 09:30".to_string())
    }

    fn source() -> ReportSource {
        ReportSource {
            tracker: "docs/certifications-tracker.md".to_string(),
            guides_loaded: 1,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let dataset = create_test_dataset();
        let roadmap = build_roadmap(&dataset.certifications, 4, dataset.generated_date.clone());
        let markdown = generate_markdown_report(&dataset, Some(&roadmap), &source());

        assert!(markdown.contains("# Certification Portfolio Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("| 1 (50.0%) | 1 (50.0%) | 0 (0.0%) | **2** |"));
        assert!(markdown.contains("[link](https://learn.microsoft.com/pl-300)"));
        assert!(markdown.contains("### 2025Q4"));
        assert!(markdown.contains("### 2021Q1"));
    }

    #[test]
    fn test_markdown_report_without_roadmap() {
        let dataset = create_test_dataset();
        let markdown = generate_markdown_report(&dataset, None, &source());
        assert!(!markdown.contains("Quarterly Plan"));
    }

    #[test]
    fn test_summary_figures_for_tracker_fixture() {
        let rows = crate::tracker::parse_tracker(include_str!(
            "../../fixtures/certifications-tracker.md"
        ));
        let records = crate::reconcile::enrich(&rows, &[]);
        let summary = summarize(&records);
        let section = generate_summary_section(&summary, &records);

        assert!(section.contains("| 1 (16.7%) | 2 (33.3%) | 3 (50.0%) | **6** |"));
        assert!(section.contains("- **Average Progress:** 33.3%"));
        // Tableau (January 2021) is completed, so it is not the next target.
        assert!(section.contains("- **Next Target:** March 2025"));
    }

    #[test]
    fn test_summary_figures_for_empty_portfolio() {
        let section = generate_summary_section(&PortfolioSummary::default(), &[]);
        assert!(section.contains("| 0 (0.0%) | 0 (0.0%) | 0 (0.0%) | **0** |"));
        assert!(section.contains("- **Average Progress:** 0.0%"));
        assert!(section.contains("- **Next Target:** N/A"));
    }

    #[test]
    fn test_status_cell_is_escaped() {
        let mut dataset = create_test_dataset();
        dataset.certifications[1].status = Status::Other("Paused | waiting".to_string());
        let section = generate_certifications_section(&dataset.certifications);
        assert!(section.contains("❔ Paused \\| waiting |"));
    }

    #[test]
    fn test_certifications_section_empty() {
        let section = generate_certifications_section(&[]);
        assert!(section.contains("No certifications were found"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("A | B"), "A \\| B");
    }

    #[test]
    fn test_dataset_json_round_trip() {
        let dataset = create_test_dataset();
        let json = generate_dataset_json(&dataset).unwrap();

        assert!(json.contains("\"certifications\""));
        assert!(json.contains("\"generated_date\": \"2025-08-14 09:30\""));
        assert!(json.contains("\"status\": \"In Progress\""));

        let back = PortfolioDataset::from_json(&json).unwrap();
        assert_eq!(back, dataset);
        assert_eq!(back.summary.platforms.get("Tableau"), Some(&1));
    }
}
