//! Tracker reconciliation.
//!
//! Merges parsed tracker rows with scraped study guides into enriched
//! records, and reduces those records to a portfolio summary. Nothing
//! here touches the filesystem or network.

pub mod matcher;
pub mod roadmap;

use crate::models::{EnrichedRecord, PortfolioSummary, ScrapedGuide, TrackerRow};

pub use matcher::{GuideMatcher, KeywordMatcher, MatchRule};

/// Enrich tracker rows using the built-in matching rules.
#[allow(dead_code)] // Convenience wrapper, the binary passes configured rules
pub fn enrich(rows: &[TrackerRow], guides: &[ScrapedGuide]) -> Vec<EnrichedRecord> {
    enrich_with(rows, guides, &KeywordMatcher::default())
}

/// Enrich tracker rows, choosing each row's guide with `matcher`.
///
/// Output order follows `rows`; one record per row.
pub fn enrich_with(
    rows: &[TrackerRow],
    guides: &[ScrapedGuide],
    matcher: &dyn GuideMatcher,
) -> Vec<EnrichedRecord> {
    rows.iter()
        .map(|row| enrich_row(row, matcher.match_guide(&row.name, guides)))
        .collect()
}

fn enrich_row(row: &TrackerRow, guide: Option<&ScrapedGuide>) -> EnrichedRecord {
    EnrichedRecord {
        name: row.name.clone(),
        platform: row.platform.clone(),
        status: row.status.clone(),
        target_date: row.target_date.clone(),
        progress_percent: row.status.progress_percent(),
        skills_count: guide.map_or(0, |g| g.skills.len()),
        has_study_guide: guide.is_some(),
        study_guide_url: guide.map(|g| g.source_url.clone()),
    }
}

/// Aggregate counts over enriched records.
///
/// Status buckets use case-insensitive substring tests on the status
/// text, so a record can land in no bucket but still counts toward `total`.
pub fn summarize(records: &[EnrichedRecord]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        total: records.len(),
        ..PortfolioSummary::default()
    };

    for record in records {
        let status = record.status.to_string().to_lowercase();
        if status.contains("completed") {
            summary.completed += 1;
        }
        if status.contains("in progress") {
            summary.in_progress += 1;
        }
        if status.contains("planned") {
            summary.planned += 1;
        }
        if record.has_study_guide {
            summary.with_study_guides += 1;
        }
        summary.total_skills += record.skills_count;

        *summary
            .platforms
            .entry(record.platform.clone())
            .or_insert(0) += 1;
    }

    summary
}
