//! Data models for the certification portfolio.
//!
//! This module contains the core data structures shared by the tracker
//! parser, the guide store, the reconciler and the output writers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Progress status of a tracked certification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Completed,
    InProgress,
    Planned,
    /// Any status text the tracker uses that is not one of the above.
    Other(String),
}

impl Status {
    /// Classify free-form status text.
    ///
    /// Matching is a case-insensitive substring test, so
    /// `"✅ Completed"` is still [`Status::Completed`].
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("completed") {
            Status::Completed
        } else if lower.contains("in progress") {
            Status::InProgress
        } else if lower.contains("planned") {
            Status::Planned
        } else {
            Status::Other(text.trim().to_string())
        }
    }

    /// Estimated completion percentage for this status.
    ///
    /// Fixed lookup, not a measured value.
    pub fn progress_percent(&self) -> u8 {
        match self {
            Status::Completed => 100,
            Status::InProgress => 50,
            Status::Planned | Status::Other(_) => 0,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Completed => write!(f, "Completed"),
            Status::InProgress => write!(f, "In Progress"),
            Status::Planned => write!(f, "Planned"),
            Status::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from_text(&s)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.to_string()
    }
}

/// One row of the markdown tracker table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerRow {
    /// Certification name (link text when the cell is a markdown link).
    pub name: String,
    /// Learning platform, e.g. "Coursera".
    pub platform: String,
    /// Current status.
    pub status: Status,
    /// Target completion, verbatim from the tracker (`None` when blank).
    pub target_date: Option<String>,
}

/// Parse the date formats that appear in the tracker's target column.
///
/// Accepts `2025-10-01`, `October 2025` and `Oct 2025`; month-only
/// forms resolve to the first of the month.
pub fn parse_target_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    let with_day = format!("1 {}", text);
    ["%d %B %Y", "%d %b %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_day, fmt).ok())
}

/// A study resource link listed in a study guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyResource {
    pub text: String,
    #[serde(default)]
    pub url: String,
}

/// A study guide scraped from a public certification page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedGuide {
    /// Short code the guide is stored under, e.g. "pl300".
    pub source_key: String,
    /// Certification title as published on the page.
    pub certification_title: String,
    /// Page the guide was scraped from.
    pub source_url: String,
    /// When the page was scraped (ISO-8601 text).
    pub scraped_date: String,
    /// Skills measured, in page order.
    pub skills: Vec<String>,
    /// Study resources, in page order.
    pub resources: Vec<StudyResource>,
    /// Exam facts such as duration, question count, passing score.
    pub exam_details: BTreeMap<String, String>,
}

/// A tracker row merged with whatever its matched study guide contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub name: String,
    pub platform: String,
    pub status: Status,
    pub target_date: Option<String>,
    pub progress_percent: u8,
    pub skills_count: usize,
    pub has_study_guide: bool,
    pub study_guide_url: Option<String>,
}

impl EnrichedRecord {
    /// Column names, in the order used by tabular output.
    pub const FIELDS: [&'static str; 8] = [
        "name",
        "platform",
        "status",
        "target_date",
        "progress_percent",
        "skills_count",
        "has_study_guide",
        "study_guide_url",
    ];

    /// Cell values matching [`EnrichedRecord::FIELDS`].
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.platform.clone(),
            self.status.to_string(),
            self.target_date.clone().unwrap_or_default(),
            self.progress_percent.to_string(),
            self.skills_count.to_string(),
            self.has_study_guide.to_string(),
            self.study_guide_url.clone().unwrap_or_default(),
        ]
    }
}

/// Aggregate view over a set of enriched records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub planned: usize,
    pub with_study_guides: usize,
    pub total_skills: usize,
    /// Certifications per platform. Emitted at the top level of the
    /// dataset document rather than inside the summary object.
    #[serde(skip)]
    pub platforms: BTreeMap<String, usize>,
}

/// The document consumed by the charting scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioDataset {
    pub certifications: Vec<EnrichedRecord>,
    pub summary: PortfolioSummary,
    pub platforms: BTreeMap<String, usize>,
    pub generated_date: String,
}

impl PortfolioDataset {
    /// Assemble the dataset from records and their summary.
    pub fn new(
        certifications: Vec<EnrichedRecord>,
        summary: PortfolioSummary,
        generated_date: String,
    ) -> Self {
        let platforms = summary.platforms.clone();
        Self {
            certifications,
            summary,
            platforms,
            generated_date,
        }
    }

    /// Parse a dataset document, restoring the summary's platform table.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut dataset: PortfolioDataset = serde_json::from_str(json)?;
        dataset.summary.platforms = dataset.platforms.clone();
        Ok(dataset)
    }
}
