//! Skills breakdown and learning roadmap.
//!
//! Both are derived views: the breakdown flattens every scraped skill
//! into a row with a keyword category and priority, and the roadmap
//! attaches study-hour estimates and a per-quarter plan to the enriched
//! records.

use crate::models::{parse_target_date, EnrichedRecord, ScrapedGuide};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One scraped skill, categorised for study planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub certification: String,
    pub certification_code: String,
    pub skill: String,
    pub skill_category: String,
    pub priority: Priority,
    pub current_level: String,
    pub target_level: String,
}

impl SkillEntry {
    pub const FIELDS: [&'static str; 7] = [
        "certification",
        "certification_code",
        "skill",
        "skill_category",
        "priority",
        "current_level",
        "target_level",
    ];

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.certification.clone(),
            self.certification_code.clone(),
            self.skill.clone(),
            self.skill_category.clone(),
            self.priority.to_string(),
            self.current_level.clone(),
            self.target_level.clone(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    ("Data Management", &["data", "dataset", "source", "warehouse"]),
    ("Visualization", &["visual", "chart", "dashboard", "report"]),
    ("Data Modeling", &["model", "relationship", "dax", "measure"]),
    ("Analysis", &["analysis", "analytics", "insight"]),
    ("Security", &["security", "permission", "access"]),
];

/// Keyword category for a skill; first matching category wins.
pub fn categorize_skill(skill: &str) -> &'static str {
    let lower = skill.to_lowercase();
    SKILL_CATEGORIES
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or("General")
}

/// Study priority of a skill for analytics work.
pub fn assess_skill_priority(skill: &str) -> Priority {
    let lower = skill.to_lowercase();

    if contains_any(&lower, &["dashboard", "visual", "data", "analysis", "report"]) {
        Priority::High
    } else if contains_any(&lower, &["model", "security", "performance"]) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Flatten every guide's skills into breakdown rows.
pub fn skills_breakdown(guides: &[ScrapedGuide]) -> Vec<SkillEntry> {
    guides
        .iter()
        .flat_map(|guide| {
            guide.skills.iter().map(move |skill| SkillEntry {
                certification: guide.certification_title.clone(),
                certification_code: guide.source_key.clone(),
                skill: skill.clone(),
                skill_category: categorize_skill(skill).to_string(),
                priority: assess_skill_priority(skill),
                current_level: "Beginner".to_string(),
                target_level: "Intermediate".to_string(),
            })
        })
        .collect()
}

/// One row of the learning progress sheet, seeded per scraped skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub certification: String,
    pub skill: String,
    pub status: String,
    pub progress_percent: u8,
    pub last_updated: String,
    pub notes: String,
}

impl ProgressEntry {
    pub const FIELDS: [&'static str; 6] = [
        "certification",
        "skill",
        "status",
        "progress_percent",
        "last_updated",
        "notes",
    ];

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.certification.clone(),
            self.skill.clone(),
            self.status.clone(),
            self.progress_percent.to_string(),
            self.last_updated.clone(),
            self.notes.clone(),
        ]
    }
}

/// A "Not Started" progress row for every skill of every guide.
pub fn learning_progress(guides: &[ScrapedGuide], last_updated: &str) -> Vec<ProgressEntry> {
    guides
        .iter()
        .flat_map(|guide| {
            guide.skills.iter().map(move |skill| ProgressEntry {
                certification: guide.certification_title.clone(),
                skill: skill.clone(),
                status: "Not Started".to_string(),
                progress_percent: 0,
                last_updated: last_updated.to_string(),
                notes: String::new(),
            })
        })
        .collect()
}

const STUDY_HOURS: &[(&str, u32)] = &[
    ("google data analytics", 120),
    ("microsoft power bi", 80),
    ("azure data engineer", 100),
    ("python for data science", 60),
    ("tableau desktop", 40),
    ("dbt fundamentals", 30),
];

const DEFAULT_STUDY_HOURS: u32 = 50;

/// Estimated study hours for a certification, by name keyword.
pub fn estimate_study_hours(cert_name: &str) -> u32 {
    let lower = cert_name.to_lowercase();
    STUDY_HOURS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, hours)| *hours)
        .unwrap_or(DEFAULT_STUDY_HOURS)
}

/// Career priority of a certification.
pub fn assess_certification_priority(cert_name: &str) -> Priority {
    let lower = cert_name.to_lowercase();
    if lower.contains("power bi") || lower.contains("tableau") {
        Priority::High
    } else if lower.contains("azure") || lower.contains("google") {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// One certification in the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapEntry {
    pub name: String,
    pub platform: String,
    pub status: String,
    pub target_date: Option<String>,
    pub skills_count: usize,
    pub estimated_hours: u32,
    pub priority: Priority,
}

/// Certifications due in one calendar quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterPlan {
    pub certifications: Vec<String>,
    pub total_skills: usize,
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningRoadmap {
    pub generated_date: String,
    pub total_certifications: usize,
    pub total_skills: usize,
    pub certifications: Vec<RoadmapEntry>,
    /// Keyed `YYYYQn`; records without a parseable target date are left out.
    pub quarterly_plan: BTreeMap<String, QuarterPlan>,
}

/// Build the roadmap. `total_skills` is the size of the skills breakdown.
pub fn build_roadmap(
    records: &[EnrichedRecord],
    total_skills: usize,
    generated_date: String,
) -> LearningRoadmap {
    let certifications = records
        .iter()
        .map(|r| RoadmapEntry {
            name: r.name.clone(),
            platform: r.platform.clone(),
            status: r.status.to_string(),
            target_date: r
                .target_date
                .as_deref()
                .and_then(parse_target_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .or_else(|| r.target_date.clone()),
            skills_count: r.skills_count,
            estimated_hours: estimate_study_hours(&r.name),
            priority: assess_certification_priority(&r.name),
        })
        .collect();

    LearningRoadmap {
        generated_date,
        total_certifications: records.len(),
        total_skills,
        certifications,
        quarterly_plan: quarterly_plan(records),
    }
}

fn quarter_key(record: &EnrichedRecord) -> Option<String> {
    let date = parse_target_date(record.target_date.as_deref()?)?;
    Some(format!("{}Q{}", date.year(), (date.month() - 1) / 3 + 1))
}

fn quarterly_plan(records: &[EnrichedRecord]) -> BTreeMap<String, QuarterPlan> {
    let mut grouped: BTreeMap<String, Vec<&EnrichedRecord>> = BTreeMap::new();
    for record in records {
        if let Some(key) = quarter_key(record) {
            grouped.entry(key).or_default().push(record);
        }
    }

    grouped
        .into_iter()
        .map(|(quarter, group)| {
            let plan = QuarterPlan {
                certifications: group.iter().map(|r| r.name.clone()).collect(),
                total_skills: group.iter().map(|r| r.skills_count).sum(),
                focus_areas: focus_areas(&group),
            };
            (quarter, plan)
        })
        .collect()
}

fn focus_areas(group: &[&EnrichedRecord]) -> Vec<String> {
    [
        ("Coursera", "Online Learning"),
        ("Microsoft Learn", "Microsoft Technologies"),
        ("Tableau", "Data Visualization"),
    ]
    .iter()
    .filter(|(platform, _)| group.iter().any(|r| r.platform == *platform))
    .map(|(_, area)| area.to_string())
    .collect()
}
