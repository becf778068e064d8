//! Output generation.
//!
//! Everything the reconciler produces lands in one output directory:
//! the JSON dataset and CSV are always written. The Markdown report,
//! skills breakdown, roadmap and learning progress sheet follow the
//! `[report]` toggles.

pub mod csv;
pub mod generator;

pub use generator::{generate_dataset_json, generate_markdown_report, ReportSource};

use crate::config::ReportConfig;
use crate::models::PortfolioDataset;
use crate::reconcile::roadmap::{LearningRoadmap, ProgressEntry, SkillEntry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DATASET_FILE: &str = "visualization_data.json";
pub const RECORDS_CSV_FILE: &str = "enhanced_certifications.csv";
pub const REPORT_FILE: &str = "portfolio_report.md";
pub const SKILLS_CSV_FILE: &str = "skills_breakdown.csv";
pub const ROADMAP_FILE: &str = "learning_roadmap.json";
pub const LEARNING_PROGRESS_FILE: &str = "learning_progress_tracker.csv";

/// Everything a single run writes.
pub struct Outputs<'a> {
    pub dataset: &'a PortfolioDataset,
    pub skills: &'a [SkillEntry],
    pub progress: &'a [ProgressEntry],
    pub roadmap: &'a LearningRoadmap,
    pub source: ReportSource,
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Write all enabled outputs into `dir`, creating it if needed.
///
/// Returns the written paths in write order.
pub fn write_outputs(dir: &Path, outputs: &Outputs<'_>, toggles: &ReportConfig) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = vec![
        write_file(dir, DATASET_FILE, &generate_dataset_json(outputs.dataset)?)?,
        write_file(
            dir,
            RECORDS_CSV_FILE,
            &csv::records_csv(&outputs.dataset.certifications),
        )?,
    ];

    if toggles.write_markdown {
        let markdown =
            generate_markdown_report(outputs.dataset, Some(outputs.roadmap), &outputs.source);
        written.push(write_file(dir, REPORT_FILE, &markdown)?);
    }

    if toggles.write_skills {
        written.push(write_file(dir, SKILLS_CSV_FILE, &csv::skills_csv(outputs.skills))?);
    }

    if toggles.write_roadmap {
        let roadmap = generator::generate_roadmap_json(outputs.roadmap)?;
        written.push(write_file(dir, ROADMAP_FILE, &roadmap)?);
    }

    if toggles.write_progress {
        written.push(write_file(
            dir,
            LEARNING_PROGRESS_FILE,
            &csv::progress_csv(outputs.progress),
        )?);
    }

    Ok(written)
}
