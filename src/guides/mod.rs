//! Scraped study guide store.
//!
//! Guides live as `<code>_study_guide.json` files in one directory. The
//! code before the suffix is the guide's source key. Each JSON document
//! is accompanied by a plain-text rendering for reading without tools.

use crate::models::{ScrapedGuide, StudyResource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name suffix identifying a stored study guide.
pub const GUIDE_SUFFIX: &str = "_study_guide.json";

/// Failure to load one guide file.
#[derive(Debug, Error)]
pub enum GuideError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed guide {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk study guide document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideDocument {
    pub certification: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub scraped_date: String,
    #[serde(default)]
    pub sections: GuideSections,
}

/// Sections of a study guide document. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideSections {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills_measured: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub study_resources: Vec<StudyResource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exam_details: BTreeMap<String, String>,
}

impl GuideDocument {
    /// Attach the source key the document is stored under.
    pub fn into_guide(self, source_key: &str) -> ScrapedGuide {
        ScrapedGuide {
            source_key: source_key.to_string(),
            certification_title: self.certification,
            source_url: self.url,
            scraped_date: self.scraped_date,
            skills: self.sections.skills_measured,
            resources: self.sections.study_resources,
            exam_details: self.sections.exam_details,
        }
    }
}

impl From<&ScrapedGuide> for GuideDocument {
    fn from(guide: &ScrapedGuide) -> Self {
        Self {
            certification: guide.certification_title.clone(),
            url: guide.source_url.clone(),
            scraped_date: guide.scraped_date.clone(),
            sections: GuideSections {
                skills_measured: guide.skills.clone(),
                study_resources: guide.resources.clone(),
                exam_details: guide.exam_details.clone(),
            },
        }
    }
}

/// Source key for a guide file name, if it is one.
pub fn source_key_for(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(GUIDE_SUFFIX)
        .filter(|key| !key.is_empty())
}

/// Load a single guide file.
pub fn load_guide(path: &Path, source_key: &str) -> Result<ScrapedGuide, GuideError> {
    let content = std::fs::read_to_string(path).map_err(|source| GuideError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: GuideDocument =
        serde_json::from_str(&content).map_err(|source| GuideError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(document.into_guide(source_key))
}

/// Load every study guide stored in `dir`, sorted by source key.
///
/// A missing directory yields no guides; unreadable or malformed files
/// are logged and skipped.
pub fn load_guides(dir: &Path) -> Vec<ScrapedGuide> {
    if !dir.is_dir() {
        info!("No guide directory at {}", dir.display());
        return Vec::new();
    }

    let mut guides = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_name = entry.file_name().to_string_lossy();
        let Some(key) = source_key_for(&file_name) else {
            continue;
        };

        match load_guide(entry.path(), key) {
            Ok(guide) => {
                debug!("Loaded study guide {}", key);
                guides.push(guide);
            }
            Err(e) => warn!("Skipping study guide: {}", e),
        }
    }

    guides.sort_by(|a, b| a.source_key.cmp(&b.source_key));
    info!("Loaded {} study guides", guides.len());
    guides
}

/// Persist a guide as JSON plus its text rendering.
///
/// Returns the path of the JSON document.
pub fn save_guide(dir: &Path, guide: &ScrapedGuide) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create guide directory {}", dir.display()))?;

    let json_path = dir.join(format!("{}{}", guide.source_key, GUIDE_SUFFIX));
    let json = serde_json::to_string_pretty(&GuideDocument::from(guide))?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let txt_path = dir.join(format!("{}_study_guide.txt", guide.source_key));
    std::fs::write(&txt_path, render_guide_text(guide))
        .with_context(|| format!("Failed to write {}", txt_path.display()))?;

    info!(
        "Study guide saved to {} and {}",
        json_path.display(),
        txt_path.display()
    );
    Ok(json_path)
}

/// Plain-text rendering of a guide.
pub fn render_guide_text(guide: &ScrapedGuide) -> String {
    let mut out = String::new();

    out.push_str(&format!("STUDY GUIDE: {}\n", guide.certification_title));
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");
    out.push_str(&format!("Source: {}\n", guide.source_url));
    out.push_str(&format!("Scraped: {}\n\n", guide.scraped_date));

    if !guide.skills.is_empty() {
        push_heading(&mut out, "SKILLS MEASURED");
        for skill in &guide.skills {
            out.push_str(&format!("• {}\n", skill));
        }
        out.push('\n');
    }

    if !guide.resources.is_empty() {
        push_heading(&mut out, "STUDY RESOURCES");
        for resource in &guide.resources {
            out.push_str(&format!("• {}\n", resource.text));
            if !resource.url.is_empty() {
                out.push_str(&format!("  Link: {}\n", resource.url));
            }
        }
        out.push('\n');
    }

    if !guide.exam_details.is_empty() {
        push_heading(&mut out, "EXAM DETAILS");
        for (key, value) in &guide.exam_details {
            out.push_str(&format!("• {}: {}\n", key, value));
        }
        out.push('\n');
    }

    out
}

fn push_heading(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(40));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PL300: &str = include_str!("../../fixtures/pl300_study_guide.json");

    #[test]
    fn test_source_key_for() {
        assert_eq!(source_key_for("pl300_study_guide.json"), Some("pl300"));
        assert_eq!(source_key_for("pl300_study_guide.txt"), None);
        assert_eq!(source_key_for("_study_guide.json"), None);
    }

    #[test]
    fn test_document_into_guide() {
        let doc: GuideDocument = serde_json::from_str(PL300).unwrap();
        let guide = doc.into_guide("pl300");
        assert_eq!(guide.source_key, "pl300");
        assert_eq!(guide.skills.len(), 4);
        assert_eq!(guide.resources.len(), 2);
        assert_eq!(guide.resources[1].url, "");
        assert_eq!(
            guide.exam_details.get("duration").map(String::as_str),
            Some("100 minutes")
        );
    }

    #[test]
    fn test_document_without_sections() {
        let doc: GuideDocument =
            serde_json::from_str(r#"{"certification": "X", "url": "https://x"}"#).unwrap();
        let guide = doc.into_guide("x");
        assert!(guide.skills.is_empty());
        assert!(guide.exam_details.is_empty());
    }

    #[test]
    fn test_load_guide_without_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dp203_study_guide.json");
        std::fs::write(
            &path,
            r#"{"certification": "Azure Data Engineer", "sections": {"skills_measured": ["Design data storage"]}}"#,
        )
        .unwrap();

        let guide = load_guide(&path, "dp203").unwrap();
        assert_eq!(guide.source_url, "");
        assert_eq!(guide.skills, vec!["Design data storage"]);
        assert_eq!(load_guides(dir.path()).len(), 1);
    }

    #[test]
    fn test_load_guides_skips_malformed_and_unrelated_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pl300_study_guide.json"), PL300).unwrap();
        std::fs::write(dir.path().join("broken_study_guide.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();
        std::fs::write(dir.path().join("pl300_study_guide.txt"), "text").unwrap();

        let guides = load_guides(dir.path());
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].source_key, "pl300");
    }

    #[test]
    fn test_load_guides_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(load_guides(&dir.path().join("absent")).is_empty());
    }

    #[test]
    fn test_load_guide_reports_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_study_guide.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            load_guide(&path, "bad"),
            Err(GuideError::Malformed { .. })
        ));
    }

    #[test]
    fn test_save_guide_writes_json_and_text() {
        let dir = TempDir::new().unwrap();
        let doc: GuideDocument = serde_json::from_str(PL300).unwrap();
        let guide = doc.into_guide("pl300");

        let json_path = save_guide(dir.path(), &guide).unwrap();
        let reloaded = load_guide(&json_path, "pl300").unwrap();
        assert_eq!(reloaded, guide);

        let text = std::fs::read_to_string(dir.path().join("pl300_study_guide.txt")).unwrap();
        assert!(text.starts_with("STUDY GUIDE: Microsoft Power BI Data Analyst (PL-300)"));
        assert!(text.contains("SKILLS MEASURED"));
        assert!(text.contains("  Link: https://learn.microsoft.com/en-us/training/courses/pl-300t00"));
        assert!(text.contains("• duration: 100 minutes"));
    }
}
