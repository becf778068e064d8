//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.certfolio.toml` files.

use crate::reconcile::{matcher::default_rules, MatchRule};
use crate::scraper::ScrapeTarget;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".certfolio.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Study guide scraper settings.
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Tracker-to-guide matching rules.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Which optional outputs to write.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Markdown certification tracker.
    #[serde(default = "default_tracker")]
    pub tracker: PathBuf,

    /// Directory holding `<code>_study_guide.json` files.
    #[serde(default = "default_guides_dir")]
    pub guides_dir: PathBuf,

    /// Directory receiving generated datasets and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            tracker: default_tracker(),
            guides_dir: default_guides_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_tracker() -> PathBuf {
    PathBuf::from("docs/certifications-tracker.md")
}

fn default_guides_dir() -> PathBuf {
    PathBuf::from("data/external-sources")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

/// Scraper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Pause between consecutive requests, in seconds.
    #[serde(default = "default_delay")]
    pub delay_seconds: u64,

    /// Pages to scrape.
    #[serde(default = "default_targets")]
    pub targets: Vec<ScrapeTarget>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            delay_seconds: default_delay(),
            targets: default_targets(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_delay() -> u64 {
    2
}

fn default_targets() -> Vec<ScrapeTarget> {
    vec![ScrapeTarget::pl300()]
}

/// Matching rules, tried in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<MatchRule>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Optional output toggles. The JSON dataset and CSV are always written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Write `portfolio_report.md`.
    #[serde(default = "default_true")]
    pub write_markdown: bool,

    /// Write `skills_breakdown.csv`.
    #[serde(default = "default_true")]
    pub write_skills: bool,

    /// Write `learning_roadmap.json`.
    #[serde(default = "default_true")]
    pub write_roadmap: bool,

    /// Write `learning_progress_tracker.csv`.
    #[serde(default = "default_true")]
    pub write_progress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            write_markdown: true,
            write_skills: true,
            write_roadmap: true,
            write_progress: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only explicitly provided CLI values override the config file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref tracker) = args.tracker {
            self.paths.tracker = tracker.clone();
        }
        if let Some(ref guides_dir) = args.guides_dir {
            self.paths.guides_dir = guides_dir.clone();
        }
        if let Some(ref output_dir) = args.output_dir {
            self.paths.output_dir = output_dir.clone();
        }
        if let Some(timeout) = args.timeout {
            self.scraper.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.paths.tracker,
            PathBuf::from("docs/certifications-tracker.md")
        );
        assert_eq!(config.scraper.delay_seconds, 2);
        assert_eq!(config.scraper.targets[0].key, "pl300");
        assert_eq!(config.matcher.rules, default_rules());
        assert!(config.report.write_roadmap);
        assert!(config.report.write_progress);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[paths]
tracker = "README.md"

[scraper]
delay_seconds = 5

[[matcher.rules]]
name_contains = "power bi"
key_contains = "pl300"

[[matcher.rules]]
name_contains = "azure data engineer"
key_contains = "dp203"

[report]
write_skills = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.paths.tracker, PathBuf::from("README.md"));
        assert_eq!(config.paths.output_dir, PathBuf::from("data/processed"));
        assert_eq!(config.scraper.delay_seconds, 5);
        assert_eq!(config.scraper.timeout_seconds, 10);
        assert_eq!(config.matcher.rules.len(), 2);
        assert_eq!(config.matcher.rules[1].key_contains, "dp203");
        assert!(!config.report.write_skills);
        assert!(config.report.write_markdown);
        assert!(config.report.write_progress);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[paths]"));
        assert!(toml_str.contains("[scraper]"));
        assert!(toml_str.contains("name_contains = \"power bi\""));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.scraper.targets, default_targets());
    }
}
