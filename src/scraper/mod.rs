//! Study guide scraping.
//!
//! Fetches each configured certification page in turn, extracts its
//! study guide sections and returns them as [`ScrapedGuide`]s. Requests
//! are strictly sequential with a fixed pause between them.

pub mod extract;

use crate::config::ScraperConfig;
use crate::models::ScrapedGuide;
use anyhow::{Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// A certification page to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    /// Short code the guide is stored under, e.g. "pl300".
    pub key: String,
    /// Title recorded in the guide document.
    pub certification: String,
    /// Page URL.
    pub url: String,
}

impl ScrapeTarget {
    /// The Microsoft PL-300 (Power BI Data Analyst) study guide.
    pub fn pl300() -> Self {
        Self {
            key: "pl300".to_string(),
            certification: "Microsoft Power BI Data Analyst (PL-300)".to_string(),
            url: "https://learn.microsoft.com/en-us/credentials/certifications/resources/study-guides/pl-300".to_string(),
        }
    }
}

/// Sequential study guide scraper.
pub struct GuideScraper {
    http_client: reqwest::Client,
    delay: Duration,
    show_progress: bool,
}

impl GuideScraper {
    /// Create a scraper from configuration.
    pub fn new(config: &ScraperConfig, show_progress: bool) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            delay: Duration::from_secs(config.delay_seconds),
            show_progress,
        })
    }

    /// Fetch a page body, failing on non-success status codes.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Bad response from {}", url))?;

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))
    }

    /// Scrape one target.
    pub async fn scrape(&self, target: &ScrapeTarget) -> Result<ScrapedGuide> {
        info!("Scraping {} study guide from {}", target.key, target.url);

        let spinner = self.spinner(&target.key);
        let page = self.fetch_page(&target.url).await;
        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }
        let page = page?;

        Ok(guide_from_page(target, &page))
    }

    /// Scrape every target in order, pausing between requests.
    ///
    /// Failed targets are logged and left out of the result.
    pub async fn scrape_all(&self, targets: &[ScrapeTarget]) -> Vec<ScrapedGuide> {
        let mut guides = Vec::new();

        for (i, target) in targets.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.scrape(target).await {
                Ok(guide) => guides.push(guide),
                Err(e) => error!("Error scraping {} study guide: {:#}", target.key, e),
            }
        }

        guides
    }

    fn spinner(&self, key: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Fetching {} study guide...", key));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}

/// Build a guide from a fetched page.
pub fn guide_from_page(target: &ScrapeTarget, html: &str) -> ScrapedGuide {
    let sections = extract::extract_sections(html);
    debug!(
        "{}: {} skills, {} resources, {} exam details",
        target.key,
        sections.skills.len(),
        sections.resources.len(),
        sections.exam_details.len()
    );

    ScrapedGuide {
        source_key: target.key.clone(),
        certification_title: target.certification.clone(),
        source_url: target.url.clone(),
        scraped_date: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        skills: sections.skills,
        resources: sections.resources,
        exam_details: sections.exam_details,
    }
}
