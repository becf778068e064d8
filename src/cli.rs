//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Certfolio - certification tracker reconciler
///
/// Reads the markdown certification tracker, merges it with scraped
/// study guides and writes the portfolio dataset (JSON + CSV), a
/// markdown report, a skills breakdown and a learning roadmap.
///
/// Examples:
///   certfolio
///   certfolio --scrape --stamp-tracker
///   certfolio --tracker docs/certifications-tracker.md --output-dir out
///   certfolio --dry-run
///   certfolio --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Markdown tracker to read
    ///
    /// Defaults to docs/certifications-tracker.md or the config file value.
    #[arg(short, long, value_name = "FILE", env = "CERTFOLIO_TRACKER")]
    pub tracker: Option<PathBuf>,

    /// Directory holding <code>_study_guide.json files
    #[arg(short, long, value_name = "DIR")]
    pub guides_dir: Option<PathBuf>,

    /// Directory for generated datasets and reports
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .certfolio.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Scrape the configured study guide pages before reconciling
    #[arg(long)]
    pub scrape: bool,

    /// After scraping, stamp the tracker with an update comment
    #[arg(long, requires = "scrape")]
    pub stamp_tracker: bool,

    /// HTTP request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Parse and reconcile, print the summary, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .certfolio.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.stamp_tracker && !self.scrape {
            return Err("--stamp-tracker requires --scrape".to_string());
        }

        if self.dry_run && self.scrape {
            return Err("--dry-run cannot be combined with --scrape".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref tracker) = self.tracker {
            if tracker.is_dir() {
                return Err(format!(
                    "Tracker path is a directory: {}",
                    tracker.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
