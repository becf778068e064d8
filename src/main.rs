//! Certfolio - certification tracker reconciler
//!
//! A CLI tool that reads a markdown certification tracker, merges it
//! with scraped exam study guides and writes a portfolio dataset plus
//! reports for the charting scripts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable config, unwritable output, etc.)

mod cli;
mod config;
mod guides;
mod models;
mod reconcile;
mod report;
mod scraper;
mod tracker;

use anyhow::{Context, Result};
use chrono::Local;
use cli::Args;
use config::{Config, CONFIG_FILE};
use models::{PortfolioDataset, PortfolioSummary};
use reconcile::roadmap::{build_roadmap, learning_progress, skills_breakdown};
use reconcile::KeywordMatcher;
use report::{Outputs, ReportSource};
use scraper::GuideScraper;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Certfolio v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Reconciliation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .certfolio.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize paths, scrape targets and matching rules.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete reconcile workflow.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Refresh study guides
    if args.scrape {
        scrape_guides(&config, &args).await?;
    }

    // Step 2: Load inputs
    println!("📋 Reading tracker: {}", config.paths.tracker.display());
    let rows = tracker::load_tracker(&config.paths.tracker);
    let guides = guides::load_guides(&config.paths.guides_dir);
    println!(
        "   {} certifications, {} study guides",
        rows.len(),
        guides.len()
    );

    // Step 3: Reconcile
    let matcher = KeywordMatcher::new(config.matcher.rules.clone());
    debug!("Matching with {} rules", matcher.rules().len());

    let records = reconcile::enrich_with(&rows, &guides, &matcher);
    let summary = reconcile::summarize(&records);
    let generated_date = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let dataset = PortfolioDataset::new(records, summary, generated_date);

    let skills = skills_breakdown(&guides);
    let last_updated = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    let progress = learning_progress(&guides, &last_updated);
    let roadmap = build_roadmap(
        &dataset.certifications,
        skills.len(),
        dataset.generated_date.clone(),
    );

    print_summary(&dataset.summary);

    if args.dry_run {
        println!("\n✅ Dry run complete. Nothing was written.");
        return Ok(());
    }

    // Step 4: Write outputs
    println!("\n📝 Writing outputs to {}...", config.paths.output_dir.display());
    let outputs = Outputs {
        dataset: &dataset,
        skills: &skills,
        progress: &progress,
        roadmap: &roadmap,
        source: ReportSource {
            tracker: config.paths.tracker.display().to_string(),
            guides_loaded: guides.len(),
        },
    };
    let written = report::write_outputs(&config.paths.output_dir, &outputs, &config.report)?;
    for path in &written {
        println!("   📄 {}", path.display());
    }

    println!(
        "\n✅ Reconciliation complete in {:.1}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Scrape the configured targets, persist the guides and optionally
/// stamp the tracker.
async fn scrape_guides(config: &Config, args: &Args) -> Result<()> {
    let targets = &config.scraper.targets;
    println!("🌐 Scraping {} study guide page(s)...", targets.len());

    let scraper = GuideScraper::new(&config.scraper, !args.quiet)?;
    let scraped = scraper.scrape_all(targets).await;

    for guide in &scraped {
        let path = guides::save_guide(&config.paths.guides_dir, guide)?;
        println!(
            "   ✅ {}: {} skills, {} resources → {}",
            guide.source_key,
            guide.skills.len(),
            guide.resources.len(),
            path.display()
        );
    }

    if scraped.len() < targets.len() {
        warn!(
            "{} of {} study guide pages failed to scrape",
            targets.len() - scraped.len(),
            targets.len()
        );
    }

    if args.stamp_tracker && !scraped.is_empty() {
        stamp_tracker_file(config)?;
    }

    Ok(())
}

fn stamp_tracker_file(config: &Config) -> Result<()> {
    let path = &config.paths.tracker;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tracker {}", path.display()))?;

    match tracker::stamp_tracker(&content, Local::now().naive_local()) {
        Some(stamped) => {
            std::fs::write(path, stamped)
                .with_context(|| format!("Failed to update tracker {}", path.display()))?;
            info!("Tracker updated with study guide timestamp");
        }
        None => warn!("No tracker table in {}, not stamping", path.display()),
    }
    Ok(())
}

fn print_summary(summary: &PortfolioSummary) {
    println!("\n📊 Portfolio Summary:");
    println!("   Total certifications: {}", summary.total);
    println!(
        "   - ✅ Completed: {} | 🔄 In Progress: {} | 📅 Planned: {}",
        summary.completed, summary.in_progress, summary.planned
    );
    println!(
        "   With study guides: {} ({} skills)",
        summary.with_study_guides, summary.total_skills
    );
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
