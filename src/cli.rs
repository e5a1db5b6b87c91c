//! Command-line surface of the batch worker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::app;
use crate::config::Config;
use crate::film::{self, FilmRecord};
use crate::pipeline::orchestrator::SessionOrchestrator;
use crate::pipeline::{LogObserver, ProgressObserver};
use crate::profile::ProfileStore;
use crate::strategy::generator;
use crate::util::cancel::CancelFlag;

#[derive(Debug, Parser)]
#[command(
    name = "lantern-scout",
    version,
    about = "Batch trade-paper research over a digitized periodical catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog for every film in a CSV batch.
    Run(RunArgs),
    /// List the available research profiles.
    Profiles,
    /// Print the ordered strategy list for one film without searching.
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// CSV batch with title,year,author,director,studio,stars columns.
    #[arg(long)]
    pub films: PathBuf,
    /// Research profile key.
    #[arg(long, default_value = "default")]
    pub profile: String,
    /// Cap on films processed this run; overrides SCOUT_MAX_FILMS.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Output path; overrides SCOUT_OUTPUT_PATH.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub director: Option<String>,
    #[arg(long)]
    pub studio: Option<String>,
    /// Comma-separated star billing.
    #[arg(long)]
    pub stars: Option<String>,
    /// Research profile key.
    #[arg(long, default_value = "default")]
    pub profile: String,
}

/// Run a film batch end to end and persist the ranked output.
///
/// # Errors
/// Fails on configuration, profile, batch-validation, or persistence
/// errors. Individual strategy failures are absorbed inside the pipeline.
pub async fn run(config: &Config, args: RunArgs) -> Result<()> {
    let store = profile_store(config);
    let profile = store.load(&args.profile)?;
    profile.validate()?;

    let films = film::load_batch(&args.films)?;
    let output = args
        .output
        .unwrap_or_else(|| config.output_path().clone());
    let limit = args.limit.or(config.max_films());

    let cancel = CancelFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing the current call before stopping");
            signal_flag.request();
        }
    });

    let observer: Arc<dyn ProgressObserver> = Arc::new(LogObserver);
    let controller = app::build_batch_controller(config, output.clone(), observer, cancel)?;
    let reports = controller.run(&films, &profile, limit).await?;

    let total_sources: usize = reports.iter().map(|r| r.total_unique_sources).sum();
    info!(
        films = reports.len(),
        sources = total_sources,
        output = %output.display(),
        "run complete"
    );
    Ok(())
}

/// Print the available profiles, one per line.
///
/// # Errors
/// Infallible today; kept fallible for parity with the other commands.
pub fn profiles(config: &Config) -> Result<()> {
    for summary in profile_store(config).list() {
        println!("{:<16} {:<32} {}", summary.key, summary.name, summary.description);
    }
    Ok(())
}

/// Show what a profile would search for one film, in execution order.
///
/// # Errors
/// Fails when the profile cannot be loaded.
pub fn preview(config: &Config, args: PreviewArgs) -> Result<()> {
    let profile = profile_store(config)
        .load(&args.profile)
        .context("failed to load profile for preview")?;

    let film = FilmRecord {
        title: args.title,
        year: args.year,
        author: args.author,
        director: args.director,
        studio: args.studio,
        stars: args
            .stars
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|star| !star.is_empty())
            .map(str::to_string)
            .collect(),
    };

    let mut strategies = generator::generate(&film, &profile);
    SessionOrchestrator::order_for_execution(&mut strategies);

    println!(
        "{} strategies for \"{}\" under profile {}",
        strategies.len(),
        film.title,
        profile.key()
    );
    for strategy in &strategies {
        println!(
            "{:>5.2}  {:<6}  {:<26}  {}",
            strategy.profile_weight, strategy.tier, strategy.kind, strategy.query
        );
    }
    Ok(())
}

fn profile_store(config: &Config) -> ProfileStore {
    ProfileStore::new(config.profile_dir().map(Path::to_path_buf))
}
