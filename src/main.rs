mod backoff;
mod cli;
mod config;
mod error;
mod fetch;
mod filter;
mod orchestrator;
mod pos;
mod restock;
mod state_machine;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::backoff::{BackoffStore, FileBackoffStore};
use crate::cli::{Cli, Command};
use crate::config::{load_venues, select_venues, Settings};
use crate::fetch::FetchPolicy;
use crate::orchestrator::VenueOrchestrator;
use crate::pos::PosClient;
use crate::ui::RunProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load()?;
    match cli.command {
        Command::Run { venues, venue_ids } => run(&settings, venues, venue_ids).await,
        Command::Status => status(&settings),
        Command::ResetWait { venue_id } => reset_wait(&settings, venue_id),
    }
}

// Logs go to stderr so stdout stays reserved for the results JSON.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(
    settings: &Settings,
    venues_file: Option<PathBuf>,
    venue_ids: Vec<String>,
) -> Result<()> {
    let venues_path = venues_file.unwrap_or_else(|| settings.venues_file.clone());
    let venues = load_venues(&venues_path)?;
    let venues = select_venues(venues, &venue_ids, &venues_path)?;

    let client = PosClient::with_base_url(settings.base_url.clone());
    let mut store = FileBackoffStore::new(
        &settings.backoff_file,
        settings.default_wait_secs,
        settings.wait_increment_secs,
    );
    let orchestrator = VenueOrchestrator::new(
        client,
        FetchPolicy {
            poll_attempts: settings.poll_attempts,
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
            snapshot_dir: settings.snapshot_dir.clone(),
        },
        Duration::from_secs(settings.venue_delay_secs),
    );

    let progress = RunProgress::start(venues.len());
    let summary = orchestrator.run_all(&mut store, &venues).await;
    progress.complete(&summary);
    progress.print_results(&summary);
    Ok(())
}

fn status(settings: &Settings) -> Result<()> {
    let store = FileBackoffStore::new(
        &settings.backoff_file,
        settings.default_wait_secs,
        settings.wait_increment_secs,
    );
    let entries = store.entries();
    println!("Default wait: {}s", settings.default_wait_secs);
    if entries.is_empty() {
        println!("No learned waits.");
    } else {
        // Show the effective wait, which is never below the default.
        for venue_id in entries.keys() {
            println!("{venue_id}: {}s", store.get(venue_id));
        }
    }
    Ok(())
}

fn reset_wait(settings: &Settings, venue_id: Option<String>) -> Result<()> {
    let mut store = FileBackoffStore::new(
        &settings.backoff_file,
        settings.default_wait_secs,
        settings.wait_increment_secs,
    );
    match venue_id {
        Some(id) => {
            store.reset(&id);
            println!("Cleared learned wait for {id}.");
        }
        None => {
            store.clear();
            println!("Cleared all learned waits.");
        }
    }
    Ok(())
}
