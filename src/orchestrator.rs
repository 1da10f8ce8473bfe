use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

use crate::backoff::BackoffStore;
use crate::config::VenueConfig;
use crate::fetch::{fetch_menu, FetchPolicy};
use crate::filter::sold_out_items;
use crate::pos::PosClient;
use crate::restock::submit_restock;
use crate::state_machine::{PhaseMachine, PhaseOutcome, RunStatus, VenueReport, VenueRun};

/// Drives every configured venue through the restock cycle.
pub struct VenueOrchestrator {
    client: PosClient,
    fetch_policy: FetchPolicy,
    /// Pause between consecutive venues so the upstream is not burst.
    venue_delay: Duration,
}

/// Aggregated outcome of one run across all venues.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub reports: Vec<VenueReport>,
}

impl RunSummary {
    /// Venue-id → result map, the shape consumers of a run read.
    pub fn results(&self) -> BTreeMap<String, String> {
        self.reports
            .iter()
            .map(|report| (report.venue_id.clone(), report.result.clone()))
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| report.status == RunStatus::Completed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }
}

impl VenueOrchestrator {
    pub fn new(client: PosClient, fetch_policy: FetchPolicy, venue_delay: Duration) -> Self {
        Self {
            client,
            fetch_policy,
            venue_delay,
        }
    }

    /// Process all venues strictly in sequence, pausing the courtesy delay
    /// between consecutive venues (not after the last). A venue's failure
    /// lands in its own result slot and never stops the venues behind it.
    pub async fn run_all(
        &self,
        store: &mut dyn BackoffStore,
        venues: &[VenueConfig],
    ) -> RunSummary {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(run_id = %run_id, venues = venues.len(), "starting restock run");

        let mut reports = Vec::with_capacity(venues.len());
        for (index, venue) in venues.iter().enumerate() {
            reports.push(self.run_venue(store, venue).await);
            if index + 1 < venues.len() {
                sleep(self.venue_delay).await;
            }
        }

        let completed_at = Utc::now();
        let summary = RunSummary {
            run_id,
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
            reports,
        };
        info!(
            run_id = %summary.run_id,
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "restock run finished"
        );
        summary
    }

    /// Run a single venue through FETCH → FILTER → RESTOCK → DONE,
    /// returning its report. Never fails the caller.
    pub async fn run_venue(
        &self,
        store: &mut dyn BackoffStore,
        venue: &VenueConfig,
    ) -> VenueReport {
        let mut run = VenueRun::new(venue.venue_id.clone());
        run.status = RunStatus::InProgress;

        // FETCH: submit the menu job and poll it to READY.
        let snapshot = match fetch_menu(&self.client, store, &self.fetch_policy, venue).await {
            Ok(snapshot) => {
                PhaseMachine::next(&mut run, PhaseOutcome::Success);
                snapshot
            }
            Err(err) => {
                error!(venue_id = %venue.venue_id, error = %err, "menu fetch failed");
                PhaseMachine::next(&mut run, PhaseOutcome::Failure(err.to_string()));
                return VenueReport::from_run(&run, format!("Failed to fetch menu: {err}"));
            }
        };

        // FILTER: pure selection, cannot fail.
        let candidates = sold_out_items(&snapshot, &venue.filter_policy());
        info!(venue_id = %venue.venue_id, count = candidates.len(), "sold-out items selected");
        PhaseMachine::next(&mut run, PhaseOutcome::Success);

        // RESTOCK: one batch update; the outcome is the venue's result.
        let outcome = submit_restock(&self.client, venue, &candidates).await;
        let phase_outcome = if outcome.is_success() {
            PhaseOutcome::Success
        } else {
            PhaseOutcome::Failure(outcome.to_string())
        };
        PhaseMachine::next(&mut run, phase_outcome);

        VenueReport::from_run(&run, outcome.to_string())
    }
}
