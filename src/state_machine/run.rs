use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Tracks the lifecycle status of a venue's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// One venue moving through the restock phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueRun {
    pub venue_id: String,
    pub status: RunStatus,
    pub phase: Phase,
    pub phase_history: Vec<Phase>,
    pub started_at: DateTime<Utc>,
}

impl VenueRun {
    pub fn new(venue_id: impl Into<String>) -> Self {
        Self {
            venue_id: venue_id.into(),
            status: RunStatus::Pending,
            phase: Phase::Fetch,
            phase_history: Vec::new(),
            started_at: Utc::now(),
        }
    }
}

/// Structured per-venue record produced when the run reaches DONE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueReport {
    pub venue_id: String,
    pub status: RunStatus,
    /// Full phase walk, including the terminal phase.
    pub phases: Vec<Phase>,
    /// Human-readable result slot ("Restocked 3 items.", ...).
    pub result: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl VenueReport {
    /// Generate the report from a completed or failed run.
    pub fn from_run(run: &VenueRun, result: impl Into<String>) -> Self {
        let now = Utc::now();
        let duration = now - run.started_at;
        let mut phases = run.phase_history.clone();
        phases.push(run.phase);

        Self {
            venue_id: run.venue_id.clone(),
            status: run.status,
            phases,
            result: result.into(),
            started_at: run.started_at,
            completed_at: now,
            duration_ms: duration.num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_creation_defaults() {
        let run = VenueRun::new("venue-1");
        assert_eq!(run.venue_id, "venue-1");
        assert_eq!(run.status, RunStatus::Pending);
        assert_eq!(run.phase, Phase::Fetch);
        assert!(run.phase_history.is_empty());
    }

    #[test]
    fn report_from_run() {
        let run = VenueRun::new("venue-1");
        let report = VenueReport::from_run(&run, "No updates needed.");

        assert_eq!(report.venue_id, "venue-1");
        assert_eq!(report.result, "No updates needed.");
        assert_eq!(report.phases, vec![Phase::Fetch]);
        assert!(report.duration_ms >= 0);
    }

    #[test]
    fn report_serialization_roundtrip() {
        let run = VenueRun::new("venue-1");
        let report = VenueReport::from_run(&run, "Restocked 2 items.");
        let json = serde_json::to_string(&report).unwrap();
        let deserialized: VenueReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.venue_id, "venue-1");
        assert_eq!(deserialized.result, "Restocked 2 items.");
        assert_eq!(deserialized.phases, vec![Phase::Fetch]);
    }
}
