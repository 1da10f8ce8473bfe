use std::fmt;

use serde::{Deserialize, Serialize};

use super::run::{RunStatus, VenueRun};

/// The four phases of a venue's restock cycle.
///
/// Each venue flows through: FETCH → FILTER → RESTOCK → DONE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Fetch,
    Filter,
    Restock,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Fetch => write!(f, "FETCH"),
            Phase::Filter => write!(f, "FILTER"),
            Phase::Restock => write!(f, "RESTOCK"),
            Phase::Done => write!(f, "DONE"),
        }
    }
}

/// The result of executing a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseOutcome {
    Success,
    Failure(String),
}

/// The result of evaluating a phase transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Advance to the next phase.
    Next(Phase),
    /// The run has completed (successfully or with a failure).
    Complete(PhaseOutcome),
}

/// Drives a `VenueRun` through the phase machine.
pub struct PhaseMachine;

impl PhaseMachine {
    /// Compute the next transition for the given run based on its current
    /// phase and the provided outcome.
    ///
    /// There are no phase-level retries: transient errors are absorbed
    /// inside the fetch poll loop, so by the time an outcome reaches the
    /// machine it is final. Any failure completes the run immediately and
    /// the remaining phases are skipped.
    pub fn next(run: &mut VenueRun, outcome: PhaseOutcome) -> Transition {
        let transition = match run.phase {
            Phase::Fetch => match outcome {
                PhaseOutcome::Success => Transition::Next(Phase::Filter),
                failure @ PhaseOutcome::Failure(_) => Transition::Complete(failure),
            },
            Phase::Filter => match outcome {
                PhaseOutcome::Success => Transition::Next(Phase::Restock),
                failure @ PhaseOutcome::Failure(_) => Transition::Complete(failure),
            },
            Phase::Restock => match outcome {
                PhaseOutcome::Success => Transition::Next(Phase::Done),
                failure @ PhaseOutcome::Failure(_) => Transition::Complete(failure),
            },
            Phase::Done => Transition::Complete(outcome),
        };

        // Apply the transition to the run.
        match &transition {
            Transition::Next(next_phase) => {
                run.phase_history.push(run.phase);
                run.phase = *next_phase;
                if *next_phase == Phase::Done {
                    run.status = RunStatus::Completed;
                }
            }
            Transition::Complete(outcome) => {
                run.phase_history.push(run.phase);
                run.phase = Phase::Done;
                run.status = match outcome {
                    PhaseOutcome::Success => RunStatus::Completed,
                    PhaseOutcome::Failure(_) => RunStatus::Failed,
                };
            }
        }

        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_all_phases() {
        let mut run = VenueRun::new("venue-1");
        assert_eq!(run.phase, Phase::Fetch);

        let t = PhaseMachine::next(&mut run, PhaseOutcome::Success);
        assert_eq!(t, Transition::Next(Phase::Filter));
        assert_eq!(run.phase, Phase::Filter);

        let t = PhaseMachine::next(&mut run, PhaseOutcome::Success);
        assert_eq!(t, Transition::Next(Phase::Restock));
        assert_eq!(run.phase, Phase::Restock);

        let t = PhaseMachine::next(&mut run, PhaseOutcome::Success);
        assert_eq!(t, Transition::Next(Phase::Done));
        assert_eq!(run.phase, Phase::Done);
        assert_eq!(run.status, RunStatus::Completed);

        // Done is terminal.
        let t = PhaseMachine::next(&mut run, PhaseOutcome::Success);
        assert_eq!(t, Transition::Complete(PhaseOutcome::Success));
    }

    #[test]
    fn fetch_failure_completes_immediately() {
        let mut run = VenueRun::new("venue-1");

        let t = PhaseMachine::next(
            &mut run,
            PhaseOutcome::Failure("menu request rejected (status 500)".into()),
        );
        assert!(matches!(t, Transition::Complete(PhaseOutcome::Failure(_))));
        assert_eq!(run.phase, Phase::Done);
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.phase_history, vec![Phase::Fetch]);
    }

    #[test]
    fn restock_failure_marks_run_failed() {
        let mut run = VenueRun::new("venue-1");
        PhaseMachine::next(&mut run, PhaseOutcome::Success);
        PhaseMachine::next(&mut run, PhaseOutcome::Success);
        assert_eq!(run.phase, Phase::Restock);

        let t = PhaseMachine::next(&mut run, PhaseOutcome::Failure("Update failed: 500".into()));
        assert_eq!(
            t,
            Transition::Complete(PhaseOutcome::Failure("Update failed: 500".into()))
        );
        assert_eq!(run.status, RunStatus::Failed);
    }

    #[test]
    fn phase_history_is_recorded() {
        let mut run = VenueRun::new("venue-1");

        PhaseMachine::next(&mut run, PhaseOutcome::Success);
        PhaseMachine::next(&mut run, PhaseOutcome::Success);
        PhaseMachine::next(&mut run, PhaseOutcome::Success);

        assert_eq!(
            run.phase_history,
            vec![Phase::Fetch, Phase::Filter, Phase::Restock]
        );
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Fetch.to_string(), "FETCH");
        assert_eq!(Phase::Filter.to_string(), "FILTER");
        assert_eq!(Phase::Restock.to_string(), "RESTOCK");
        assert_eq!(Phase::Done.to_string(), "DONE");
    }
}
