mod phase;
mod run;

pub use phase::{Phase, PhaseMachine, PhaseOutcome, Transition};
pub use run::{RunStatus, VenueReport, VenueRun};
