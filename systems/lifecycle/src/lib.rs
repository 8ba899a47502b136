#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lifecycle system that fires the automatic show transitions.
//!
//! The world owns the state machine and re-checks every guard; this system
//! only notices when a guard is likely to hold and asks for the transition.

use std::time::Duration;

use showhouse_core::{Command, CrowdReport, ShowClockView, ShowState, ShowTrigger};

/// Pure system that turns audience progress and elapsed time into triggers.
#[derive(Debug, Default)]
pub struct Lifecycle;

impl Lifecycle {
    /// Creates a new lifecycle system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits at most one transition request for the current state.
    pub fn handle(
        &mut self,
        clock: &ShowClockView,
        movie_duration: Duration,
        crowd: &CrowdReport,
        out: &mut Vec<Command>,
    ) {
        let trigger = match clock.state {
            ShowState::Waiting => None,
            ShowState::Entering => crowd.all_seated().then_some(ShowTrigger::AudienceSeated),
            ShowState::Movie => {
                (clock.elapsed_in_state >= movie_duration).then_some(ShowTrigger::MovieFinished)
            }
            ShowState::Leaving => crowd.all_exited().then_some(ShowTrigger::AudienceExited),
        };

        if let Some(trigger) = trigger {
            out.push(Command::AdvanceShow { trigger });
        }
    }
}
