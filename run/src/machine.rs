//! Tri-state run lifecycle.

use cowball_core::{LevelId, RunOutcome, RunState};
use log::{debug, info};

/// Owns the run state and the level staged for the next load.
///
/// Every mutation goes through a transition method so that illegal moves,
/// such as staging a level while already loading, are rejected in one place.
#[derive(Debug)]
pub(crate) struct RunStateMachine {
    state: RunState,
    outcome: Option<RunOutcome>,
    pending: Option<LevelId>,
}

impl RunStateMachine {
    pub(crate) fn new(first: LevelId) -> Self {
        Self {
            state: RunState::LoadingLevel,
            outcome: None,
            pending: Some(first),
        }
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub(crate) fn pending(&self) -> Option<&LevelId> {
        self.pending.as_ref()
    }

    /// Hands out the staged level while loading. The state stays `LoadingLevel`.
    pub(crate) fn take_pending(&mut self) -> Option<LevelId> {
        if self.state != RunState::LoadingLevel {
            return None;
        }
        self.pending.take()
    }

    /// Stages the next level and re-enters `LoadingLevel`.
    pub(crate) fn stage(&mut self, level: LevelId) -> bool {
        if self.state != RunState::Playing {
            debug!("cannot stage {level} while {:?}", self.state);
            return false;
        }
        self.pending = Some(level);
        self.state = RunState::LoadingLevel;
        true
    }

    pub(crate) fn finish_loading(&mut self) -> bool {
        if self.state != RunState::LoadingLevel {
            return false;
        }
        self.state = RunState::Playing;
        true
    }

    /// Enters `GameOver`. Only the first outcome sticks. A staged level stays
    /// staged so that it remains accounted for until a restart.
    pub(crate) fn end(&mut self, outcome: RunOutcome) -> bool {
        if self.state == RunState::GameOver {
            debug!("run already over; ignoring {outcome:?}");
            return false;
        }
        info!("run over: {outcome:?}");
        self.state = RunState::GameOver;
        self.outcome = Some(outcome);
        true
    }

    pub(crate) fn restart(&mut self, first: LevelId) -> bool {
        if self.state != RunState::GameOver {
            return false;
        }
        *self = Self::new(first);
        true
    }
}
