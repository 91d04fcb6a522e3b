#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boss outcome gate that turns a boss defeat into a won run.

use cowball_core::{Event, LevelSerial, RunOutcome};
use log::{debug, info};

/// Pure system that watches the boss of the resident level, if there is one.
#[derive(Debug, Default)]
pub struct BossGate {
    watching: Option<LevelSerial>,
    fired: bool,
}

impl BossGate {
    /// Creates an inactive gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a boss is being watched.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.watching.is_some() && !self.fired
    }

    /// Consumes an event batch and reports [`RunOutcome::Won`] the first time the watched boss falls.
    pub fn handle(&mut self, events: &[Event]) -> Option<RunOutcome> {
        let mut outcome = None;
        for event in events {
            match event {
                Event::LevelLoaded { serial, boss, .. } => {
                    self.watching = boss.then_some(*serial);
                    self.fired = false;
                }
                Event::LevelRetired { serial, .. } if self.watching == Some(*serial) => {
                    self.watching = None;
                }
                Event::BossDefeated { serial } => {
                    if self.watching != Some(*serial) || self.fired {
                        debug!("ignoring boss defeat for {serial:?}");
                        continue;
                    }
                    self.fired = true;
                    info!("boss of {serial:?} defeated");
                    outcome = Some(RunOutcome::Won);
                }
                _ => {}
            }
        }
        outcome
    }
}
