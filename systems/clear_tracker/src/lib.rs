#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy clear tracker that declares a level cleared once its last enemy dies.
//!
//! The tracker only remembers enemy identifiers; the entities themselves stay
//! owned by the world. Emptiness is evaluated after a whole event batch has
//! been applied, so simultaneous deaths produce a single declaration.

use std::collections::BTreeSet;

use cowball_core::{Command, EnemyId, Event, LevelSerial};
use log::{debug, info};

/// Progress of the level currently being tracked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClearState {
    /// No level is being tracked.
    Idle,
    /// Enemies remain alive in the tracked level.
    Populated {
        /// Level instance being tracked.
        serial: LevelSerial,
        /// Number of enemies still alive.
        live: usize,
    },
    /// Every tracked enemy died and the level was declared cleared.
    Cleared {
        /// Level instance that was cleared.
        serial: LevelSerial,
    },
}

/// Pure system that watches enemy deaths and declares levels cleared.
#[derive(Debug, Default)]
pub struct ClearTracker {
    level: Option<LevelSerial>,
    live: BTreeSet<EnemyId>,
    cleared: bool,
}

impl ClearTracker {
    /// Creates a tracker that is not watching any level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports the tracker's current progress.
    #[must_use]
    pub fn state(&self) -> ClearState {
        match self.level {
            None => ClearState::Idle,
            Some(serial) if self.cleared => ClearState::Cleared { serial },
            Some(serial) => ClearState::Populated {
                serial,
                live: self.live.len(),
            },
        }
    }

    /// Consumes an event batch and emits `Command::DeclareLevelCleared` at most once per level.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelLoaded {
                    serial, enemies, ..
                } => self.on_level_loaded(*serial, enemies),
                Event::EnemyDied { enemy, serial } => {
                    if self.level == Some(*serial) {
                        self.on_enemy_died(*enemy);
                    }
                }
                Event::LevelRetired { serial, .. } => {
                    if self.level == Some(*serial) {
                        self.stop();
                    }
                }
                _ => {}
            }
        }

        self.settle(out);
    }

    /// Snapshots the enemies of a freshly loaded level, replacing any previous snapshot.
    pub fn on_level_loaded(&mut self, serial: LevelSerial, enemies: &[EnemyId]) {
        self.level = Some(serial);
        self.live = enemies.iter().copied().collect();
        self.cleared = false;
    }

    /// Stops tracking the given enemy. Emptiness is evaluated by [`ClearTracker::settle`].
    pub fn on_enemy_died(&mut self, enemy: EnemyId) {
        if !self.live.remove(&enemy) {
            debug!("enemy {enemy:?} was not tracked");
        }
    }

    /// Declares the tracked level cleared if no enemy remains and it has not been declared yet.
    pub fn settle(&mut self, out: &mut Vec<Command>) {
        let Some(serial) = self.level else {
            return;
        };
        if self.cleared || !self.live.is_empty() {
            return;
        }

        self.cleared = true;
        info!("level {serial:?} cleared");
        out.push(Command::DeclareLevelCleared { serial });
    }

    fn stop(&mut self) {
        self.level = None;
        self.live.clear();
        self.cleared = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_tracker_never_declares() {
        let mut tracker = ClearTracker::new();
        let mut out = Vec::new();
        tracker.settle(&mut out);
        assert!(out.is_empty());
        assert_eq!(tracker.state(), ClearState::Idle);
    }

    #[test]
    fn deaths_from_other_levels_are_ignored() {
        let mut tracker = ClearTracker::new();
        let mut out = Vec::new();
        tracker.on_level_loaded(LevelSerial::new(2), &[EnemyId::new(7)]);

        tracker.handle(
            &[Event::EnemyDied {
                enemy: EnemyId::new(7),
                serial: LevelSerial::new(1),
            }],
            &mut out,
        );

        assert!(out.is_empty());
        assert_eq!(
            tracker.state(),
            ClearState::Populated {
                serial: LevelSerial::new(2),
                live: 1
            }
        );
    }
}
