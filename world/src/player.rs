//! Player collaborator state owned by the world.

use cowball_core::{CameraBounds, ItemDefinition, PlayerStats, StatToChange, Vec2};

/// Result of damaging the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Hurt {
    /// The player was already dead; nothing changed.
    Ignored,
    /// The player survived with the provided health.
    Wounded(f32),
    /// The hit reduced the player's health to zero.
    Killed,
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) camera_bounds: Option<CameraBounds>,
    pub(crate) health: f32,
    pub(crate) stats: PlayerStats,
    pub(crate) killed: bool,
    base_max_health: f32,
}

impl Player {
    pub(crate) fn new(max_health: f32) -> Self {
        let stats = PlayerStats {
            max_health,
            ..PlayerStats::BASELINE
        };
        Self {
            position: Vec2::ZERO,
            camera_bounds: None,
            health: max_health,
            stats,
            killed: false,
            base_max_health: max_health,
        }
    }

    pub(crate) fn configure(&mut self, max_health: f32) {
        *self = Self::new(max_health);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.base_max_health);
    }

    pub(crate) fn place(&mut self, position: Vec2, camera_bounds: CameraBounds) {
        self.position = position;
        self.camera_bounds = Some(camera_bounds);
    }

    pub(crate) fn hurt(&mut self, amount: f32) -> Hurt {
        if self.killed {
            return Hurt::Ignored;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.killed = true;
            Hurt::Killed
        } else {
            Hurt::Wounded(self.health)
        }
    }

    /// Returns `true` when the call killed a living player.
    pub(crate) fn kill(&mut self) -> bool {
        if self.killed {
            return false;
        }
        self.health = 0.0;
        self.killed = true;
        true
    }

    pub(crate) fn heal(&mut self) -> Option<f32> {
        if self.killed {
            return None;
        }
        self.health = self.stats.max_health;
        Some(self.health)
    }

    pub(crate) fn apply_item(&mut self, item: &ItemDefinition) -> PlayerStats {
        self.stats = self.stats.with_item(item);
        if item.stat() == StatToChange::Health {
            self.health = (self.health + item.magnitude()).min(self.stats.max_health);
        }
        self.stats
    }
}
