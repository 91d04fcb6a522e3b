//! Tunables supplied when a run starts.

use cowball_core::CameraBounds;

const DEFAULT_VIEWPORT: CameraBounds = CameraBounds::new(0, 1152, 0, 648);
const DEFAULT_PLAYER_MAX_HEALTH: f32 = 5.0;
const DEFAULT_BOSS_MAX_HEALTH: f32 = 100.0;

/// Configuration parameters required to construct a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    seed: u64,
    viewport: CameraBounds,
    player_max_health: f32,
    boss_max_health: f32,
}

impl RunConfig {
    /// Creates a configuration with default tunables and the provided shuffle seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            viewport: DEFAULT_VIEWPORT,
            player_max_health: DEFAULT_PLAYER_MAX_HEALTH,
            boss_max_health: DEFAULT_BOSS_MAX_HEALTH,
        }
    }

    /// Replaces the camera bounds used by levels that declare none.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: CameraBounds) -> Self {
        self.viewport = viewport;
        self
    }

    /// Replaces the player's starting maximum health.
    #[must_use]
    pub const fn with_player_max_health(mut self, health: f32) -> Self {
        self.player_max_health = health;
        self
    }

    /// Replaces the health every boss starts with.
    #[must_use]
    pub const fn with_boss_max_health(mut self, health: f32) -> Self {
        self.boss_max_health = health;
        self
    }

    /// Seed driving every shuffle of the run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Camera bounds used by levels that declare none.
    #[must_use]
    pub const fn viewport(&self) -> CameraBounds {
        self.viewport
    }

    /// Player's starting maximum health.
    #[must_use]
    pub const fn player_max_health(&self) -> f32 {
        self.player_max_health
    }

    /// Health every boss starts with.
    #[must_use]
    pub const fn boss_max_health(&self) -> f32 {
        self.boss_max_health
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
