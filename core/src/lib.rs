#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cowball run engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and the run controller
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for systems to react to deterministically. Systems consume event
//! batches and respond exclusively with new command batches.

use std::{fmt, sync::Arc};

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// Pending level content is being instantiated and provisioned.
    LoadingLevel,
    /// The resident level is live and reacts to entity notifications.
    Playing,
    /// The run ended; only a restart is accepted.
    GameOver,
}

/// Terminal result attached to [`RunState::GameOver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The boss was defeated.
    Won,
    /// The player was killed.
    Lost,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the health pools used for the player and any boss.
    ConfigureHealth {
        /// Maximum health of the player at the start of a run.
        player_max_health: f32,
        /// Maximum health assigned to a boss when its level loads.
        boss_max_health: f32,
    },
    /// Instantiates level content, retiring any level that is still resident.
    LoadLevel {
        /// Identifier of the level being instantiated.
        level: LevelId,
        /// Preloaded content describing the level.
        content: LevelContent,
        /// Camera bounds handed to the player, already resolved against fallbacks.
        camera_bounds: CameraBounds,
        /// Position the player is moved to.
        player_spawn: Vec2,
    },
    /// Places an item entity into the resident level.
    SpawnItem {
        /// Coordinate of the item spawn point.
        position: Vec2,
        /// Definition the item is initialized with.
        item: ItemDefinition,
    },
    /// Places an exit entity into the resident level.
    SpawnExit {
        /// Coordinate of the exit spawn point.
        position: Vec2,
        /// Level the exit leads to.
        level: LevelId,
        /// Preloaded content of the level the exit leads to.
        content: LevelContent,
    },
    /// Marks the resident level as cleared of hostile entities.
    DeclareLevelCleared {
        /// Level instance the declaration applies to.
        serial: LevelSerial,
    },
    /// Reports that an enemy has been killed.
    KillEnemy {
        /// Enemy that was killed.
        enemy: EnemyId,
    },
    /// Deals damage to the boss of the resident level.
    DamageBoss {
        /// Health removed from the boss.
        amount: f32,
    },
    /// Deals damage to the player.
    HurtPlayer {
        /// Health removed from the player.
        amount: f32,
    },
    /// Restores the player to full health.
    HealPlayer,
    /// Kills the player outright, for example after falling out of the level.
    KillPlayer,
    /// Restores the player to its initial stats for a fresh run.
    ResetPlayer,
    /// Reports that the player picked up an item.
    CollectItem {
        /// Item that was picked up.
        item: ItemId,
    },
    /// Reports that the player reached an exit.
    ReachExit {
        /// Exit that was reached.
        exit: ExitId,
    },
    /// Marks the resident level and all of its children for destruction.
    RetireLevel,
    /// Suspends or resumes per-frame gameplay updates.
    SetPaused {
        /// Whether gameplay entities should be suspended.
        paused: bool,
    },
    /// Closes the current frame, physically removing everything marked for destruction.
    EndFrame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that level content was instantiated.
    LevelLoaded {
        /// Instance serial allocated to the level.
        serial: LevelSerial,
        /// Identifier of the level that was loaded.
        level: LevelId,
        /// Regular enemies found in the level, in spawn order.
        enemies: Vec<EnemyId>,
        /// Indicates whether the level hosts a boss.
        boss: bool,
    },
    /// Confirms that the player was moved into a freshly loaded level.
    PlayerPlaced {
        /// Position the player was moved to.
        position: Vec2,
        /// Camera bounds applied to the player.
        camera_bounds: CameraBounds,
    },
    /// Confirms that an item was placed.
    ItemSpawned {
        /// Identifier allocated to the item.
        item: ItemId,
        /// Definition the item carries.
        definition: ItemDefinition,
        /// Coordinate the item was placed at.
        position: Vec2,
    },
    /// Confirms that an exit was placed.
    ExitSpawned {
        /// Identifier allocated to the exit.
        exit: ExitId,
        /// Level the exit leads to.
        level: LevelId,
        /// Coordinate the exit was placed at.
        position: Vec2,
    },
    /// Announces that an enemy died. The enemy may linger until the frame ends.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Level instance the enemy belongs to.
        serial: LevelSerial,
    },
    /// Announces that the boss of a level was defeated.
    BossDefeated {
        /// Level instance the boss belongs to.
        serial: LevelSerial,
    },
    /// Announces that a level has no live enemies left.
    LevelCleared {
        /// Level instance that was cleared.
        serial: LevelSerial,
    },
    /// Reports the player's health after taking damage.
    PlayerHurt {
        /// Remaining health.
        health: f32,
    },
    /// Reports the player's health after being healed.
    PlayerHealed {
        /// Restored health.
        health: f32,
    },
    /// Announces that the player was killed.
    PlayerKilled,
    /// Confirms that the player was restored to its initial stats.
    PlayerReset,
    /// Confirms that the player picked up an item.
    ItemCollected {
        /// Item that was removed from the level.
        item: ItemId,
        /// Definition carried by the item.
        definition: ItemDefinition,
    },
    /// Reports the player's stats after an item was applied.
    PlayerStatsChanged {
        /// Updated stats.
        stats: PlayerStats,
    },
    /// Announces that the player reached an exit of the resident level.
    ExitReached {
        /// Exit that was reached.
        exit: ExitId,
        /// Level the exit leads to.
        level: LevelId,
    },
    /// Reports that an exit could not be used.
    ExitRejected {
        /// Exit named in the request.
        exit: ExitId,
        /// Specific reason the request failed.
        reason: TransitionError,
    },
    /// Announces that a level was marked for destruction. It stays queryable until the frame ends.
    LevelRetired {
        /// Instance serial of the retired level.
        serial: LevelSerial,
        /// Identifier of the retired level.
        level: LevelId,
    },
    /// Announces that a retired level and its children were removed.
    LevelDestroyed {
        /// Instance serial of the destroyed level.
        serial: LevelSerial,
        /// Identifier of the destroyed level.
        level: LevelId,
    },
    /// Announces that the pause flag changed.
    PauseChanged {
        /// Whether gameplay entities are suspended.
        paused: bool,
    },
}

/// Reasons a level transition request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionError {
    /// The run is not in [`RunState::Playing`].
    NotPlaying,
    /// No exit with the provided identifier exists in the resident level.
    UnknownExit,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPlaying => write!(f, "run is not playing"),
            Self::UnknownExit => write!(f, "exit does not belong to the resident level"),
        }
    }
}

/// Opaque name of a level's content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    /// Creates a level identifier from the provided name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the level.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LevelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Serial allocated to every level instance loaded into the world.
///
/// Two loads of the same [`LevelId`] receive distinct serials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelSerial(u32);

impl LevelSerial {
    /// Creates a new serial with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the serial.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExitId(u32);

impl ExitId {
    /// Creates a new exit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer rectangle the player's camera is confined to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraBounds {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl CameraBounds {
    /// Creates camera bounds from the four edges.
    #[must_use]
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.right
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.bottom
    }
}

/// Role a spawn point plays within its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRole {
    /// The point receives one drawn item.
    Item,
    /// The point receives one exit once the level is cleared.
    Exit,
}

/// Coordinate tagged with the role it plays in a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    /// Role of the point.
    pub role: SpawnRole,
    /// Coordinate of the point.
    pub position: Vec2,
}

/// Structured level content as supplied by the content source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Camera rectangle; levels without one fall back to the viewport.
    #[serde(default)]
    pub camera_bounds: Option<CameraBounds>,
    /// Required position the player spawns at.
    #[serde(default)]
    pub player_spawn: Option<Vec2>,
    /// Ordered item spawn coordinates.
    #[serde(default)]
    pub item_spawns: Vec<Vec2>,
    /// Ordered exit spawn coordinates.
    #[serde(default)]
    pub exit_spawns: Vec<Vec2>,
    /// Positions of the regular enemies placed in the level.
    #[serde(default)]
    pub enemies: Vec<Vec2>,
    /// Position of the boss, if the level hosts one.
    #[serde(default)]
    pub boss: Option<Vec2>,
}

impl LevelLayout {
    /// Enumerates the spawn points that carry the provided role, in declaration order.
    pub fn spawn_points(&self, role: SpawnRole) -> impl Iterator<Item = SpawnPoint> + '_ {
        let positions = match role {
            SpawnRole::Item => &self.item_spawns,
            SpawnRole::Exit => &self.exit_spawns,
        };
        positions
            .iter()
            .map(move |position| SpawnPoint {
                role,
                position: *position,
            })
    }
}

/// Shared handle to preloaded level content.
pub type LevelContent = Arc<LevelLayout>;

/// Player stat an item modifies when picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatToChange {
    /// The item has no stat effect.
    None,
    /// Horizontal movement speed.
    Speed,
    /// Shots per second.
    FireRate,
    /// Maximum health.
    Health,
    /// Initial vertical speed of a jump.
    JumpSpeed,
    /// Damage dealt per hit.
    Damage,
}

/// Immutable description of an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemDefinition {
    name: &'static str,
    visual_key: &'static str,
    stat: StatToChange,
    magnitude: f32,
}

impl ItemDefinition {
    /// Creates a new item definition.
    #[must_use]
    pub const fn new(
        name: &'static str,
        visual_key: &'static str,
        stat: StatToChange,
        magnitude: f32,
    ) -> Self {
        Self {
            name,
            visual_key,
            stat,
            magnitude,
        }
    }

    /// Display name of the item.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Key of the sprite presentation layers draw for the item.
    #[must_use]
    pub const fn visual_key(&self) -> &'static str {
        self.visual_key
    }

    /// Stat modified by the item.
    #[must_use]
    pub const fn stat(&self) -> StatToChange {
        self.stat
    }

    /// Amount added to the modified stat.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }
}

/// Tunable stats of the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Horizontal movement speed in pixels per second.
    pub speed: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Initial vertical speed of a jump in pixels per second.
    pub jump_speed: f32,
    /// Damage dealt per hit.
    pub damage: f32,
}

impl PlayerStats {
    /// Stats the player starts every run with.
    pub const BASELINE: Self = Self {
        speed: 300.0,
        fire_rate: 1.0,
        max_health: 5.0,
        jump_speed: 725.0,
        damage: 1.0,
    };

    /// Returns the stats after applying the provided item.
    #[must_use]
    pub fn with_item(self, item: &ItemDefinition) -> Self {
        let mut stats = self;
        let amount = item.magnitude();
        match item.stat() {
            StatToChange::None => {}
            StatToChange::Speed => stats.speed += amount,
            StatToChange::FireRate => stats.fire_rate += amount,
            StatToChange::Health => stats.max_health += amount,
            StatToChange::JumpSpeed => stats.jump_speed += amount,
            StatToChange::Damage => stats.damage += amount,
        }
        stats
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::BASELINE
    }
}
