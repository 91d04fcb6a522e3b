#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative scene state for a Cowball run.
//!
//! The world owns the resident level, every entity spawned into it and the
//! player collaborator. Destruction is deferred: a retired level stays
//! queryable until [`Command::EndFrame`] closes the frame.

mod level;
mod player;

use std::collections::BTreeMap;

use cowball_core::{Command, Event, TransitionError};
use log::{debug, warn};

use crate::{
    level::{BossState, EnemyState, ExitState, IdAllocator, ItemState, LevelInstance},
    player::{Hurt, Player},
};

const DEFAULT_PLAYER_MAX_HEALTH: f32 = 5.0;
const DEFAULT_BOSS_MAX_HEALTH: f32 = 100.0;

/// Represents the authoritative Cowball scene.
#[derive(Debug)]
pub struct World {
    resident: Option<LevelInstance>,
    retiring: Vec<LevelInstance>,
    player: Player,
    boss_max_health: f32,
    paused: bool,
    ids: IdAllocator,
}

impl World {
    /// Creates an empty world with default health pools.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resident: None,
            retiring: Vec::new(),
            player: Player::new(DEFAULT_PLAYER_MAX_HEALTH),
            boss_max_health: DEFAULT_BOSS_MAX_HEALTH,
            paused: false,
            ids: IdAllocator::default(),
        }
    }

    fn retire_resident(&mut self, out_events: &mut Vec<Event>) {
        if let Some(level) = self.resident.take() {
            out_events.push(Event::LevelRetired {
                serial: level.serial,
                level: level.level.clone(),
            });
            self.retiring.push(level);
        }
    }

    fn live_level_mut(&mut self) -> Option<&mut LevelInstance> {
        self.resident.as_mut()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.paused && suspended_while_paused(&command) {
        debug!("dropping {command:?} while paused");
        return;
    }

    match command {
        Command::ConfigureHealth {
            player_max_health,
            boss_max_health,
        } => {
            world.player.configure(player_max_health);
            world.boss_max_health = boss_max_health;
        }
        Command::LoadLevel {
            level,
            content,
            camera_bounds,
            player_spawn,
        } => {
            world.retire_resident(out_events);

            let serial = world.ids.serial();
            let mut enemies = BTreeMap::new();
            for position in &content.enemies {
                let _ = enemies.insert(
                    world.ids.enemy(),
                    EnemyState {
                        position: *position,
                        alive: true,
                    },
                );
            }
            let boss = content.boss.map(|position| BossState {
                position,
                health: world.boss_max_health,
                max_health: world.boss_max_health,
                defeated: false,
            });

            world.player.place(player_spawn, camera_bounds);
            out_events.push(Event::PlayerPlaced {
                position: player_spawn,
                camera_bounds,
            });
            out_events.push(Event::LevelLoaded {
                serial,
                level: level.clone(),
                enemies: enemies.keys().copied().collect(),
                boss: boss.is_some(),
            });

            world.resident = Some(LevelInstance {
                serial,
                level,
                content,
                camera_bounds,
                enemies,
                boss,
                items: BTreeMap::new(),
                exits: BTreeMap::new(),
                cleared: false,
            });
        }
        Command::SpawnItem { position, item } => {
            let id = world.ids.item();
            let Some(level) = world.live_level_mut() else {
                warn!("no resident level to place {} into", item.name());
                return;
            };
            let _ = level.items.insert(
                id,
                ItemState {
                    position,
                    definition: item,
                },
            );
            out_events.push(Event::ItemSpawned {
                item: id,
                definition: item,
                position,
            });
        }
        Command::SpawnExit {
            position,
            level: destination,
            content,
        } => {
            let id = world.ids.exit();
            let Some(level) = world.live_level_mut() else {
                warn!("no resident level to place the exit to {destination} into");
                return;
            };
            if !level.cleared {
                warn!(
                    "refusing exit to {destination}: level {} is not cleared",
                    level.level
                );
                return;
            }
            let _ = level.exits.insert(
                id,
                ExitState {
                    position,
                    level: destination.clone(),
                    content,
                },
            );
            out_events.push(Event::ExitSpawned {
                exit: id,
                level: destination,
                position,
            });
        }
        Command::DeclareLevelCleared { serial } => {
            let Some(level) = world.live_level_mut() else {
                return;
            };
            if level.serial != serial || level.cleared {
                debug!("ignoring redundant clear declaration for {serial:?}");
                return;
            }
            if level.live_enemies().next().is_some() {
                warn!("ignoring clear declaration for {serial:?}: enemies remain");
                return;
            }
            level.cleared = true;
            out_events.push(Event::LevelCleared { serial });
        }
        Command::KillEnemy { enemy } => {
            if let Some(level) = world.live_level_mut() {
                if level.kill_enemy(enemy) {
                    out_events.push(Event::EnemyDied {
                        enemy,
                        serial: level.serial,
                    });
                }
            }
        }
        Command::DamageBoss { amount } => {
            if let Some(level) = world.live_level_mut() {
                if level.damage_boss(amount) {
                    out_events.push(Event::BossDefeated {
                        serial: level.serial,
                    });
                }
            }
        }
        Command::HurtPlayer { amount } => match world.player.hurt(amount) {
            Hurt::Ignored => {}
            Hurt::Wounded(health) => out_events.push(Event::PlayerHurt { health }),
            Hurt::Killed => {
                out_events.push(Event::PlayerHurt { health: 0.0 });
                out_events.push(Event::PlayerKilled);
            }
        },
        Command::HealPlayer => {
            if let Some(health) = world.player.heal() {
                out_events.push(Event::PlayerHealed { health });
            }
        }
        Command::KillPlayer => {
            if world.player.kill() {
                out_events.push(Event::PlayerKilled);
            }
        }
        Command::ResetPlayer => {
            world.player.reset();
            out_events.push(Event::PlayerReset);
        }
        Command::CollectItem { item } => {
            let Some(level) = world.resident.as_mut() else {
                return;
            };
            let Some(state) = level.items.remove(&item) else {
                return;
            };
            let stats = world.player.apply_item(&state.definition);
            out_events.push(Event::ItemCollected {
                item,
                definition: state.definition,
            });
            out_events.push(Event::PlayerStatsChanged { stats });
        }
        Command::ReachExit { exit } => {
            let destination = world
                .resident
                .as_ref()
                .and_then(|level| level.exits.get(&exit))
                .map(|state| state.level.clone());
            match destination {
                Some(level) => out_events.push(Event::ExitReached { exit, level }),
                None => out_events.push(Event::ExitRejected {
                    exit,
                    reason: TransitionError::UnknownExit,
                }),
            }
        }
        Command::RetireLevel => world.retire_resident(out_events),
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PauseChanged { paused });
            }
        }
        Command::EndFrame => {
            if let Some(level) = world.resident.as_mut() {
                level.purge_dead();
            }
            for level in world.retiring.drain(..) {
                out_events.push(Event::LevelDestroyed {
                    serial: level.serial,
                    level: level.level,
                });
            }
        }
    }
}

fn suspended_while_paused(command: &Command) -> bool {
    matches!(
        command,
        Command::KillEnemy { .. }
            | Command::DamageBoss { .. }
            | Command::HurtPlayer { .. }
            | Command::KillPlayer
            | Command::CollectItem { .. }
            | Command::ReachExit { .. }
    )
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cowball_core::{
        CameraBounds, EnemyId, ExitId, ItemDefinition, ItemId, LevelContent, LevelId,
        LevelSerial, PlayerStats, Vec2,
    };

    use super::World;

    /// Summary of the level currently resident in the world.
    #[derive(Clone, Debug, PartialEq)]
    pub struct ResidentLevel {
        /// Instance serial of the level.
        pub serial: LevelSerial,
        /// Identifier of the level.
        pub level: LevelId,
        /// Camera bounds applied while the level is resident.
        pub camera_bounds: CameraBounds,
        /// Indicates whether the level has been declared cleared.
        pub cleared: bool,
    }

    /// Immutable representation of a regular enemy.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Identifier of the enemy.
        pub id: EnemyId,
        /// Position the enemy was spawned at.
        pub position: Vec2,
        /// `false` while the enemy plays its death animation.
        pub alive: bool,
    }

    /// Immutable representation of the boss of the resident level.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BossSnapshot {
        /// Position the boss was spawned at.
        pub position: Vec2,
        /// Remaining health.
        pub health: f32,
        /// Health the boss started with.
        pub max_health: f32,
        /// Indicates whether the boss was defeated.
        pub defeated: bool,
    }

    /// Immutable representation of a spawned item.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ItemSnapshot {
        /// Identifier of the item.
        pub id: ItemId,
        /// Coordinate the item sits at.
        pub position: Vec2,
        /// Definition the item carries.
        pub definition: ItemDefinition,
    }

    /// Immutable representation of a spawned exit.
    #[derive(Clone, Debug, PartialEq)]
    pub struct ExitSnapshot {
        /// Identifier of the exit.
        pub id: ExitId,
        /// Coordinate the exit sits at.
        pub position: Vec2,
        /// Level the exit leads to.
        pub level: LevelId,
        /// Preloaded content of the destination level.
        pub content: LevelContent,
    }

    /// Immutable representation of the player collaborator.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Current position.
        pub position: Vec2,
        /// Camera bounds applied by the last level load.
        pub camera_bounds: Option<CameraBounds>,
        /// Remaining health.
        pub health: f32,
        /// Current stats.
        pub stats: PlayerStats,
        /// Indicates whether the player was killed.
        pub killed: bool,
    }

    /// Summarises the resident level, if any.
    #[must_use]
    pub fn resident_level(world: &World) -> Option<ResidentLevel> {
        world.resident.as_ref().map(|level| ResidentLevel {
            serial: level.serial,
            level: level.level.clone(),
            camera_bounds: level.camera_bounds,
            cleared: level.cleared,
        })
    }

    /// Content of the resident level, if any.
    #[must_use]
    pub fn resident_content(world: &World) -> Option<&LevelContent> {
        world.resident.as_ref().map(|level| &level.content)
    }

    /// Reports whether a level instance is still present, including levels retired this frame.
    #[must_use]
    pub fn level_present(world: &World, serial: LevelSerial) -> bool {
        world
            .resident
            .iter()
            .chain(world.retiring.iter())
            .any(|level| level.serial == serial)
    }

    /// Enumerates every enemy of the resident level, including dying ones.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world
            .resident
            .as_ref()
            .map(|level| {
                level
                    .enemies
                    .iter()
                    .map(|(id, enemy)| EnemySnapshot {
                        id: *id,
                        position: enemy.position,
                        alive: enemy.alive,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Enumerates the enemies of the resident level that are still alive.
    #[must_use]
    pub fn live_enemies(world: &World) -> Vec<EnemyId> {
        world
            .resident
            .as_ref()
            .map(|level| level.live_enemies().collect())
            .unwrap_or_default()
    }

    /// Captures the boss of the resident level, if it hosts one.
    #[must_use]
    pub fn boss(world: &World) -> Option<BossSnapshot> {
        world
            .resident
            .as_ref()
            .and_then(|level| level.boss)
            .map(|boss| BossSnapshot {
                position: boss.position,
                health: boss.health,
                max_health: boss.max_health,
                defeated: boss.defeated,
            })
    }

    /// Boss health as a percentage in `0.0..=100.0`, for health bars.
    #[must_use]
    pub fn boss_health_percent(world: &World) -> Option<f32> {
        boss(world).map(|boss| {
            if boss.max_health <= 0.0 {
                0.0
            } else {
                boss.health / boss.max_health * 100.0
            }
        })
    }

    /// Enumerates the items of the resident level in spawn order.
    #[must_use]
    pub fn items(world: &World) -> Vec<ItemSnapshot> {
        world
            .resident
            .as_ref()
            .map(|level| {
                level
                    .items
                    .iter()
                    .map(|(id, item)| ItemSnapshot {
                        id: *id,
                        position: item.position,
                        definition: item.definition,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Enumerates the exits of the resident level in spawn order.
    #[must_use]
    pub fn exits(world: &World) -> Vec<ExitSnapshot> {
        world
            .resident
            .as_ref()
            .map(|level| {
                level
                    .exits
                    .iter()
                    .map(|(id, exit)| ExitSnapshot {
                        id: *id,
                        position: exit.position,
                        level: exit.level.clone(),
                        content: exit.content.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Captures the player collaborator.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            camera_bounds: world.player.camera_bounds,
            health: world.player.health,
            stats: world.player.stats,
            killed: world.player.killed,
        }
    }

    /// Reports whether gameplay entities are suspended.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }
}
