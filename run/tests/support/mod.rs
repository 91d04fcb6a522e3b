#![allow(dead_code)]

use cowball_core::{CameraBounds, Command, LevelId, LevelLayout, Vec2};
use cowball_run::{LevelCatalog, Run, RunConfig, StaticLevelSource};
use cowball_world::query;

pub const REGULAR: [&str; 3] = ["L1", "L2", "L3"];
pub const BOSS: &str = "LB";

pub fn layout(enemies: usize, exits: usize, items: usize) -> LevelLayout {
    LevelLayout {
        camera_bounds: Some(CameraBounds::new(0, 1600, 0, 900)),
        player_spawn: Some(Vec2::new(32.0, 800.0)),
        item_spawns: (0..items)
            .map(|index| Vec2::new(100.0 + 50.0 * index as f32, 700.0))
            .collect(),
        exit_spawns: (0..exits)
            .map(|index| Vec2::new(1400.0, 200.0 + 300.0 * index as f32))
            .collect(),
        enemies: (0..enemies)
            .map(|index| Vec2::new(400.0 + 40.0 * index as f32, 800.0))
            .collect(),
        boss: None,
    }
}

pub fn boss_layout() -> LevelLayout {
    LevelLayout {
        boss: Some(Vec2::new(800.0, 400.0)),
        ..layout(0, 0, 0)
    }
}

pub fn catalog() -> LevelCatalog {
    LevelCatalog::new(REGULAR.iter().map(|name| LevelId::new(*name)), LevelId::new(BOSS))
}

pub fn source(enemies: usize, exits: usize) -> StaticLevelSource {
    REGULAR
        .iter()
        .map(|name| (LevelId::new(*name), layout(enemies, exits, 1)))
        .chain(std::iter::once((LevelId::new(BOSS), boss_layout())))
        .collect()
}

pub fn start(seed: u64, enemies: usize, exits: usize) -> Run {
    Run::new(RunConfig::new(seed), catalog(), &source(enemies, exits)).expect("run starts")
}

pub fn regular_sorted() -> Vec<LevelId> {
    let mut levels: Vec<LevelId> = REGULAR.iter().map(|name| LevelId::new(*name)).collect();
    levels.sort();
    levels
}

pub fn resident(run: &Run) -> LevelId {
    query::resident_level(run.world())
        .expect("a level is resident")
        .level
}

pub fn exit_levels(run: &Run) -> Vec<LevelId> {
    let mut levels: Vec<LevelId> = query::exits(run.world())
        .into_iter()
        .map(|exit| exit.level)
        .collect();
    levels.sort();
    levels
}

/// Plays one frame the way a player heading for the boss would.
pub fn autopilot(run: &mut Run) {
    let world = run.world();
    let live = query::live_enemies(world);
    if !live.is_empty() {
        for enemy in live {
            run.submit(Command::KillEnemy { enemy });
        }
    } else if query::boss(world).map_or(false, |boss| !boss.defeated) {
        run.submit(Command::DamageBoss { amount: 25.0 });
    } else if let Some(exit) = query::exits(world).first() {
        run.submit(Command::ReachExit { exit: exit.id });
    }
    run.tick();
}
