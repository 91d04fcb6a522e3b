mod support;

use std::collections::BTreeSet;

use cowball_core::{CameraBounds, Command, Event, LevelId, LevelLayout, RunOutcome, RunState};
use cowball_run::{LevelCatalog, Run, RunConfig, RunError, StaticLevelSource};
use cowball_world::query;

use support::{boss_layout, catalog, layout, regular_sorted, resident, source, start, BOSS};

#[test]
fn empty_catalog_aborts_start() {
    let catalog = LevelCatalog::new(vec![LevelId::new(BOSS)], LevelId::new(BOSS));
    let source = StaticLevelSource::new().with_level(LevelId::new(BOSS), boss_layout());

    let error = Run::new(RunConfig::new(0), catalog, &source).expect_err("no playable levels");
    assert!(matches!(error, RunError::Pool(_)));
}

#[test]
fn level_without_player_spawn_aborts_start() {
    let mut source = source(0, 2);
    source.insert(
        LevelId::new("L2"),
        LevelLayout {
            player_spawn: None,
            ..layout(0, 2, 1)
        },
    );

    let error = Run::new(RunConfig::new(0), catalog(), &source).expect_err("spawn missing");
    assert_eq!(
        error,
        RunError::MissingPlayerSpawn {
            level: LevelId::new("L2")
        }
    );
}

#[test]
fn level_missing_from_source_aborts_start() {
    let source: StaticLevelSource = ["L1", "L2", "L3"]
        .iter()
        .map(|name| (LevelId::new(*name), layout(0, 2, 1)))
        .collect();

    let error = Run::new(RunConfig::new(0), catalog(), &source).expect_err("boss missing");
    assert_eq!(
        error,
        RunError::UnknownLevel {
            level: LevelId::new(BOSS)
        }
    );
}

#[test]
fn levels_without_camera_bounds_use_the_viewport() {
    let viewport = CameraBounds::new(0, 640, 0, 360);
    let source: StaticLevelSource = ["L1", "L2", "L3"]
        .iter()
        .map(|name| {
            (
                LevelId::new(*name),
                LevelLayout {
                    camera_bounds: None,
                    ..layout(0, 2, 1)
                },
            )
        })
        .chain(std::iter::once((LevelId::new(BOSS), boss_layout())))
        .collect();
    let mut run = Run::new(
        RunConfig::new(1).with_viewport(viewport),
        catalog(),
        &source,
    )
    .expect("run starts");

    run.tick();

    assert_eq!(query::player(run.world()).camera_bounds, Some(viewport));
    assert!(run.events().iter().any(|event| matches!(
        event,
        Event::PlayerPlaced { camera_bounds, .. } if *camera_bounds == viewport
    )));
}

#[test]
fn items_fill_every_item_spawn_without_repeats() {
    let source: StaticLevelSource = ["L1", "L2", "L3"]
        .iter()
        .map(|name| (LevelId::new(*name), layout(1, 2, 4)))
        .chain(std::iter::once((LevelId::new(BOSS), boss_layout())))
        .collect();
    let mut run = Run::new(RunConfig::new(9), catalog(), &source).expect("run starts");

    run.tick();

    let items = query::items(run.world());
    assert_eq!(items.len(), 4);
    let names: BTreeSet<&str> = items.iter().map(|item| item.definition.name()).collect();
    assert_eq!(names.len(), 4);
}

#[test]
fn collected_items_change_player_stats() {
    let mut run = start(2, 1, 2);
    run.tick();
    let item = query::items(run.world())[0];

    run.submit(Command::CollectItem { item: item.id });
    run.tick();

    assert!(query::items(run.world()).is_empty());
    let expected = cowball_core::PlayerStats::default().with_item(&item.definition);
    assert_eq!(query::player(run.world()).stats, expected);
}

#[test]
fn pause_suspends_enemies_but_not_the_run() {
    let mut run = start(4, 1, 2);
    run.tick();
    let enemy = query::live_enemies(run.world())[0];

    run.set_paused(true);
    run.submit(Command::KillEnemy { enemy });
    run.tick();
    assert!(run.is_paused());
    assert_eq!(run.state(), RunState::Playing);
    assert_eq!(query::live_enemies(run.world()), vec![enemy]);

    assert!(!run.toggle_pause());
    run.submit(Command::KillEnemy { enemy });
    run.tick();
    assert_eq!(query::exits(run.world()).len(), 2);
}

#[test]
fn paused_run_still_loads_a_staged_level() {
    let mut run = start(6, 0, 2);
    run.tick();
    let exit = query::exits(run.world())[0].clone();

    run.request_transition(exit.id).expect("transition accepted");
    run.set_paused(true);
    run.tick();

    assert_eq!(run.state(), RunState::Playing);
    assert_eq!(resident(&run), exit.level);
    assert!(run.is_paused());
}

#[test]
fn lethal_damage_loses_the_run() {
    let mut run = start(8, 2, 2);
    run.tick();

    run.submit(Command::HurtPlayer { amount: 2.0 });
    run.tick();
    assert_eq!(run.state(), RunState::Playing);
    assert_eq!(query::player(run.world()).health, 3.0);

    run.submit(Command::HurtPlayer { amount: 3.0 });
    run.tick();
    assert_eq!(run.state(), RunState::GameOver);
    assert_eq!(run.outcome(), Some(RunOutcome::Lost));

    let enemy = query::live_enemies(run.world())[0];
    run.submit(Command::KillEnemy { enemy });
    run.tick();
    assert_eq!(query::live_enemies(run.world()).len(), 2, "game over ignores gameplay");
}

#[test]
fn player_killed_while_loading_ends_the_run() {
    let mut run = start(10, 0, 2);
    let staged = run.ledger().pending.expect("first level staged");

    assert!(run.on_player_killed());
    assert!(!run.on_boss_defeated(), "first outcome sticks");
    run.tick();

    assert_eq!(run.state(), RunState::GameOver);
    assert_eq!(run.outcome(), Some(RunOutcome::Lost));
    assert!(query::resident_level(run.world()).is_none());
    assert_eq!(run.ledger().pending, Some(staged));
    assert_eq!(
        run.ledger().regular_levels(&LevelId::new(BOSS)),
        regular_sorted()
    );
}

#[test]
fn boss_defeat_is_reported_once() {
    let catalog = LevelCatalog::new(vec![LevelId::new("L1")], LevelId::new(BOSS));
    let source = StaticLevelSource::new()
        .with_level(LevelId::new("L1"), layout(0, 2, 0))
        .with_level(LevelId::new(BOSS), boss_layout());
    let mut run = Run::new(
        RunConfig::new(0).with_boss_max_health(40.0),
        catalog,
        &source,
    )
    .expect("run starts");
    run.tick();
    assert_eq!(exit_targets(&run), vec![LevelId::new(BOSS), LevelId::new(BOSS)]);

    let exit = query::exits(run.world())[0].id;
    run.submit(Command::ReachExit { exit });
    run.tick();
    run.tick();
    assert_eq!(resident(&run), LevelId::new(BOSS));
    assert_eq!(query::boss_health_percent(run.world()), Some(100.0));

    run.submit(Command::DamageBoss { amount: 30.0 });
    run.tick();
    assert_eq!(query::boss_health_percent(run.world()), Some(25.0));
    assert_eq!(run.state(), RunState::Playing);

    run.submit(Command::DamageBoss { amount: 30.0 });
    run.submit(Command::DamageBoss { amount: 30.0 });
    run.tick();
    assert_eq!(run.outcome(), Some(RunOutcome::Won));
    assert_eq!(
        run.events()
            .iter()
            .filter(|event| matches!(event, Event::BossDefeated { .. }))
            .count(),
        1
    );
}

fn exit_targets(run: &Run) -> Vec<LevelId> {
    query::exits(run.world())
        .into_iter()
        .map(|exit| exit.level)
        .collect()
}

#[test]
fn restart_reshuffles_and_resets_the_player() {
    let mut run = start(12, 1, 2);
    assert_eq!(run.restart(), Ok(false), "restart needs a finished run");

    run.tick();
    run.submit(Command::KillPlayer);
    run.tick();
    assert_eq!(run.state(), RunState::GameOver);

    assert_eq!(run.restart(), Ok(true));
    assert_eq!(run.state(), RunState::LoadingLevel);
    assert!(query::resident_level(run.world()).is_none());
    run.tick();

    assert_eq!(run.state(), RunState::Playing);
    assert_eq!(run.outcome(), None);
    assert_eq!(run.summary().levels.len(), 1);
    let player = query::player(run.world());
    assert!(!player.killed);
    assert_eq!(player.health, 5.0);
    assert_eq!(
        run.ledger().regular_levels(&LevelId::new(BOSS)),
        regular_sorted()
    );
}
