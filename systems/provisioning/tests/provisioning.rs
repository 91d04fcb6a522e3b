use std::sync::Arc;

use cowball_core::{
    CameraBounds, Command, Event, ItemDefinition, LevelId, LevelLayout, LevelSerial, StatToChange,
    Vec2,
};
use cowball_system_provisioning::{ExitBinding, Provisioner};
use cowball_world::{self as world, query, World};

fn layout() -> LevelLayout {
    LevelLayout {
        camera_bounds: Some(CameraBounds::new(0, 640, 0, 480)),
        player_spawn: Some(Vec2::new(8.0, 400.0)),
        item_spawns: vec![Vec2::new(100.0, 300.0), Vec2::new(200.0, 300.0)],
        exit_spawns: vec![Vec2::new(600.0, 400.0), Vec2::new(620.0, 100.0)],
        enemies: Vec::new(),
        boss: None,
    }
}

fn loaded_world(layout: &LevelLayout) -> (World, LevelSerial) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            level: LevelId::new("meadow"),
            content: Arc::new(layout.clone()),
            camera_bounds: CameraBounds::new(0, 640, 0, 480),
            player_spawn: Vec2::new(8.0, 400.0),
        },
        &mut events,
    );
    let serial = query::resident_level(&world).expect("level resident").serial;
    (world, serial)
}

fn binding(name: &str) -> ExitBinding {
    ExitBinding {
        level: LevelId::new(name),
        content: Arc::new(LevelLayout::default()),
    }
}

#[test]
fn items_land_on_spawn_points_in_order() {
    let layout = layout();
    let (mut world, serial) = loaded_world(&layout);
    let mut provisioner = Provisioner::new();
    let mut commands = Vec::new();
    let coffee = ItemDefinition::new("Coffee", "coffee", StatToChange::Speed, 50.0);
    let soylent = ItemDefinition::new("Soylent", "soylent", StatToChange::Health, 1.0);

    let placement = provisioner.provision_items(
        serial,
        &layout,
        |count| {
            assert_eq!(count, 2, "draw sized to the item spawn points");
            vec![coffee, soylent]
        },
        &mut commands,
    );
    assert_eq!(placement.placed, 2);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let items = query::items(&world);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].definition, coffee);
    assert_eq!(items[0].position, Vec2::new(100.0, 300.0));
    assert_eq!(items[1].definition, soylent);
    assert_eq!(items[1].position, Vec2::new(200.0, 300.0));
}

#[test]
fn repeated_provisioning_does_not_double_spawn() {
    let layout = layout();
    let (_, serial) = loaded_world(&layout);
    let mut provisioner = Provisioner::new();
    let mut commands = Vec::new();
    let mut draws_requested = 0;

    for _ in 0..3 {
        let _ = provisioner.provision_exits(
            serial,
            &layout,
            |count| {
                draws_requested += 1;
                (0..count).map(|index| binding(&format!("l{index}"))).collect()
            },
            &mut commands,
        );
    }

    assert_eq!(draws_requested, 1, "pool is only drawn from once");
    assert_eq!(commands.len(), 2);
}

#[test]
fn exits_carry_their_bindings() {
    let layout = layout();
    let (mut world, serial) = loaded_world(&layout);
    let mut events = Vec::new();
    world::apply(&mut world, Command::DeclareLevelCleared { serial }, &mut events);

    let mut provisioner = Provisioner::new();
    let mut commands = Vec::new();
    let _ = provisioner.provision_exits(
        serial,
        &layout,
        |_| vec![binding("sewers"), binding("boss")],
        &mut commands,
    );
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let exits = query::exits(&world);
    assert_eq!(exits.len(), 2);
    assert_eq!(exits[0].level, LevelId::new("sewers"));
    assert_eq!(exits[0].position, Vec2::new(600.0, 400.0));
    assert_eq!(exits[1].level, LevelId::new("boss"));
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::ExitSpawned { .. }))
            .count(),
        2
    );
}

#[test]
fn exit_draw_shortfall_leaves_points_unfilled() {
    let layout = layout();
    let (mut world, serial) = loaded_world(&layout);
    let mut events = Vec::new();
    world::apply(&mut world, Command::DeclareLevelCleared { serial }, &mut events);

    let mut provisioner = Provisioner::new();
    let mut commands = Vec::new();
    let placement =
        provisioner.provision_exits(serial, &layout, |_| vec![binding("sewers")], &mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(placement.placed, 1);
    assert_eq!(query::exits(&world).len(), 1);
}
