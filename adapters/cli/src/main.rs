#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Cowball run headlessly.
//!
//! An autopilot stands in for the player: it shoots enemies, fights the boss,
//! picks up items and walks through the first exit it finds.

mod manifest;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cowball_core::{Command, Event, RunOutcome, RunState};
use cowball_run::Run;
use cowball_world::query;
use log::info;

use crate::manifest::{Manifest, DEMO_MANIFEST};

const BOSS_HIT: f32 = 25.0;

/// Plays a Cowball run with an autopilot and prints the route it took.
#[derive(Debug, Parser)]
#[command(name = "cowball", version)]
struct Args {
    /// Level manifest to play (defaults to the bundled demo)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Shuffle seed overriding the manifest's
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames to simulate before giving up
    #[arg(long, value_name = "FRAMES", default_value_t = 10_000)]
    max_frames: u64,
}

/// Entry point for the Cowball command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let manifest = match &args.manifest {
        Some(path) => Manifest::load(path)?,
        None => Manifest::parse(DEMO_MANIFEST).context("bundled manifest is invalid")?,
    };
    let mut run = Run::new(
        manifest.config(args.seed),
        manifest.catalog(),
        &manifest.source(),
    )
    .context("failed to start run")?;

    while run.state() != RunState::GameOver && run.frame() < args.max_frames {
        autopilot(&mut run);
        for event in run.drain_events() {
            report(&event);
        }
    }

    let summary = run.summary();
    let route: Vec<&str> = summary.levels.iter().map(|level| level.as_str()).collect();
    println!("route: {}", route.join(" -> "));
    match summary.outcome {
        Some(RunOutcome::Won) => println!("boss defeated after {} frames", summary.frames),
        Some(RunOutcome::Lost) => println!("player killed after {} frames", summary.frames),
        None => println!("gave up after {} frames", summary.frames),
    }
    Ok(())
}

fn autopilot(run: &mut Run) {
    let world = run.world();
    if let Some(enemy) = query::live_enemies(world).first() {
        run.submit(Command::KillEnemy { enemy: *enemy });
    } else if query::boss(world).map_or(false, |boss| !boss.defeated) {
        run.submit(Command::DamageBoss { amount: BOSS_HIT });
    } else if let Some(item) = query::items(world).first() {
        run.submit(Command::CollectItem { item: item.id });
    } else if let Some(exit) = query::exits(world).first() {
        run.submit(Command::ReachExit { exit: exit.id });
    }
    run.tick();
}

fn report(event: &Event) {
    match event {
        Event::LevelLoaded {
            level,
            enemies,
            boss,
            ..
        } => {
            let boss = if *boss { " and the boss" } else { "" };
            println!("entered {level}: {} enemies{boss}", enemies.len());
        }
        Event::ItemCollected { definition, .. } => println!("picked up {}", definition.name()),
        Event::ExitSpawned { level, .. } => info!("exit to {level} opened"),
        Event::ExitReached { level, .. } => println!("heading to {level}"),
        _ => {}
    }
}
