#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run controller that drives a Cowball run from the first level to the boss.
//!
//! A [`Run`] owns the world, the content pool and every progression system.
//! Collaborators report entity notifications by submitting commands; each
//! [`Run::tick`] loads staged content, applies the submitted commands, lets
//! the systems react until the frame settles and finally closes the frame.

mod catalog;
mod config;
mod error;
mod machine;

use std::mem;

use cowball_core::{
    Command, Event, ExitId, LevelContent, LevelId, LevelSerial, RunOutcome, RunState,
    TransitionError,
};
use cowball_system_boss_gate::BossGate;
use cowball_system_clear_tracker::ClearTracker;
use cowball_system_content_pool::{ContentPool, ItemCatalog};
use cowball_system_provisioning::{ExitBinding, Provisioner};
use cowball_world::{self as world, query, World};
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use crate::{
    catalog::{LevelCatalog, LevelSource, StaticLevelSource},
    config::RunConfig,
    error::RunError,
};
use crate::{catalog::LevelLibrary, machine::RunStateMachine};

/// Where every regular level of the catalog currently lives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelLedger {
    /// Levels available for future draws, in consumption order.
    pub available: Vec<LevelId>,
    /// Levels bound to exits of the resident level.
    pub in_flight: Vec<LevelId>,
    /// Level currently resident in the world.
    pub current: Option<LevelId>,
    /// Level staged for the next load.
    pub pending: Option<LevelId>,
    /// Levels the run already left behind.
    pub visited: Vec<LevelId>,
}

impl LevelLedger {
    /// Every accounted level other than `boss`, sorted.
    #[must_use]
    pub fn regular_levels(&self, boss: &LevelId) -> Vec<LevelId> {
        let mut levels: Vec<LevelId> = self
            .available
            .iter()
            .chain(&self.in_flight)
            .chain(self.current.iter())
            .chain(self.pending.iter())
            .chain(&self.visited)
            .filter(|level| *level != boss)
            .cloned()
            .collect();
        levels.sort();
        levels
    }
}

/// End-of-run report shown by menus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Outcome, once the run is over.
    pub outcome: Option<RunOutcome>,
    /// Levels loaded since the run started, in order.
    pub levels: Vec<LevelId>,
    /// Frames ticked so far.
    pub frames: u64,
}

/// Single run of the game and the systems that drive it.
#[derive(Debug)]
pub struct Run {
    catalog: LevelCatalog,
    library: LevelLibrary,
    items: ItemCatalog,
    rng: ChaCha8Rng,
    world: World,
    pool: ContentPool,
    provisioner: Provisioner,
    tracker: ClearTracker,
    boss_gate: BossGate,
    machine: RunStateMachine,
    inbox: Vec<Command>,
    journal: Vec<Event>,
    route: Vec<LevelId>,
    current: Option<LevelId>,
    frame: u64,
}

impl Run {
    /// Starts a run, preloading and validating every level of the catalog.
    ///
    /// The first level is drawn immediately and loaded by the first
    /// [`Run::tick`].
    pub fn new<S>(config: RunConfig, catalog: LevelCatalog, source: &S) -> Result<Self, RunError>
    where
        S: LevelSource + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed());
        let mut pool = ContentPool::initialize(
            catalog.levels().iter().cloned(),
            catalog.boss().clone(),
            &mut rng,
        )?;
        let library = LevelLibrary::load(&catalog, source, config.viewport())?;
        let first = first_level(&mut pool);
        info!(
            "starting run with {} levels; first level {first}",
            catalog.levels().len()
        );

        let mut world = World::new();
        let mut journal = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureHealth {
                player_max_health: config.player_max_health(),
                boss_max_health: config.boss_max_health(),
            },
            &mut journal,
        );

        Ok(Self {
            catalog,
            library,
            items: ItemCatalog::standard(),
            rng,
            world,
            pool,
            provisioner: Provisioner::new(),
            tracker: ClearTracker::new(),
            boss_gate: BossGate::new(),
            machine: RunStateMachine::new(first),
            inbox: Vec::new(),
            journal,
            route: Vec::new(),
            current: None,
            frame: 0,
        })
    }

    /// Queues a collaborator notification for the next [`Run::tick`].
    pub fn submit(&mut self, command: Command) {
        self.inbox.push(command);
    }

    /// Advances the run by one frame.
    ///
    /// Staged content is loaded first, then queued commands are applied and
    /// reacted to until no system has anything left to say. Levels retired
    /// during the frame are destroyed when it closes.
    pub fn tick(&mut self) {
        self.frame += 1;

        if self.machine.state() == RunState::LoadingLevel {
            self.load_pending();
        }

        let inbox = mem::take(&mut self.inbox);
        if self.machine.state() == RunState::GameOver {
            if !inbox.is_empty() {
                debug!("run is over; dropping {} commands", inbox.len());
            }
        } else {
            self.process(inbox);
        }

        self.process(vec![Command::EndFrame]);
    }

    /// Leaves the resident level through `exit`.
    ///
    /// The levels bound to the sibling exits return to the pool, the resident
    /// level is retired and the chosen level is staged for the next tick.
    pub fn request_transition(&mut self, exit: ExitId) -> Result<(), TransitionError> {
        let mut commands = Vec::new();
        self.begin_transition(exit, &mut commands)?;
        self.process(commands);
        Ok(())
    }

    /// Ends the run as lost. Returns `false` when the run was already over.
    pub fn on_player_killed(&mut self) -> bool {
        self.machine.end(RunOutcome::Lost)
    }

    /// Ends the run as won. Returns `false` when the run was already over.
    pub fn on_boss_defeated(&mut self) -> bool {
        self.machine.end(RunOutcome::Won)
    }

    /// Suspends or resumes gameplay entities without touching the run state.
    pub fn set_paused(&mut self, paused: bool) {
        self.process(vec![Command::SetPaused { paused }]);
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.is_paused();
        self.set_paused(paused);
        paused
    }

    /// Reports whether gameplay entities are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        query::is_paused(&self.world)
    }

    /// Starts over after the run ended, reshuffling the whole catalog.
    ///
    /// Returns `Ok(false)` without side effects while the run is still going.
    pub fn restart(&mut self) -> Result<bool, RunError> {
        if self.machine.state() != RunState::GameOver {
            return Ok(false);
        }

        let mut pool = ContentPool::initialize(
            self.catalog.levels().iter().cloned(),
            self.catalog.boss().clone(),
            &mut self.rng,
        )?;
        let first = first_level(&mut pool);
        self.pool = pool;
        self.route.clear();
        self.current = None;
        self.process(vec![
            Command::RetireLevel,
            Command::SetPaused { paused: false },
            Command::ResetPlayer,
        ]);
        info!("restarting run; first level {first}");
        let _ = self.machine.restart(first);
        Ok(true)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.machine.state()
    }

    /// Outcome, once the run is over.
    #[must_use]
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.machine.outcome()
    }

    /// Scene state, for queries through [`cowball_world::query`].
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Content pool feeding exits.
    #[must_use]
    pub fn pool(&self) -> &ContentPool {
        &self.pool
    }

    /// Catalog the run was started with.
    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Number of frames ticked so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Events recorded since the last drain, in emission order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.journal
    }

    /// Removes and returns the recorded events.
    pub fn drain_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.journal)
    }

    /// Snapshot of where every level of the catalog currently lives.
    #[must_use]
    pub fn ledger(&self) -> LevelLedger {
        let visited = self
            .route
            .len()
            .saturating_sub(usize::from(self.current.is_some()));
        LevelLedger {
            available: self.pool.iter().cloned().collect(),
            in_flight: query::exits(&self.world)
                .into_iter()
                .map(|exit| exit.level)
                .collect(),
            current: self.current.clone(),
            pending: self.machine.pending().cloned(),
            visited: self.route[..visited].to_vec(),
        }
    }

    /// Progress report for menus.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            outcome: self.machine.outcome(),
            levels: self.route.clone(),
            frames: self.frame,
        }
    }

    fn load_pending(&mut self) {
        let Some(level) = self.machine.take_pending() else {
            let _ = self.machine.finish_loading();
            return;
        };
        let Some(resolved) = self.library.get(&level) else {
            error!("level {level} is missing from the preloaded library");
            return;
        };
        let command = Command::LoadLevel {
            level: level.clone(),
            content: resolved.content.clone(),
            camera_bounds: resolved.camera_bounds,
            player_spawn: resolved.player_spawn,
        };

        info!("loading level {level}");
        self.current = Some(level.clone());
        self.route.push(level);
        self.process(vec![command]);
        let _ = self.machine.finish_loading();
    }

    fn process(&mut self, mut commands: Vec<Command>) {
        let mut events = Vec::new();
        while !commands.is_empty() {
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.react(&events, &mut commands);
            self.journal.append(&mut events);
        }
    }

    fn react(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelLoaded { serial, .. } => self.provision_items(*serial, out),
                Event::LevelCleared { serial } => self.provision_exits(*serial, out),
                Event::ExitReached { exit, level } => {
                    if let Err(reason) = self.begin_transition(*exit, out) {
                        warn!("ignoring exit to {level}: {reason}");
                    }
                }
                Event::ExitRejected { exit, reason } => debug!("exit {exit:?} rejected: {reason}"),
                Event::PlayerKilled => {
                    let _ = self.on_player_killed();
                }
                _ => {}
            }
        }

        self.tracker.handle(events, out);
        if let Some(outcome) = self.boss_gate.handle(events) {
            let _ = self.machine.end(outcome);
        }
    }

    fn resident_content(&self, serial: LevelSerial) -> Option<LevelContent> {
        let resident = query::resident_level(&self.world)?;
        if resident.serial != serial {
            debug!("level {serial:?} is no longer resident");
            return None;
        }
        query::resident_content(&self.world).cloned()
    }

    fn provision_items(&mut self, serial: LevelSerial, out: &mut Vec<Command>) {
        let Some(content) = self.resident_content(serial) else {
            return;
        };
        let items = &self.items;
        let rng = &mut self.rng;
        let placement = self.provisioner.provision_items(
            serial,
            &content,
            |count| items.shuffled_draws(count, rng),
            out,
        );
        debug!("placed {} items in {serial:?}", placement.placed);
    }

    fn provision_exits(&mut self, serial: LevelSerial, out: &mut Vec<Command>) {
        let Some(content) = self.resident_content(serial) else {
            return;
        };
        let pool = &mut self.pool;
        let library = &self.library;
        let placement = self.provisioner.provision_exits(
            serial,
            &content,
            |count| {
                let mut bindings = Vec::with_capacity(count);
                for level in pool.draw(count).into_levels() {
                    match library.get(&level) {
                        Some(resolved) => bindings.push(ExitBinding {
                            content: resolved.content.clone(),
                            level,
                        }),
                        None => error!("level {level} is missing from the preloaded library"),
                    }
                }
                bindings
            },
            out,
        );

        let restored = self
            .pool
            .restore(placement.leftover.into_iter().map(|binding| binding.level));
        debug!(
            "placed {} exits in {serial:?}; restored {restored} unused draws",
            placement.placed
        );
    }

    fn begin_transition(
        &mut self,
        exit: ExitId,
        out: &mut Vec<Command>,
    ) -> Result<(), TransitionError> {
        if self.machine.state() != RunState::Playing {
            return Err(TransitionError::NotPlaying);
        }
        let exits = query::exits(&self.world);
        let chosen = exits
            .iter()
            .find(|candidate| candidate.id == exit)
            .ok_or(TransitionError::UnknownExit)?;

        let restored = self.pool.restore(
            exits
                .iter()
                .filter(|sibling| sibling.id != exit)
                .map(|sibling| sibling.level.clone()),
        );
        if !self.machine.stage(chosen.level.clone()) {
            return Err(TransitionError::NotPlaying);
        }
        info!(
            "leaving for {} through {exit:?}; returned {restored} sibling levels",
            chosen.level
        );
        self.current = None;
        out.push(Command::RetireLevel);
        Ok(())
    }
}

fn first_level(pool: &mut ContentPool) -> LevelId {
    pool.draw(1)
        .into_levels()
        .pop()
        .unwrap_or_else(|| pool.fallback().clone())
}
