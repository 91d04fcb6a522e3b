//! Level instances and the entities they own.

use std::collections::BTreeMap;

use cowball_core::{
    CameraBounds, EnemyId, ExitId, ItemDefinition, ItemId, LevelContent, LevelId, LevelSerial,
    Vec2,
};

/// Regular enemy tracked by its owning level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EnemyState {
    pub(crate) position: Vec2,
    pub(crate) alive: bool,
}

/// Boss hosted by a level.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BossState {
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) defeated: bool,
}

impl BossState {
    /// Returns `true` when this hit defeated the boss.
    fn take_damage(&mut self, amount: f32) -> bool {
        if self.defeated {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.defeated = true;
            return true;
        }
        false
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ItemState {
    pub(crate) position: Vec2,
    pub(crate) definition: ItemDefinition,
}

#[derive(Clone, Debug)]
pub(crate) struct ExitState {
    pub(crate) position: Vec2,
    pub(crate) level: LevelId,
    pub(crate) content: LevelContent,
}

/// Level content instantiated into the world together with its children.
#[derive(Clone, Debug)]
pub(crate) struct LevelInstance {
    pub(crate) serial: LevelSerial,
    pub(crate) level: LevelId,
    pub(crate) content: LevelContent,
    pub(crate) camera_bounds: CameraBounds,
    pub(crate) enemies: BTreeMap<EnemyId, EnemyState>,
    pub(crate) boss: Option<BossState>,
    pub(crate) items: BTreeMap<ItemId, ItemState>,
    pub(crate) exits: BTreeMap<ExitId, ExitState>,
    pub(crate) cleared: bool,
}

impl LevelInstance {
    pub(crate) fn live_enemies(&self) -> impl Iterator<Item = EnemyId> + '_ {
        self.enemies
            .iter()
            .filter(|(_, enemy)| enemy.alive)
            .map(|(id, _)| *id)
    }

    /// Returns `true` when the enemy was alive before the call.
    pub(crate) fn kill_enemy(&mut self, enemy: EnemyId) -> bool {
        match self.enemies.get_mut(&enemy) {
            Some(state) if state.alive => {
                state.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` when the hit defeated the boss.
    pub(crate) fn damage_boss(&mut self, amount: f32) -> bool {
        self.boss
            .as_mut()
            .map_or(false, |boss| boss.take_damage(amount))
    }

    /// Physically removes enemies whose death was already reported.
    pub(crate) fn purge_dead(&mut self) {
        self.enemies.retain(|_, enemy| enemy.alive);
    }
}

/// Allocates identifiers that stay unique for the lifetime of the world.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    next_serial: u32,
    next_enemy: u32,
    next_exit: u32,
    next_item: u32,
}

impl IdAllocator {
    pub(crate) fn serial(&mut self) -> LevelSerial {
        let serial = LevelSerial::new(self.next_serial);
        self.next_serial = self.next_serial.saturating_add(1);
        serial
    }

    pub(crate) fn enemy(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.saturating_add(1);
        id
    }

    pub(crate) fn exit(&mut self) -> ExitId {
        let id = ExitId::new(self.next_exit);
        self.next_exit = self.next_exit.saturating_add(1);
        id
    }

    pub(crate) fn item(&mut self) -> ItemId {
        let id = ItemId::new(self.next_item);
        self.next_item = self.next_item.saturating_add(1);
        id
    }
}
