#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level provisioner that pairs declared spawn points with drawn content.
//!
//! Items are provisioned when a level loads; exits only once the level has
//! been cleared. Each kind is provisioned at most once per level instance.

use cowball_core::{
    Command, ItemDefinition, LevelContent, LevelId, LevelLayout, LevelSerial, SpawnPoint,
    SpawnRole,
};
use log::{debug, warn};

/// Destination an exit is bound to when it is spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct ExitBinding {
    /// Level the exit leads to.
    pub level: LevelId,
    /// Preloaded content of that level.
    pub content: LevelContent,
}

/// Outcome of a provisioning pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement<T> {
    /// Number of spawn points that received an entity.
    pub placed: usize,
    /// Draws left over because the level declared fewer spawn points.
    pub leftover: Vec<T>,
}

impl<T> Placement<T> {
    fn skipped() -> Self {
        Self {
            placed: 0,
            leftover: Vec::new(),
        }
    }
}

/// Pure system that emits spawn commands for items and exits.
#[derive(Debug, Default)]
pub struct Provisioner {
    items_for: Option<LevelSerial>,
    exits_for: Option<LevelSerial>,
}

impl Provisioner {
    /// Creates a provisioner that has not provisioned any level yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether items were already provisioned for the level instance.
    #[must_use]
    pub fn items_provisioned(&self, serial: LevelSerial) -> bool {
        self.items_for.map_or(false, |done| done >= serial)
    }

    /// Reports whether exits were already provisioned for the level instance.
    #[must_use]
    pub fn exits_provisioned(&self, serial: LevelSerial) -> bool {
        self.exits_for.map_or(false, |done| done >= serial)
    }

    /// Emits one `Command::SpawnItem` per item spawn point of the level.
    ///
    /// `draw` receives the number of item spawn points and is only invoked
    /// the first time the level instance is provisioned.
    pub fn provision_items<F>(
        &mut self,
        serial: LevelSerial,
        layout: &LevelLayout,
        draw: F,
        out: &mut Vec<Command>,
    ) -> Placement<ItemDefinition>
    where
        F: FnOnce(usize) -> Vec<ItemDefinition>,
    {
        if self.items_provisioned(serial) {
            debug!("items already provisioned for {serial:?}");
            return Placement::skipped();
        }
        self.items_for = Some(serial);

        let points: Vec<SpawnPoint> = layout.spawn_points(SpawnRole::Item).collect();
        let draws = draw(points.len());
        pair(points, draws, SpawnRole::Item, |point, item| {
            out.push(Command::SpawnItem {
                position: point.position,
                item,
            });
        })
    }

    /// Emits one `Command::SpawnExit` per exit spawn point of the level.
    ///
    /// `draw` receives the number of exit spawn points and is only invoked
    /// the first time the level instance is provisioned. Callers must return
    /// leftover bindings to the content pool.
    pub fn provision_exits<F>(
        &mut self,
        serial: LevelSerial,
        layout: &LevelLayout,
        draw: F,
        out: &mut Vec<Command>,
    ) -> Placement<ExitBinding>
    where
        F: FnOnce(usize) -> Vec<ExitBinding>,
    {
        if self.exits_provisioned(serial) {
            debug!("exits already provisioned for {serial:?}");
            return Placement::skipped();
        }
        self.exits_for = Some(serial);

        let points: Vec<SpawnPoint> = layout.spawn_points(SpawnRole::Exit).collect();
        let draws = draw(points.len());
        pair(points, draws, SpawnRole::Exit, |point, binding| {
            out.push(Command::SpawnExit {
                position: point.position,
                level: binding.level,
                content: binding.content,
            });
        })
    }
}

fn pair<T, P>(points: Vec<SpawnPoint>, draws: Vec<T>, role: SpawnRole, mut place: P) -> Placement<T>
where
    P: FnMut(SpawnPoint, T),
{
    if points.len() > draws.len() {
        warn!(
            "{role:?} spawn points outnumber draws ({} > {}); leaving {} empty",
            points.len(),
            draws.len(),
            points.len() - draws.len()
        );
    }

    let mut draws = draws.into_iter();
    let mut placed = 0;
    for point in points {
        let Some(draw) = draws.next() else {
            break;
        };
        place(point, draw);
        placed += 1;
    }

    Placement {
        placed,
        leftover: draws.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowball_core::{StatToChange, Vec2};

    fn layout(items: usize) -> LevelLayout {
        LevelLayout {
            item_spawns: (0..items).map(|index| Vec2::new(index as f32, 0.0)).collect(),
            ..LevelLayout::default()
        }
    }

    fn hotdog() -> ItemDefinition {
        ItemDefinition::new("Hotdog", "hotdog", StatToChange::Health, 1.0)
    }

    #[test]
    fn fewer_draws_leave_points_empty() {
        let mut provisioner = Provisioner::new();
        let mut out = Vec::new();

        let placement =
            provisioner.provision_items(LevelSerial::new(0), &layout(3), |_| vec![hotdog()], &mut out);

        assert_eq!(placement.placed, 1);
        assert!(placement.leftover.is_empty());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn surplus_draws_are_returned() {
        let mut provisioner = Provisioner::new();
        let mut out = Vec::new();

        let placement = provisioner.provision_items(
            LevelSerial::new(0),
            &layout(1),
            |_| vec![hotdog(), hotdog()],
            &mut out,
        );

        assert_eq!(placement.placed, 1);
        assert_eq!(placement.leftover.len(), 1);
    }

    #[test]
    fn older_serials_count_as_provisioned() {
        let mut provisioner = Provisioner::new();
        let mut out = Vec::new();
        let _ = provisioner.provision_items(LevelSerial::new(4), &layout(1), |count| {
            vec![hotdog(); count]
        }, &mut out);

        assert!(provisioner.items_provisioned(LevelSerial::new(3)));
        assert!(provisioner.items_provisioned(LevelSerial::new(4)));
        assert!(!provisioner.items_provisioned(LevelSerial::new(5)));
        assert!(!provisioner.exits_provisioned(LevelSerial::new(4)));
    }
}
