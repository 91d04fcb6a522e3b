//! Static item table and per-level item draws.

use cowball_core::{ItemDefinition, StatToChange};
use log::warn;
use rand::{seq::SliceRandom, Rng};

/// Items that can appear in a run.
pub const STANDARD_ITEMS: [ItemDefinition; 9] = [
    ItemDefinition::new("Lead Underwear", "lead_underwear", StatToChange::Damage, 1.0),
    ItemDefinition::new("Soylent", "soylent", StatToChange::Health, 1.0),
    ItemDefinition::new("Hotdog", "hotdog", StatToChange::Health, 1.0),
    ItemDefinition::new("Bike Pump", "bike_pump", StatToChange::JumpSpeed, 75.0),
    ItemDefinition::new("Coffee", "coffee", StatToChange::Speed, 50.0),
    ItemDefinition::new("Trigger Finger", "trigger_finger", StatToChange::FireRate, 0.5),
    ItemDefinition::new("Campfire", "campfire", StatToChange::None, 0.0),
    ItemDefinition::new("Bigger Bullets", "bigger_bullets", StatToChange::Damage, 0.5),
    ItemDefinition::new("Hardhat", "hardhat", StatToChange::None, 0.0),
];

/// Immutable table of item definitions.
#[derive(Clone, Debug)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
}

impl ItemCatalog {
    /// Creates a catalog holding the provided definitions.
    #[must_use]
    pub fn new(items: Vec<ItemDefinition>) -> Self {
        Self { items }
    }

    /// Creates the catalog of [`STANDARD_ITEMS`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_ITEMS.to_vec())
    }

    /// Definitions in declaration order.
    #[must_use]
    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    /// Number of definitions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Samples `count` definitions from a fresh shuffle of the catalog.
    ///
    /// Up to the catalog size no definition repeats. Larger requests cycle
    /// through the same shuffled order.
    pub fn shuffled_draws<R>(&self, count: usize, rng: &mut R) -> Vec<ItemDefinition>
    where
        R: Rng + ?Sized,
    {
        if self.items.is_empty() {
            if count > 0 {
                warn!("item catalog is empty; {count} item draws left unfilled");
            }
            return Vec::new();
        }

        let mut deck = self.items.clone();
        deck.shuffle(rng);
        deck.iter().cycle().take(count).copied().collect()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
