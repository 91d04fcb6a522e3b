//! Level catalog, content sources and the preloaded level library.

use std::{collections::BTreeMap, sync::Arc};

use cowball_core::{CameraBounds, LevelContent, LevelId, LevelLayout, Vec2};

use crate::RunError;

/// Ordered listing of the levels a run may visit plus the reserved boss level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<LevelId>,
    boss: LevelId,
}

impl LevelCatalog {
    /// Creates a catalog. The boss level is never drawn like a regular level.
    #[must_use]
    pub fn new(levels: impl IntoIterator<Item = LevelId>, boss: LevelId) -> Self {
        Self {
            levels: levels.into_iter().filter(|level| *level != boss).collect(),
            boss,
        }
    }

    /// Regular levels in listing order.
    #[must_use]
    pub fn levels(&self) -> &[LevelId] {
        &self.levels
    }

    /// Level substituted when the pool runs low.
    #[must_use]
    pub fn boss(&self) -> &LevelId {
        &self.boss
    }

    fn all(&self) -> impl Iterator<Item = &LevelId> {
        self.levels.iter().chain(std::iter::once(&self.boss))
    }
}

/// Resolves level identifiers to structured content.
pub trait LevelSource {
    /// Returns the content of the level, or `None` when the level is unknown.
    fn load(&self, level: &LevelId) -> Option<LevelLayout>;
}

/// Level source backed by an in-memory map.
#[derive(Clone, Debug, Default)]
pub struct StaticLevelSource {
    levels: BTreeMap<LevelId, LevelLayout>,
}

impl StaticLevelSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the content of a level.
    #[must_use]
    pub fn with_level(mut self, level: LevelId, layout: LevelLayout) -> Self {
        self.insert(level, layout);
        self
    }

    /// Adds or replaces the content of a level.
    pub fn insert(&mut self, level: LevelId, layout: LevelLayout) {
        let _ = self.levels.insert(level, layout);
    }
}

impl FromIterator<(LevelId, LevelLayout)> for StaticLevelSource {
    fn from_iter<T: IntoIterator<Item = (LevelId, LevelLayout)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

impl LevelSource for StaticLevelSource {
    fn load(&self, level: &LevelId) -> Option<LevelLayout> {
        self.levels.get(level).cloned()
    }
}

/// Level content validated and resolved against run fallbacks.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedLevel {
    pub(crate) content: LevelContent,
    pub(crate) camera_bounds: CameraBounds,
    pub(crate) player_spawn: Vec2,
}

/// Every level of the catalog, loaded once when the run starts.
#[derive(Debug)]
pub(crate) struct LevelLibrary {
    levels: BTreeMap<LevelId, ResolvedLevel>,
}

impl LevelLibrary {
    pub(crate) fn load<S>(
        catalog: &LevelCatalog,
        source: &S,
        viewport: CameraBounds,
    ) -> Result<Self, RunError>
    where
        S: LevelSource + ?Sized,
    {
        let mut levels = BTreeMap::new();
        for level in catalog.all() {
            let layout = source.load(level).ok_or_else(|| RunError::UnknownLevel {
                level: level.clone(),
            })?;
            let player_spawn = layout
                .player_spawn
                .ok_or_else(|| RunError::MissingPlayerSpawn {
                    level: level.clone(),
                })?;
            let camera_bounds = layout.camera_bounds.unwrap_or(viewport);
            let _ = levels.insert(
                level.clone(),
                ResolvedLevel {
                    content: Arc::new(layout),
                    camera_bounds,
                    player_spawn,
                },
            );
        }
        Ok(Self { levels })
    }

    pub(crate) fn get(&self, level: &LevelId) -> Option<&ResolvedLevel> {
        self.levels.get(level)
    }
}
