//! TOML manifest describing the levels of a run.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use cowball_core::{CameraBounds, LevelId, LevelLayout};
use cowball_run::{LevelCatalog, RunConfig, StaticLevelSource};
use serde::Deserialize;

/// Manifest bundled with the binary.
pub(crate) const DEMO_MANIFEST: &str = include_str!("../manifests/demo.toml");

/// Level listing, tunables and level content of a run.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Manifest {
    #[serde(default)]
    seed: u64,
    boss: LevelId,
    catalog: Vec<LevelId>,
    #[serde(default)]
    viewport: Option<CameraBounds>,
    #[serde(default)]
    player_max_health: Option<f32>,
    #[serde(default)]
    boss_max_health: Option<f32>,
    #[serde(default)]
    levels: BTreeMap<LevelId, LevelLayout>,
}

impl Manifest {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse level manifest")
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid manifest {}", path.display()))
    }

    /// Run configuration, with `seed` taking precedence over the manifest's.
    pub(crate) fn config(&self, seed: Option<u64>) -> RunConfig {
        let mut config = RunConfig::new(seed.unwrap_or(self.seed));
        if let Some(viewport) = self.viewport {
            config = config.with_viewport(viewport);
        }
        if let Some(health) = self.player_max_health {
            config = config.with_player_max_health(health);
        }
        if let Some(health) = self.boss_max_health {
            config = config.with_boss_max_health(health);
        }
        config
    }

    pub(crate) fn catalog(&self) -> LevelCatalog {
        LevelCatalog::new(self.catalog.iter().cloned(), self.boss.clone())
    }

    pub(crate) fn source(&self) -> StaticLevelSource {
        self.levels
            .iter()
            .map(|(level, layout)| (level.clone(), layout.clone()))
            .collect()
    }
}
