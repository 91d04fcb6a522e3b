//! Fatal configuration errors raised while starting a run.

use cowball_core::LevelId;
use cowball_system_content_pool::PoolError;
use thiserror::Error;

/// Errors that abort run initialization.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RunError {
    /// The level catalog could not seed a content pool.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The level source has no content for a catalog entry.
    #[error("level {level} is listed in the catalog but has no content")]
    UnknownLevel {
        /// Level that could not be resolved.
        level: LevelId,
    },
    /// A level declares no player spawn point.
    #[error("level {level} has no player spawn point")]
    MissingPlayerSpawn {
        /// Level that is missing the spawn point.
        level: LevelId,
    },
}
