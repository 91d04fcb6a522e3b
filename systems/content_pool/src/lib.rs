#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Content pool manager responsible for non-repeating level and item draws.
//!
//! The pool is shuffled once when a run starts and consumed from the front.
//! Identifiers bound to exits the player did not take are appended back
//! without reshuffling, so the draw order of the remainder is undisturbed.

mod items;

use std::collections::{BTreeSet, VecDeque};

use cowball_core::LevelId;
use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

pub use items::{ItemCatalog, STANDARD_ITEMS};

/// Errors raised while building a content pool.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The catalog holds no level besides the reserved fallback.
    #[error("level catalog contains no playable levels")]
    EmptyCatalog,
}

/// Ordered levels drawn from the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draw {
    levels: Vec<LevelId>,
    substituted: usize,
}

impl Draw {
    /// Levels in draw order. Substituted fallbacks trail the pooled levels.
    #[must_use]
    pub fn levels(&self) -> &[LevelId] {
        &self.levels
    }

    /// Number of entries filled with the fallback level because the pool ran low.
    #[must_use]
    pub const fn substituted(&self) -> usize {
        self.substituted
    }

    /// Consumes the draw, yielding the drawn levels.
    #[must_use]
    pub fn into_levels(self) -> Vec<LevelId> {
        self.levels
    }
}

/// Shuffled, non-repeating sequence of level identifiers available for future draws.
#[derive(Clone, Debug)]
pub struct ContentPool {
    available: VecDeque<LevelId>,
    fallback: LevelId,
}

impl ContentPool {
    /// Builds a pool holding the catalog in randomized order.
    ///
    /// Duplicate identifiers and the fallback level are dropped: the fallback
    /// is never pooled and is only handed out by [`ContentPool::draw`] as a
    /// substitute.
    pub fn initialize<R>(
        catalog: impl IntoIterator<Item = LevelId>,
        fallback: LevelId,
        rng: &mut R,
    ) -> Result<Self, PoolError>
    where
        R: Rng + ?Sized,
    {
        let mut seen = BTreeSet::new();
        let mut levels: Vec<LevelId> = catalog
            .into_iter()
            .filter(|level| *level != fallback && seen.insert(level.clone()))
            .collect();

        if levels.is_empty() {
            return Err(PoolError::EmptyCatalog);
        }

        levels.shuffle(rng);
        Ok(Self {
            available: levels.into(),
            fallback,
        })
    }

    /// Removes `count` levels from the front of the pool.
    ///
    /// When fewer than `count` levels remain, the shortfall is filled with the
    /// fallback level instead of failing.
    pub fn draw(&mut self, count: usize) -> Draw {
        let taken = count.min(self.available.len());
        let mut levels: Vec<LevelId> = self.available.drain(..taken).collect();
        let substituted = count - taken;

        if substituted > 0 {
            warn!(
                "content pool short by {substituted}; substituting {}",
                self.fallback
            );
            levels.extend(std::iter::repeat(self.fallback.clone()).take(substituted));
        }

        Draw {
            levels,
            substituted,
        }
    }

    /// Appends levels back onto the pool and reports how many were accepted.
    ///
    /// The fallback level and identifiers already pooled are skipped.
    pub fn restore(&mut self, levels: impl IntoIterator<Item = LevelId>) -> usize {
        let mut restored = 0;
        for level in levels {
            if level == self.fallback {
                debug!("not pooling fallback level {level}");
                continue;
            }
            if self.available.contains(&level) {
                warn!("level {level} is already pooled");
                continue;
            }
            self.available.push_back(level);
            restored += 1;
        }
        restored
    }

    /// Level substituted when the pool runs low.
    #[must_use]
    pub fn fallback(&self) -> &LevelId {
        &self.fallback
    }

    /// Number of levels available for future draws.
    #[must_use]
    pub fn len(&self) -> usize {
        self.available.len()
    }

    /// Reports whether the pool is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Reports whether the level is available for future draws.
    #[must_use]
    pub fn contains(&self, level: &LevelId) -> bool {
        self.available.contains(level)
    }

    /// Iterator over the pooled levels in consumption order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelId> {
        self.available.iter()
    }
}
