//! crates/logging/src/level_map.rs
//! Total lookup tables keyed by [`Level`].

use crate::error::LevelError;
use crate::level::Level;

/// A fixed table holding exactly one value per [`Level`].
///
/// Backend adapters use a `LevelMap` to translate facade levels into their
/// native vocabulary. Because the table is an array indexed by level, a lookup
/// can never miss; tables assembled from explicit pairs are checked for
/// completeness when they are built.
///
/// # Examples
///
/// ```
/// use logging::{Level, LevelMap};
///
/// let map = LevelMap::from_fn(|level| level >= Level::Warning);
/// assert!(!*map.get(Level::Information));
/// assert!(*map.get(Level::Critical));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelMap<T> {
    entries: [T; 6],
}

impl<T> LevelMap<T> {
    /// Builds a table by evaluating `f` once for every level.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Level) -> T,
    {
        Self {
            entries: Level::ALL.map(&mut f),
        }
    }

    /// Builds a table from explicit `(level, value)` pairs.
    ///
    /// Later pairs override earlier ones for the same level. Fails with
    /// [`LevelError::MissingMapping`] naming the least severe level that was
    /// not covered.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, LevelError>
    where
        I: IntoIterator<Item = (Level, T)>,
    {
        let mut slots: [Option<T>; 6] = Default::default();
        for (level, value) in pairs {
            slots[level.index()] = Some(value);
        }

        if let Some(level) = Level::ALL
            .into_iter()
            .find(|level| slots[level.index()].is_none())
        {
            return Err(LevelError::MissingMapping { level });
        }

        Ok(Self {
            entries: slots.map(|slot| slot.expect("every slot checked above")),
        })
    }

    /// Returns the value mapped to `level`.
    pub fn get(&self, level: Level) -> &T {
        &self.entries[level.index()]
    }

    /// Replaces the value mapped to `level`.
    pub fn set(&mut self, level: Level, value: T) {
        self.entries[level.index()] = value;
    }

    /// Iterates over `(level, value)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &T)> {
        Level::ALL.into_iter().zip(self.entries.iter())
    }
}

impl<T: Copy> LevelMap<T> {
    /// Returns a copy of the value mapped to `level`.
    pub fn lookup(&self, level: Level) -> T {
        self.entries[level.index()]
    }
}
