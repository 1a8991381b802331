//! crates/logging/src/filter.rs
//! Level thresholds and the logger wrapper that applies them.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::LevelError;
use crate::level::Level;
use crate::logger::{Argument, Failure, Logger};

/// Threshold deciding which levels pass.
///
/// Parses from `off` or any name accepted by [`Level`]'s `FromStr`, so the
/// same strings work in configuration files and environment variables.
///
/// # Examples
///
/// ```
/// use logging::{Level, LevelFilter};
///
/// let filter: LevelFilter = "warn".parse().unwrap();
/// assert!(filter.allows(Level::Error));
/// assert!(!filter.allows(Level::Information));
/// assert!(!LevelFilter::Off.allows(Level::Critical));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum LevelFilter {
    /// Every level is rejected.
    Off,
    /// Levels at or above the contained level pass.
    AtLeast(Level),
}

impl LevelFilter {
    /// Lets every level through.
    pub const ALL: Self = Self::AtLeast(Level::Trace);

    /// Reports whether `level` passes the threshold.
    #[must_use]
    pub fn allows(self, level: Level) -> bool {
        match self {
            Self::Off => false,
            Self::AtLeast(minimum) => level >= minimum,
        }
    }

    /// Returns the lowest level that passes, if any.
    #[must_use]
    pub const fn minimum(self) -> Option<Level> {
        match self {
            Self::Off => None,
            Self::AtLeast(level) => Some(level),
        }
    }

    /// Reads the filter from the environment variable `var`.
    ///
    /// An unset or blank variable yields `default`.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::UnknownName`] when the variable is set to
    /// something that is not `off` or a level name.
    pub fn from_env(var: &str, default: Self) -> Result<Self, LevelError> {
        match env::var_os(var) {
            None => Ok(default),
            Some(value) => {
                let value = value.to_string_lossy();
                if value.trim().is_empty() {
                    Ok(default)
                } else {
                    value.parse()
                }
            }
        }
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::AtLeast(Level::Information)
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        Self::AtLeast(level)
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::AtLeast(level) => fmt::Display::fmt(level, f),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("off") {
            return Ok(Self::Off);
        }
        s.parse().map(Self::AtLeast)
    }
}

impl TryFrom<String> for LevelFilter {
    type Error = LevelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelFilter> for String {
    fn from(filter: LevelFilter) -> Self {
        filter.to_string()
    }
}

/// Logger wrapper that applies a [`LevelFilter`] in front of another logger.
///
/// A level is enabled only when the filter allows it and the inner logger
/// reports it enabled. Events for rejected levels never reach the inner
/// logger.
#[derive(Clone, Debug)]
pub struct FilteredLogger<L> {
    filter: LevelFilter,
    inner: L,
}

impl<L> FilteredLogger<L> {
    /// Wraps `inner` behind `filter`.
    pub const fn new(filter: LevelFilter, inner: L) -> Self {
        Self { filter, inner }
    }

    /// Returns the active filter.
    pub const fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Returns the wrapped logger.
    pub const fn inner(&self) -> &L {
        &self.inner
    }

    /// Unwraps the inner logger.
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: Logger> Logger for FilteredLogger<L> {
    fn is_enabled(&self, level: Level) -> bool {
        self.filter.allows(level) && self.inner.is_enabled(level)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        if self.filter.allows(level) {
            self.inner.log(level, error, template, arguments);
        }
    }
}
