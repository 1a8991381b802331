//! crates/logging/src/level.rs
//! Severity levels shared by every logger.

use std::fmt;
use std::str::FromStr;

use crate::error::LevelError;

/// Severity of a logged event.
///
/// Levels are totally ordered from least to most severe. The same type is
/// used to classify events and as a filter threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Level {
    /// Very fine-grained diagnostic detail.
    Trace,
    /// Internal state useful while debugging.
    Debug,
    /// Normal operational messages.
    Information,
    /// Unexpected but recoverable conditions.
    Warning,
    /// Failures of the current operation.
    Error,
    /// Failures that require immediate attention.
    Critical,
}

impl Level {
    /// Every level in ascending order of severity.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Information,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Returns the canonical lowercase name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Information => "information",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Returns the position of the level within [`Level::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelError;

    /// Parses a level name.
    ///
    /// Matching is case-insensitive. Besides the canonical names the short
    /// forms `info` and `warn` are accepted, and `fatal` selects
    /// [`Level::Critical`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Level;
    ///
    /// assert_eq!("Warning".parse::<Level>(), Ok(Level::Warning));
    /// assert_eq!("info".parse::<Level>(), Ok(Level::Information));
    /// assert!("verbose".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "information" | "info" => Ok(Self::Information),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "fatal" => Ok(Self::Critical),
            _ => Err(LevelError::UnknownName { name: s.to_owned() }),
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, LevelError> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(LevelError::UnsupportedValue { value })
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level as Self
    }
}
