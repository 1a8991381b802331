//! crates/logging/src/error.rs
//! Errors raised where raw level values enter the facade.

use thiserror::Error;

use crate::level::Level;

/// Failure to translate an external value into a [`Level`] or to build a
/// complete level table.
///
/// Within the facade every [`Level`] is one of six known variants, so mapping
/// code is total by construction. Values from outside (configuration strings,
/// raw integers, partially specified tables) are checked here and rejected
/// loudly rather than silently defaulting to a nearby level.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LevelError {
    /// A numeric level outside `0..=5`.
    #[error("unsupported log level value {value}; expected 0 (trace) through 5 (critical)")]
    UnsupportedValue {
        /// The offending raw value.
        value: u8,
    },
    /// A level name that matches no known level or alias.
    #[error("unknown log level name '{name}'")]
    UnknownName {
        /// The offending name as supplied.
        name: String,
    },
    /// A level table built from explicit pairs left a level without a mapping.
    #[error("no mapping supplied for log level '{level}'")]
    MissingMapping {
        /// The first level found without a mapping.
        level: Level,
    },
}
