//! crates/logging/src/null.rs
//! Logger that records nothing.

use crate::factory::LoggerFactory;
use crate::level::Level;
use crate::logger::{Argument, Failure, Logger};

/// A logger that discards every event and reports every level as disabled.
///
/// This is the logger a [`Dispatcher`](crate::Dispatcher) holds while closed,
/// and a convenient stand-in wherever a backend is absent.
///
/// # Example
///
/// ```
/// use logging::{Level, Logger, LoggerExt, NullLogger};
///
/// let logger = NullLogger;
/// assert!(!logger.is_enabled(Level::Critical));
/// logger.critical("discarded", &[]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullLogger;

impl Logger for NullLogger {
    #[inline]
    fn is_enabled(&self, _level: Level) -> bool {
        false
    }

    #[inline]
    fn log(
        &self,
        _level: Level,
        _error: Option<Failure<'_>>,
        _template: &str,
        _arguments: &[Argument<'_>],
    ) {
    }
}

/// Factory producing [`NullLogger`] instances regardless of the name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLoggerFactory;

impl LoggerFactory for NullLoggerFactory {
    type Logger = NullLogger;

    fn create(&self, _name: &str) -> NullLogger {
        NullLogger
    }
}
