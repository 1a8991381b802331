//! crates/logging/src/factory.rs
//! Construction of loggers from a contextual name.

use std::sync::Arc;

use crate::logger::Logger;

/// Creates loggers for a contextual name, usually a module or component.
///
/// Every backend ships a factory so the composition root can hand out loggers
/// without naming the backend at each call site. Closures of the form
/// `Fn(&str) -> L` are factories too.
///
/// # Examples
///
/// ```
/// use logging::{Level, Logger, LoggerFactory, NullLogger};
///
/// let factory = |_name: &str| NullLogger;
/// let logger = factory.create("storage");
/// assert!(!logger.is_enabled(Level::Error));
///
/// let shared = factory.create_shared("network");
/// assert!(!shared.is_enabled(Level::Error));
/// ```
pub trait LoggerFactory {
    /// Logger type produced by this factory.
    type Logger: Logger + 'static;

    /// Creates a logger for `name`.
    fn create(&self, name: &str) -> Self::Logger;

    /// Creates a logger for `name` ready to install into a dispatcher.
    fn create_shared(&self, name: &str) -> Arc<dyn Logger> {
        Arc::new(self.create(name))
    }
}

impl<F, L> LoggerFactory for F
where
    F: Fn(&str) -> L,
    L: Logger + 'static,
{
    type Logger = L;

    fn create(&self, name: &str) -> L {
        self(name)
    }
}
